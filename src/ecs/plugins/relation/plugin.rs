use bevy::prelude::*;

use crate::ecs::plugins::network::WireAppExt;
use crate::ecs::plugins::reactive::ReactiveAppExt;
use crate::ecs::plugins::reconcile::systems::apply_inbound_commands;
use crate::ecs::plugins::reconcile::ComponentCommand;
use crate::ecs::plugins::relation::components::{Child, Parent};
use crate::ecs::plugins::relation::systems::link_children_system;

pub struct RelationPlugin;

impl Plugin for RelationPlugin {
    fn build(&self, app: &mut App) {
        app.register_wire_shape::<ComponentCommand<Parent>>("parent")
            .add_reactive::<Child>()
            .add_systems(PreUpdate, link_children_system.after(apply_inbound_commands));
    }
}
