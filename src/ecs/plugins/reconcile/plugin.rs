use bevy::prelude::*;

use crate::ecs::core::ClientConfig;
use crate::ecs::plugins::reconcile::components::*;
use crate::ecs::plugins::reconcile::dispatcher::ReconciliationContext;
use crate::ecs::plugins::reconcile::prototype::Prototyper;
use crate::ecs::plugins::reconcile::systems::*;

pub struct ReconcilePlugin;

impl Plugin for ReconcilePlugin {
    fn build(&self, app: &mut App) {
        let strict_update = app
            .world()
            .get_resource::<ClientConfig>()
            .is_some_and(|config| config.strict_update);
        app.world_mut()
            .get_resource_or_insert_with(ReconciliationContext::<World>::default)
            .strict_update = strict_update;

        let (sender, receiver) = crossbeam_channel::unbounded::<BoxedCommand>();
        app.insert_resource(InboundSender(sender))
            .insert_resource(InboundCommands(receiver))
            .init_resource::<PendingCommands>()
            .add_systems(PreUpdate, apply_inbound_commands)
            .add_systems(Last, destroy_sweep_system);
    }
}

/// Registration of game content prototypes on the [`App`].
pub trait PrototypeAppExt {
    fn register_prototyper(&mut self, segment: &str, prototyper: Prototyper) -> &mut Self;
}

impl PrototypeAppExt for App {
    fn register_prototyper(&mut self, segment: &str, prototyper: Prototyper) -> &mut Self {
        self.world_mut()
            .get_resource_or_insert_with(ReconciliationContext::<World>::default)
            .registry
            .register(segment, prototyper);
        self
    }
}
