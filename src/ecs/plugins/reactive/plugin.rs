use bevy::prelude::*;

use crate::ecs::plugins::reactive::systems::reactive_pass;
use crate::ecs::plugins::reactive::tracker::ReactiveTracker;

/// All reactive detection passes run in this set during `Update`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReactiveSet;

pub trait ReactiveAppExt {
    /// Starts added/removed detection for `T`. Listeners are registered on
    /// the [`ReactiveTracker<T>`] resource.
    fn add_reactive<T: Component + Clone>(&mut self) -> &mut Self;
}

impl ReactiveAppExt for App {
    fn add_reactive<T: Component + Clone>(&mut self) -> &mut Self {
        if self.world().contains_resource::<ReactiveTracker<T>>() {
            return self;
        }

        self.init_resource::<ReactiveTracker<T>>()
            .add_systems(Update, reactive_pass::<T>.in_set(ReactiveSet))
    }
}
