use bevy::prelude::*;

use crate::ecs::plugins::reactive::components::{ReactiveAdded, ReactiveRemoved};
use crate::ecs::plugins::reactive::tracker::ReactiveTracker;

/// One detection pass for `T`:
/// strip last tick's markers, report additions, report removals with the
/// shadowed value, then refresh every shadow from the live components.
pub fn reactive_pass<T: Component + Clone>(world: &mut World) {
    world.resource_scope(|world, mut tracker: Mut<ReactiveTracker<T>>| {
        tracker.activate_staged();

        let added_markers: Vec<Entity> = world
            .query_filtered::<Entity, With<ReactiveAdded<T>>>()
            .iter(world)
            .collect();
        for entity in added_markers {
            world.entity_mut(entity).remove::<ReactiveAdded<T>>();
        }
        let removed_markers: Vec<Entity> = world
            .query_filtered::<Entity, With<ReactiveRemoved<T>>>()
            .iter(world)
            .collect();
        for entity in removed_markers {
            world.entity_mut(entity).remove::<ReactiveRemoved<T>>();
        }
        tracker.discard_removed();

        let added: Vec<(Entity, T)> = world
            .query::<(Entity, &T)>()
            .iter(world)
            .filter(|(entity, _)| !tracker.is_tracked(*entity))
            .map(|(entity, value)| (entity, value.clone()))
            .collect();
        for (entity, value) in added {
            tracker.notify_added(entity, &value);
            tracker.refresh(entity, value);
            world.entity_mut(entity).insert(ReactiveAdded::<T>::default());
        }

        let removed: Vec<Entity> = tracker
            .tracked_entities()
            .filter(|entity| world.get::<T>(*entity).is_none())
            .collect();
        for entity in removed {
            tracker.notify_removed(entity);
            if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
                entity_mut.insert(ReactiveRemoved::<T>::default());
            }
        }

        let current: Vec<(Entity, T)> = world
            .query::<(Entity, &T)>()
            .iter(world)
            .map(|(entity, value)| (entity, value.clone()))
            .collect();
        for (entity, value) in current {
            tracker.refresh(entity, value);
        }
    });
}
