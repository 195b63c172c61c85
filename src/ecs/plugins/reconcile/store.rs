/*!
# Component Store

The storage seam the reconciliation layer is written against. Everything in
this plugin talks to a [`ComponentStore`] rather than to Bevy directly; the
only production implementation is the Bevy [`World`].
*/

use bevy::prelude::*;

use crate::ecs::core::Identity;

/// The "no entity" handle.
pub const NULL_ENTITY: Entity = Entity::PLACEHOLDER;

/// Typed component access on opaque entity handles.
pub trait ComponentStore {
    // Entities
    /// allocate a new, empty entity
    fn create(&mut self) -> Entity;
    /// check whether the handle designates a live entity
    fn exists(&self, entity: Entity) -> bool;
    /// destroy an entity, returns false if it was already gone
    fn destroy(&mut self, entity: Entity) -> bool;
    /// scan every entity carrying an [`Identity`] for the given network id
    fn find_by_identity(&self, id: i64) -> Option<Entity>;

    // Components
    /// check whether entity contains component
    fn has<T: Component>(&self, entity: Entity) -> bool;
    /// copy of the entity's component
    fn get<T: Component + Clone>(&self, entity: Entity) -> Option<T>;
    /// overwrite an existing component, returns false if there was none
    fn set<T: Component>(&mut self, entity: Entity, value: T) -> bool;
    /// attach a component, replacing any previous value
    fn add<T: Component>(&mut self, entity: Entity, value: T) -> bool;
    /// detach a component, returns false if the entity did not have it
    fn remove<T: Component>(&mut self, entity: Entity) -> bool;
}

impl ComponentStore for World {
    fn create(&mut self) -> Entity {
        self.spawn_empty().id()
    }

    fn exists(&self, entity: Entity) -> bool {
        entity != NULL_ENTITY && self.entities().contains(entity)
    }

    fn destroy(&mut self, entity: Entity) -> bool {
        ComponentStore::exists(self, entity) && self.despawn(entity)
    }

    fn find_by_identity(&self, id: i64) -> Option<Entity> {
        self.iter_entities()
            .find(|entity| entity.get::<Identity>().is_some_and(|identity| identity.id == id))
            .map(|entity| entity.id())
    }

    fn has<T: Component>(&self, entity: Entity) -> bool {
        ComponentStore::exists(self, entity) && self.get::<T>(entity).is_some()
    }

    fn get<T: Component + Clone>(&self, entity: Entity) -> Option<T> {
        if !ComponentStore::exists(self, entity) {
            return None;
        }
        World::get::<T>(self, entity).cloned()
    }

    fn set<T: Component>(&mut self, entity: Entity, value: T) -> bool {
        if !ComponentStore::exists(self, entity) {
            return false;
        }
        match self.get_mut::<T>(entity) {
            Some(mut current) => {
                *current = value;
                true
            }
            None => false,
        }
    }

    fn add<T: Component>(&mut self, entity: Entity, value: T) -> bool {
        if !ComponentStore::exists(self, entity) {
            return false;
        }
        self.entity_mut(entity).insert(value);
        true
    }

    fn remove<T: Component>(&mut self, entity: Entity) -> bool {
        if !ComponentStore::has::<T>(self, entity) {
            return false;
        }
        self.entity_mut(entity).remove::<T>();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Component, Debug, Clone, PartialEq)]
    struct Counter(u32);

    #[test]
    fn set_only_overwrites_existing_components() {
        let mut world = World::new();
        let entity = ComponentStore::create(&mut world);

        assert!(!ComponentStore::set(&mut world, entity, Counter(1)));
        assert!(ComponentStore::add(&mut world, entity, Counter(2)));
        assert!(ComponentStore::set(&mut world, entity, Counter(3)));
        assert_eq!(ComponentStore::get::<Counter>(&world, entity), Some(Counter(3)));
    }

    #[test]
    fn destroyed_entities_no_longer_exist() {
        let mut world = World::new();
        let entity = ComponentStore::create(&mut world);
        ComponentStore::add(&mut world, entity, Counter(1));

        assert!(ComponentStore::destroy(&mut world, entity));
        assert!(!ComponentStore::exists(&world, entity));
        assert!(!ComponentStore::has::<Counter>(&world, entity));
        assert!(!ComponentStore::destroy(&mut world, entity));
        assert!(!ComponentStore::exists(&world, NULL_ENTITY));
    }

    #[test]
    fn finds_entities_by_identity() {
        let mut world = World::new();
        world.spawn(Identity::new(7, "1:1"));
        let wanted = world.spawn(Identity::new(8, "1:1")).id();

        assert_eq!(world.find_by_identity(8), Some(wanted));
        assert_eq!(world.find_by_identity(9), None);
    }
}
