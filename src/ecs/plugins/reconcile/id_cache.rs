use bevy::prelude::*;
use std::collections::HashMap;

use crate::ecs::plugins::reconcile::store::{ComponentStore, NULL_ENTITY};

/// Resolves stable network ids to local entity handles.
///
/// Hits are cached; a cached handle is only trusted while the store still
/// reports it alive, stale entries are evicted on the next lookup. Entities
/// referenced before their own `Create` arrived live in a separate buffered
/// table until that `Create` is processed.
#[derive(Debug, Default)]
pub struct EntityIdCache {
    cached: HashMap<i64, Entity>,
    buffered: HashMap<i64, Entity>,
}

impl EntityIdCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live entity carrying `id`, or [`NULL_ENTITY`] when none is
    /// known yet. A null result means "pending", not failure.
    pub fn resolve<S: ComponentStore>(&mut self, id: i64, store: &S) -> Entity {
        if let Some(&entity) = self.cached.get(&id) {
            if store.exists(entity) {
                return entity;
            }
            self.cached.remove(&id);
        }

        match store.find_by_identity(id) {
            Some(entity) => {
                self.cached.insert(id, entity);
                entity
            }
            None => NULL_ENTITY,
        }
    }

    /// Like [`resolve`](Self::resolve), but falls back to an entity reserved
    /// through the buffered table.
    pub fn resolve_or_buffered<S: ComponentStore>(&mut self, id: i64, store: &S) -> Entity {
        let entity = self.resolve(id, store);
        if entity != NULL_ENTITY {
            return entity;
        }
        self.buffered(id, store).unwrap_or(NULL_ENTITY)
    }

    /// The reserved entity for `id`, if it is still alive.
    pub fn buffered<S: ComponentStore>(&mut self, id: i64, store: &S) -> Option<Entity> {
        let entity = *self.buffered.get(&id)?;
        if store.exists(entity) {
            Some(entity)
        } else {
            self.buffered.remove(&id);
            None
        }
    }

    pub fn buffer(&mut self, id: i64, entity: Entity) {
        self.buffered.insert(id, entity);
    }

    /// Forgets the reservation for `id` and hands back its entity.
    pub fn unbuffer(&mut self, id: i64) -> Option<Entity> {
        self.buffered.remove(&id)
    }

    /// Records that `entity` now definitively carries `id`: drops any buffered
    /// reservation and folds the mapping into the main cache.
    pub fn confirm(&mut self, id: i64, entity: Entity) {
        self.buffered.remove(&id);
        self.cached.insert(id, entity);
    }

    pub fn is_buffered(&self, id: i64) -> bool {
        self.buffered.contains_key(&id)
    }

    pub fn cached_len(&self) -> usize {
        self.cached.len()
    }

    pub fn buffered_len(&self) -> usize {
        self.buffered.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::core::Identity;

    #[test]
    fn unknown_ids_resolve_to_null() {
        let world = World::new();
        let mut cache = EntityIdCache::new();
        assert_eq!(cache.resolve(42, &world), NULL_ENTITY);
        assert_eq!(cache.cached_len(), 0);
    }

    #[test]
    fn scan_hits_are_cached_and_stale_entries_evicted() {
        let mut world = World::new();
        let mut cache = EntityIdCache::new();
        let entity = world.spawn(Identity::new(5, "1:1")).id();

        assert_eq!(cache.resolve(5, &world), entity);
        assert_eq!(cache.cached_len(), 1);

        world.despawn(entity);
        assert_eq!(cache.resolve(5, &world), NULL_ENTITY);
        assert_eq!(cache.cached_len(), 0);
    }

    #[test]
    fn confirm_moves_buffered_entries_into_the_cache() {
        let mut world = World::new();
        let mut cache = EntityIdCache::new();
        let reserved = world.spawn_empty().id();

        cache.buffer(9, reserved);
        assert_eq!(cache.resolve(9, &world), NULL_ENTITY);
        assert_eq!(cache.resolve_or_buffered(9, &world), reserved);

        cache.confirm(9, reserved);
        assert!(!cache.is_buffered(9));
        assert_eq!(cache.resolve(9, &world), reserved);
    }

    #[test]
    fn unbuffer_forgets_the_reservation() {
        let mut world = World::new();
        let mut cache = EntityIdCache::new();
        let reserved = world.spawn_empty().id();

        cache.buffer(12, reserved);
        assert_eq!(cache.unbuffer(12), Some(reserved));
        assert_eq!(cache.unbuffer(12), None);
        assert_eq!(cache.buffered_len(), 0);
        assert_eq!(cache.resolve_or_buffered(12, &world), NULL_ENTITY);
    }
}
