use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ecs::plugins::reconcile::id_cache::EntityIdCache;
use crate::ecs::plugins::reconcile::store::{ComponentStore, NULL_ENTITY};

/// A non-owning reference to another network entity by its server id.
///
/// Only the id travels over the wire. The local handle is bound lazily and
/// re-resolved whenever the bound entity has gone away, so a link created
/// before its target exists starts working as soon as the target is created.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EntityLink {
    pub id: i64,
    #[serde(skip)]
    entity: Option<Entity>,
}

impl EntityLink {
    pub fn new(id: i64) -> Self {
        Self { id, entity: None }
    }

    /// A link that already knows its local handle.
    pub fn bound(id: i64, entity: Entity) -> Self {
        Self {
            id,
            entity: Some(entity),
        }
    }

    pub fn entity(&self) -> Option<Entity> {
        self.entity
    }

    /// Resolves the link without mutating it. Returns [`NULL_ENTITY`] while
    /// the target is unknown.
    pub fn resolve<S: ComponentStore>(&self, cache: &mut EntityIdCache, store: &S) -> Entity {
        match self.entity {
            Some(entity) if store.exists(entity) => entity,
            _ => cache.resolve(self.id, store),
        }
    }

    /// Resolves and remembers the handle for next time.
    pub fn resolve_and_bind<S: ComponentStore>(
        &mut self,
        cache: &mut EntityIdCache,
        store: &S,
    ) -> Entity {
        let entity = self.resolve(cache, store);
        self.entity = (entity != NULL_ENTITY).then_some(entity);
        entity
    }
}

impl PartialEq for EntityLink {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityLink {}

impl std::hash::Hash for EntityLink {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::core::Identity;

    #[test]
    fn link_resolves_once_target_appears() {
        let mut world = World::new();
        let mut cache = EntityIdCache::new();
        let link = EntityLink::new(77);

        assert_eq!(link.resolve(&mut cache, &world), NULL_ENTITY);

        let target = world.spawn(Identity::new(77, "3:1")).id();
        assert_eq!(link.resolve(&mut cache, &world), target);
    }

    #[test]
    fn bound_handle_is_dropped_when_entity_dies() {
        let mut world = World::new();
        let mut cache = EntityIdCache::new();
        let first = world.spawn(Identity::new(3, "3:1")).id();
        let mut link = EntityLink::new(3);

        assert_eq!(link.resolve_and_bind(&mut cache, &world), first);
        assert_eq!(link.entity(), Some(first));

        world.despawn(first);
        assert_eq!(link.resolve_and_bind(&mut cache, &world), NULL_ENTITY);
        assert_eq!(link.entity(), None);
    }

    #[test]
    fn only_the_id_is_serialized() {
        let link = EntityLink::bound(12, Entity::from_raw(4));
        let json = serde_json::to_string(&link).unwrap();
        assert_eq!(json, r#"{"id":12}"#);

        let decoded: EntityLink = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, link);
        assert_eq!(decoded.entity(), None);
    }
}
