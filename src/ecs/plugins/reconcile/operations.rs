/*!
# Operation Processors

One processor per [`Opcode`]. A processor receives a single typed component
payload wrapped in an [`EcsOperation`] and returns the entity it acted on, so
that the dispatcher can thread a freshly cloned entity into the remaining
components of the same wire command.
*/

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::ecs::core::{DestroyAfter, Identity};
use crate::ecs::plugins::reconcile::error::ReconcileError;
use crate::ecs::plugins::reconcile::prototype::PrototypeRegistry;
use crate::ecs::plugins::reconcile::store::{ComponentStore, NULL_ENTITY};

/// Components that can travel inside wire commands.
pub trait NetComponent: Component + Clone + Serialize + DeserializeOwned {}

impl<T: Component + Clone + Serialize + DeserializeOwned> NetComponent for T {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    Create,
    Add,
    Update,
    Remove,
    Delete,
}

/// One component of a wire command, ready to be applied.
#[derive(Debug, Clone)]
pub struct EcsOperation<'a, T> {
    pub opcode: Opcode,
    /// Target entity, [`NULL_ENTITY`] if not resolved yet.
    pub entity: Entity,
    /// Whether `entity` is a reservation from the buffered table that has
    /// not been built from its prototype yet.
    pub reserved: bool,
    pub id: i64,
    pub type_path: &'a str,
    pub data: T,
    /// Whether `entity` already carried a `T` when the operation was built.
    pub exists: bool,
}

impl<'a, T: NetComponent> EcsOperation<'a, T> {
    pub fn new<S: ComponentStore>(
        opcode: Opcode,
        entity: Entity,
        id: i64,
        type_path: &'a str,
        data: T,
        store: &S,
    ) -> Self {
        Self {
            opcode,
            entity,
            reserved: false,
            id,
            type_path,
            data,
            exists: entity != NULL_ENTITY && store.has::<T>(entity),
        }
    }
}

pub trait OperationProcessor<S: ComponentStore> {
    fn process<T: NetComponent>(
        &self,
        operation: EcsOperation<'_, T>,
        store: &mut S,
    ) -> Result<Entity, ReconcileError>;
}

/// Add the component, or overwrite it if the entity already carries one.
fn add_or_set<S: ComponentStore, T: NetComponent>(
    store: &mut S,
    entity: Entity,
    exists: bool,
    data: T,
) -> Result<Entity, ReconcileError> {
    let applied = if exists {
        store.set(entity, data)
    } else {
        store.add(entity, data)
    };

    if applied {
        Ok(entity)
    } else {
        Err(stale::<T>(entity))
    }
}

fn stale<T>(entity: Entity) -> ReconcileError {
    ReconcileError::StaleEntity {
        entity,
        component: std::any::type_name::<T>(),
    }
}

// ============================================================================
// CREATE
// ============================================================================

/// Clones the prototype when no entity is mapped to the id yet, then adds or
/// sets the component.
pub struct CreateProcessor<'a, S> {
    pub registry: &'a PrototypeRegistry<S>,
}

impl<'a, S: ComponentStore> CreateProcessor<'a, S> {
    pub fn new(registry: &'a PrototypeRegistry<S>) -> Self {
        Self { registry }
    }
}

impl<S: ComponentStore> OperationProcessor<S> for CreateProcessor<'_, S> {
    fn process<T: NetComponent>(
        &self,
        mut operation: EcsOperation<'_, T>,
        store: &mut S,
    ) -> Result<Entity, ReconcileError> {
        if operation.entity == NULL_ENTITY {
            operation.entity = self.registry.clone_entity(operation.type_path, store)?;
        } else if operation.reserved {
            self.registry
                .instantiate_into(operation.type_path, store, operation.entity)?;
        } else if !store.exists(operation.entity) {
            return Err(stale::<T>(operation.entity));
        } else {
            return add_or_set(store, operation.entity, operation.exists, operation.data);
        }

        // Freshly built from the prototype
        store.add(
            operation.entity,
            Identity::new(operation.id, operation.type_path),
        );
        let exists = store.has::<T>(operation.entity);
        add_or_set(store, operation.entity, exists, operation.data)
    }
}

// ============================================================================
// ADD / UPDATE
// ============================================================================

/// Adds or overwrites the component on an already resolved entity.
pub struct AddProcessor;

impl<S: ComponentStore> OperationProcessor<S> for AddProcessor {
    fn process<T: NetComponent>(
        &self,
        operation: EcsOperation<'_, T>,
        store: &mut S,
    ) -> Result<Entity, ReconcileError> {
        if !store.exists(operation.entity) {
            return Err(stale::<T>(operation.entity));
        }
        add_or_set(store, operation.entity, operation.exists, operation.data)
    }
}

/// Overwrites the component. In strict mode a missing component is an error
/// instead of being added.
pub struct UpdateProcessor {
    pub strict: bool,
}

impl<S: ComponentStore> OperationProcessor<S> for UpdateProcessor {
    fn process<T: NetComponent>(
        &self,
        operation: EcsOperation<'_, T>,
        store: &mut S,
    ) -> Result<Entity, ReconcileError> {
        if !store.exists(operation.entity) {
            return Err(stale::<T>(operation.entity));
        }
        if self.strict && !operation.exists {
            return Err(ReconcileError::MissingComponent {
                entity: operation.entity,
                component: std::any::type_name::<T>(),
            });
        }
        add_or_set(store, operation.entity, operation.exists, operation.data)
    }
}

// ============================================================================
// REMOVE / DELETE
// ============================================================================

/// Strips the component type from the entity; the entity survives.
pub struct RemoveProcessor;

impl<S: ComponentStore> OperationProcessor<S> for RemoveProcessor {
    fn process<T: NetComponent>(
        &self,
        operation: EcsOperation<'_, T>,
        store: &mut S,
    ) -> Result<Entity, ReconcileError> {
        if !store.exists(operation.entity) {
            return Err(stale::<T>(operation.entity));
        }
        store.remove::<T>(operation.entity);
        Ok(operation.entity)
    }
}

/// Schedules the whole entity for destruction after one more tick. The
/// payload is ignored.
pub struct DeleteProcessor;

impl<S: ComponentStore> OperationProcessor<S> for DeleteProcessor {
    fn process<T: NetComponent>(
        &self,
        operation: EcsOperation<'_, T>,
        store: &mut S,
    ) -> Result<Entity, ReconcileError> {
        if !store.exists(operation.entity) {
            return Err(stale::<T>(operation.entity));
        }
        // A repeated delete must not push the deadline back
        if !store.has::<DestroyAfter>(operation.entity) {
            store.add(operation.entity, DestroyAfter { ticks: 1 });
        }
        Ok(operation.entity)
    }
}
