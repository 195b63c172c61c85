/*!
# Command Dispatcher

[`ReconciliationContext`] owns the id cache and the prototype registry for a
client session and turns wire commands into processor calls.

The target entity is resolved once per command. Whatever a processor returns
is fed forward into the next component of the same command, so a `Create`
carrying several components clones exactly one entity.
*/

use bevy::prelude::*;

use crate::ecs::plugins::reconcile::command::{ComponentSet, EntityCommand};
use crate::ecs::plugins::reconcile::error::{PrototypeError, ReconcileError};
use crate::ecs::plugins::reconcile::id_cache::EntityIdCache;
use crate::ecs::plugins::reconcile::operations::{
    AddProcessor, CreateProcessor, DeleteProcessor, EcsOperation, NetComponent, Opcode,
    OperationProcessor, RemoveProcessor, UpdateProcessor,
};
use crate::ecs::plugins::reconcile::prototype::PrototypeRegistry;
use crate::ecs::plugins::reconcile::store::{ComponentStore, NULL_ENTITY};

/// Session-wide reconciliation state, owned by the simulation loop.
#[derive(Resource)]
pub struct ReconciliationContext<S = World> {
    pub cache: EntityIdCache,
    pub registry: PrototypeRegistry<S>,
    /// Reject `Update`s of components the entity does not have.
    pub strict_update: bool,
}

impl<S> Default for ReconciliationContext<S> {
    fn default() -> Self {
        Self {
            cache: EntityIdCache::default(),
            registry: PrototypeRegistry::default(),
            strict_update: false,
        }
    }
}

impl<S: ComponentStore> ReconciliationContext<S> {
    pub fn new(registry: PrototypeRegistry<S>) -> Self {
        Self {
            registry,
            ..Default::default()
        }
    }

    pub fn with_strict_update(mut self, strict: bool) -> Self {
        self.strict_update = strict;
        self
    }

    /// The live entity for a network id, [`NULL_ENTITY`] while unknown.
    pub fn resolve(&mut self, id: i64, store: &S) -> Entity {
        self.cache.resolve(id, store)
    }

    /// Spawns a local-only entity from a prototype. It carries no network id.
    pub fn clone_entity(&self, type_path: &str, store: &mut S) -> Result<Entity, PrototypeError> {
        self.registry.clone_entity(type_path, store)
    }

    /// Returns the entity for `id`, reserving an empty one in the buffered
    /// table if the id has not been created yet. A later `Create` for the id
    /// builds its prototype into the reserved entity.
    pub fn reserve(&mut self, id: i64, store: &mut S) -> Entity {
        let entity = self.cache.resolve_or_buffered(id, store);
        if entity != NULL_ENTITY {
            return entity;
        }

        let entity = store.create();
        self.cache.buffer(id, entity);
        log::debug!("Reserved {:?} for id {} ahead of its create", entity, id);
        entity
    }

    /// Drops the reservation for `id` and despawns its still empty entity.
    /// Returns false if `id` had no live reservation.
    pub fn release(&mut self, id: i64, store: &mut S) -> bool {
        if self.cache.buffered(id, store).is_none() {
            return false;
        }
        match self.cache.unbuffer(id) {
            Some(entity) => {
                log::debug!("Released {:?} reserved for id {}", entity, id);
                store.destroy(entity)
            }
            None => false,
        }
    }

    /// Applies one wire command. Returns the entity it ended up targeting,
    /// or [`NULL_ENTITY`] if it was dropped.
    pub fn apply_command<C: ComponentSet>(
        &mut self,
        command: EntityCommand<C>,
        store: &mut S,
    ) -> Entity {
        let EntityCommand {
            id,
            type_path,
            opcode,
            components,
        } = command;

        let mut entity = self.cache.resolve(id, store);
        let mut reserved = false;
        if entity == NULL_ENTITY && opcode == Opcode::Create {
            if let Some(buffered) = self.cache.buffered(id, store) {
                entity = buffered;
                reserved = true;
            }
        }

        let mut dispatch = Dispatch {
            context: self,
            opcode,
            id,
            type_path: &type_path,
            entity,
            reserved,
            failed: false,
        };
        components.dispatch(&mut dispatch, store);
        dispatch.finish()
    }

    /// Applies `commands` strictly in order.
    pub fn apply_batch<C: ComponentSet>(
        &mut self,
        commands: impl IntoIterator<Item = EntityCommand<C>>,
        store: &mut S,
    ) -> Vec<Entity> {
        commands
            .into_iter()
            .map(|command| self.apply_command(command, store))
            .collect()
    }

    /// Applies `components` to an entity the caller already resolved.
    pub fn apply_to<C: ComponentSet>(
        &mut self,
        entity: Entity,
        id: i64,
        type_path: &str,
        opcode: Opcode,
        components: C,
        store: &mut S,
    ) -> Entity {
        let mut dispatch = Dispatch {
            context: self,
            opcode,
            id,
            type_path,
            entity,
            reserved: false,
            failed: false,
        };
        components.dispatch(&mut dispatch, store);
        dispatch.finish()
    }
}

/// State threaded through the components of a single command.
pub struct Dispatch<'a, S> {
    context: &'a mut ReconciliationContext<S>,
    opcode: Opcode,
    id: i64,
    type_path: &'a str,
    entity: Entity,
    reserved: bool,
    failed: bool,
}

impl<S: ComponentStore> Dispatch<'_, S> {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn type_path(&self) -> &str {
        self.type_path
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Runs the processor for this command's opcode on one component.
    pub fn step<T: NetComponent>(&mut self, data: T, store: &mut S) {
        if self.failed {
            return;
        }

        if self.entity == NULL_ENTITY && self.opcode != Opcode::Create {
            self.fail::<T>(ReconcileError::UnresolvedEntity(self.id));
            return;
        }

        let mut operation =
            EcsOperation::new(self.opcode, self.entity, self.id, self.type_path, data, store);
        operation.reserved = self.reserved;

        let result = match self.opcode {
            Opcode::Create => CreateProcessor::new(&self.context.registry).process(operation, store),
            Opcode::Add => AddProcessor.process(operation, store),
            Opcode::Update => UpdateProcessor {
                strict: self.context.strict_update,
            }
            .process(operation, store),
            Opcode::Remove => RemoveProcessor.process(operation, store),
            Opcode::Delete => DeleteProcessor.process(operation, store),
        };

        match result {
            Ok(entity) => {
                if self.opcode == Opcode::Create && (self.entity == NULL_ENTITY || self.reserved) {
                    self.context.cache.confirm(self.id, entity);
                    log::debug!("Created {:?} for id {} from '{}'", entity, self.id, self.type_path);
                }
                self.entity = entity;
                self.reserved = false;
            }
            // Only this component is rejected, the entity is still valid
            Err(error @ ReconcileError::MissingComponent { .. }) => {
                log::warn!("Skipping component of id {}: {}", self.id, error);
            }
            Err(error) => self.fail::<T>(error),
        }
    }

    fn fail<T>(&mut self, error: ReconcileError) {
        match &error {
            ReconcileError::UnknownPrototype(_) => {
                log::error!("Dropping {:?} for id {}: {}", self.opcode, self.id, error)
            }
            _ => log::debug!(
                "Dropping {:?} of {} for id {}: {}",
                self.opcode,
                std::any::type_name::<T>(),
                self.id,
                error
            ),
        }
        self.failed = true;
        self.entity = NULL_ENTITY;
    }

    fn finish(self) -> Entity {
        self.entity
    }
}
