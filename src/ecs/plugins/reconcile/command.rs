/*!
# Wire Commands

The shapes the server pushes at the client. An [`EntityCommand`] carries an
opcode, the target's network id and type path, and a tuple of zero to eight
component payloads which are applied, in order, to one entity.

Commands reach the tick as boxed [`ApplyCommand`] trait objects so that the
transport does not need to know their concrete component types.
*/

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ecs::core::Identity;
use crate::ecs::plugins::reconcile::dispatcher::{Dispatch, ReconciliationContext};
use crate::ecs::plugins::reconcile::operations::{NetComponent, Opcode};
use crate::ecs::plugins::reconcile::store::{ComponentStore, NULL_ENTITY};

/// A tuple of component payloads, applied left to right to the same entity.
pub trait ComponentSet: Send + Sync + 'static {
    const ARITY: usize;

    fn dispatch<S: ComponentStore>(self, dispatch: &mut Dispatch<'_, S>, store: &mut S);
}

/// Without payloads the opcode acts on the entity's [`Identity`].
impl ComponentSet for () {
    const ARITY: usize = 0;

    fn dispatch<S: ComponentStore>(self, dispatch: &mut Dispatch<'_, S>, store: &mut S) {
        let identity = Identity::new(dispatch.id(), dispatch.type_path());
        dispatch.step(identity, store);
    }
}

macro_rules! impl_component_set {
    ($arity:expr; $($name:ident),+) => {
        impl<$($name: NetComponent),+> ComponentSet for ($($name,)+) {
            const ARITY: usize = $arity;

            #[allow(non_snake_case)]
            fn dispatch<S: ComponentStore>(self, dispatch: &mut Dispatch<'_, S>, store: &mut S) {
                let ($($name,)+) = self;
                $(dispatch.step($name, store);)+
            }
        }
    };
}

impl_component_set!(1; T1);
impl_component_set!(2; T1, T2);
impl_component_set!(3; T1, T2, T3);
impl_component_set!(4; T1, T2, T3, T4);
impl_component_set!(5; T1, T2, T3, T4, T5);
impl_component_set!(6; T1, T2, T3, T4, T5, T6);
impl_component_set!(7; T1, T2, T3, T4, T5, T6, T7);
impl_component_set!(8; T1, T2, T3, T4, T5, T6, T7, T8);

/// `{ "id", "type", "opcode", "components": [..] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityCommand<C> {
    pub id: i64,
    #[serde(rename = "type")]
    pub type_path: String,
    pub opcode: Opcode,
    pub components: C,
}

impl<C: ComponentSet> EntityCommand<C> {
    pub fn new(id: i64, type_path: impl Into<String>, opcode: Opcode, components: C) -> Self {
        Self {
            id,
            type_path: type_path.into(),
            opcode,
            components,
        }
    }

    pub fn create(id: i64, type_path: impl Into<String>, components: C) -> Self {
        Self::new(id, type_path, Opcode::Create, components)
    }
}

impl EntityCommand<()> {
    /// Schedules the entity carrying `id` for destruction.
    pub fn delete(id: i64) -> Self {
        Self::new(id, String::new(), Opcode::Delete, ())
    }
}

/// A single component change addressed only by network id. The target may
/// be a live entity or one reserved through the buffered table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentCommand<T> {
    pub id: i64,
    pub opcode: Opcode,
    pub component: T,
}

/// Commands sharing one wire message, applied strictly in array order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchCommand<C> {
    pub commands: Vec<C>,
}

impl<C> From<Vec<C>> for BatchCommand<C> {
    fn from(commands: Vec<C>) -> Self {
        Self { commands }
    }
}

// ============================================================================
// TICK-SIDE APPLICATION
// ============================================================================

/// Result of applying a command during a tick.
pub enum Outcome {
    Applied,
    /// The command depends on an entity that is not known yet and should be
    /// retried on a later tick.
    Deferred(Box<dyn ApplyCommand>),
}

/// A decoded command ready to run against the world.
pub trait ApplyCommand: Send + Sync + 'static {
    fn apply(self: Box<Self>, context: &mut ReconciliationContext, world: &mut World) -> Outcome;

    fn label(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<C: ComponentSet> ApplyCommand for EntityCommand<C> {
    fn apply(self: Box<Self>, context: &mut ReconciliationContext, world: &mut World) -> Outcome {
        context.apply_command(*self, world);
        Outcome::Applied
    }
}

impl<T: NetComponent> ApplyCommand for ComponentCommand<T> {
    fn apply(self: Box<Self>, context: &mut ReconciliationContext, world: &mut World) -> Outcome {
        if self.opcode == Opcode::Create {
            log::warn!(
                "Dropping component create for id {}: creation needs a type path",
                self.id
            );
            return Outcome::Applied;
        }

        let entity = context.cache.resolve_or_buffered(self.id, world);
        if entity == NULL_ENTITY {
            log::debug!(
                "Dropping {:?} of {} for unknown id {}",
                self.opcode,
                std::any::type_name::<T>(),
                self.id
            );
            return Outcome::Applied;
        }

        let ComponentCommand {
            id,
            opcode,
            component,
        } = *self;
        context.apply_to(entity, id, "", opcode, (component,), world);
        Outcome::Applied
    }
}

impl<C: ApplyCommand> ApplyCommand for BatchCommand<C> {
    fn apply(self: Box<Self>, context: &mut ReconciliationContext, world: &mut World) -> Outcome {
        let mut deferred: Vec<Box<dyn ApplyCommand>> = Vec::new();
        for command in self.commands {
            if let Outcome::Deferred(command) = Box::new(command).apply(context, world) {
                deferred.push(command);
            }
        }

        if deferred.is_empty() {
            Outcome::Applied
        } else {
            Outcome::Deferred(Box::new(deferred))
        }
    }
}

/// What remains of a batch after some of its commands were deferred.
impl ApplyCommand for Vec<Box<dyn ApplyCommand>> {
    fn apply(self: Box<Self>, context: &mut ReconciliationContext, world: &mut World) -> Outcome {
        let mut deferred: Vec<Box<dyn ApplyCommand>> = Vec::new();
        for command in *self {
            if let Outcome::Deferred(command) = command.apply(context, world) {
                deferred.push(command);
            }
        }

        if deferred.is_empty() {
            Outcome::Applied
        } else {
            Outcome::Deferred(Box::new(deferred))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Health {
        current: i32,
        max: i32,
    }

    #[test]
    fn entity_command_wire_format() {
        let json = r#"{
            "id": 10,
            "type": "1:1",
            "opcode": "Add",
            "components": [{ "current": 80, "max": 100 }]
        }"#;

        let command: EntityCommand<(Health,)> = serde_json::from_str(json).unwrap();
        assert_eq!(command.id, 10);
        assert_eq!(command.type_path, "1:1");
        assert_eq!(command.opcode, Opcode::Add);
        assert_eq!(command.components.0, Health { current: 80, max: 100 });
    }

    #[test]
    fn zero_component_commands_carry_null() {
        let json = r#"{ "id": 4, "type": "3:1", "opcode": "Delete", "components": null }"#;
        let command: EntityCommand<()> = serde_json::from_str(json).unwrap();
        assert_eq!(command.opcode, Opcode::Delete);
    }

    #[test]
    fn batches_are_plain_arrays() {
        let json = r#"[
            { "id": 1, "type": "1:1", "opcode": "Create", "components": null },
            { "id": 2, "type": "1:1", "opcode": "Create", "components": null }
        ]"#;
        let batch: BatchCommand<EntityCommand<()>> = serde_json::from_str(json).unwrap();
        let ids: Vec<i64> = batch.commands.iter().map(|command| command.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    fn context() -> ReconciliationContext {
        ReconciliationContext::default()
    }

    fn component(id: i64, opcode: Opcode, current: i32) -> Box<ComponentCommand<Health>> {
        Box::new(ComponentCommand {
            id,
            opcode,
            component: Health { current, max: 100 },
        })
    }

    #[test]
    fn component_commands_reach_reserved_entities() {
        let mut context = context();
        let mut world = World::new();
        let reserved = context.reserve(5, &mut world);

        let outcome = component(5, Opcode::Add, 30).apply(&mut context, &mut world);

        assert!(matches!(outcome, Outcome::Applied));
        assert_eq!(world.get::<Health>(reserved), Some(&Health { current: 30, max: 100 }));
        assert!(context.cache.is_buffered(5));
        assert_eq!(world.entities().len(), 1);
    }

    #[test]
    fn component_commands_prefer_live_entities() {
        let mut context = context();
        let mut world = World::new();
        let live = world
            .spawn((Identity::new(6, "1:1"), Health { current: 1, max: 100 }))
            .id();

        component(6, Opcode::Update, 55).apply(&mut context, &mut world);
        assert_eq!(world.get::<Health>(live), Some(&Health { current: 55, max: 100 }));

        component(6, Opcode::Remove, 0).apply(&mut context, &mut world);
        assert!(world.get::<Health>(live).is_none());
    }

    #[test]
    fn component_create_is_dropped() {
        let mut context = context();
        let mut world = World::new();
        let live = world.spawn(Identity::new(7, "1:1")).id();

        let outcome = component(7, Opcode::Create, 10).apply(&mut context, &mut world);

        assert!(matches!(outcome, Outcome::Applied));
        assert!(world.get::<Health>(live).is_none());
        assert_eq!(world.entities().len(), 1);
    }

    #[test]
    fn component_commands_for_unknown_ids_are_dropped() {
        let mut context = context();
        let mut world = World::new();

        let outcome = component(8, Opcode::Add, 10).apply(&mut context, &mut world);

        assert!(matches!(outcome, Outcome::Applied));
        assert_eq!(world.entities().len(), 0);
        assert!(!context.cache.is_buffered(8));
    }

    #[test]
    fn arity_is_tracked_per_shape() {
        assert_eq!(<() as ComponentSet>::ARITY, 0);
        assert_eq!(<(Health,) as ComponentSet>::ARITY, 1);
        assert_eq!(<(Health, Health, Health) as ComponentSet>::ARITY, 3);
    }
}
