use bevy::prelude::Entity;

/// Failures while resolving a type path against the prototype hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrototypeError {
    #[error("type path '{0}' is empty or has no sub-id")]
    MalformedPath(String),

    #[error("type path '{path}' has a non-numeric sub-id '{sub_id}'")]
    InvalidSubId { path: String, sub_id: String },

    #[error("no prototyper registered for segment '{segment}' of '{path}'")]
    UnknownSegment { path: String, segment: String },

    #[error("prototyper for '{path}' has no prototype with sub-id {sub_id}")]
    UnknownSubId { path: String, sub_id: i16 },

    #[error("entity {0:?} does not exist, cannot instantiate into it")]
    MissingTarget(Entity),
}

/// Why a single operation was dropped. None of these escape the tick.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    #[error("prototype not found: {0}")]
    UnknownPrototype(#[from] PrototypeError),

    #[error("entity {entity:?} vanished before {component} could be applied")]
    StaleEntity {
        entity: Entity,
        component: &'static str,
    },

    #[error("strict update of {component} on {entity:?}, but the component is missing")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("no entity is known for network id {0}")]
    UnresolvedEntity(i64),
}
