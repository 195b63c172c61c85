use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ecs::plugins::reconcile::EntityLink;

#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parent {
    pub children: Vec<EntityLink>,
}

/// Back link from a child to its relational parent. Maintained locally.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub parent: EntityLink,
}
