use bevy::prelude::*;
use glam::{DVec2, Quat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ecs::plugins::reconcile::EntityLink;

// ============================================================================
// CHARACTERS
// ============================================================================

#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self {
            current: 100.0,
            max: 100.0,
        }
    }
}

impl Health {
    pub fn new(current: f32, max: f32) -> Self {
        Self { current, max }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub speed: f32,
}

impl Default for Movement {
    fn default() -> Self {
        Self { speed: 5.0 }
    }
}

// ============================================================================
// TRANSFORM
// ============================================================================

/// Server position as longitude/latitude.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkTransform {
    pub position: DVec2,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkRotation {
    pub value: Quat,
}

impl Default for NetworkRotation {
    fn default() -> Self {
        Self {
            value: Quat::IDENTITY,
        }
    }
}

// ============================================================================
// VISUALS
// ============================================================================

/// Content id of the 3D model, resolved by the renderer.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub id: i16,
    pub instantiate: bool,
}

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub id: i16,
}

/// Localization keys, e.g. `"name" -> 23`.
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Localizations {
    pub map: HashMap<String, i16>,
}

impl Localizations {
    pub fn with(key: &str, value: i16) -> Self {
        Self {
            map: HashMap::from([(key.to_string(), value)]),
        }
    }
}

// ============================================================================
// ITEMS & RECIPES
// ============================================================================

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub amount: u32,
}

/// Items owned by a character, as links to the item entities.
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub items: Vec<EntityLink>,
}

impl Inventory {
    pub fn contains(&self, id: i64) -> bool {
        self.items.iter().any(|link| link.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(rename = "type")]
    pub type_path: String,
    pub amount: u32,
}

#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub ingredients: Vec<Ingredient>,
}

/// Recipes a character is able to build.
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildRecipes {
    pub recipes: Vec<EntityLink>,
}

// ============================================================================
// USER INTERFACE
// ============================================================================

#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    /// The entity the popup was opened for.
    pub target: Option<EntityLink>,
}
