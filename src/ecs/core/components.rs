use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Server identity of a network-visible entity.
///
/// `id` is assigned by the server and unique across the session; `type_path`
/// names the prototype the entity was cloned from (e.g. `"1:1"`). At most one
/// live entity carries a given `id` on the client.
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    #[serde(rename = "type")]
    pub type_path: String,
}

impl Identity {
    pub fn new(id: i64, type_path: impl Into<String>) -> Self {
        Self {
            id,
            type_path: type_path.into(),
        }
    }
}

/// Schedules the entity for destruction once `ticks` sweeps have passed.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyAfter {
    pub ticks: u32,
}

impl Default for DestroyAfter {
    fn default() -> Self {
        Self { ticks: 1 }
    }
}

/// Terminal marker: the entity is despawned by the next destroy sweep.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Destroy;
