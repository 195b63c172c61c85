use bevy::prelude::*;
use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};

/// Outer frame of every server message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireEnvelope {
    pub shape: String,
    pub payload: serde_json::Value,
}

impl WireEnvelope {
    pub fn new(shape: impl Into<String>, payload: impl Serialize) -> Result<Self, serde_json::Error> {
        Ok(Self {
            shape: shape.into(),
            payload: serde_json::to_value(payload)?,
        })
    }
}

/// Connection changes reported by the network thread.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Connected { url: String },
    Disconnected { url: String },
}

#[derive(Resource)]
pub struct ConnectionEventChannel(pub Receiver<ConnectionEvent>);

/// What the tick knows about the server link.
#[derive(Resource, Debug, Default)]
pub struct ServerConnection {
    pub connected: bool,
    pub connections: u32,
}
