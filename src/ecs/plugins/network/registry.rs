/*!
# Wire Registry

Maps the `shape` tag of a [`WireEnvelope`] to a decoder for one concrete
command type. Decoding runs on the network thread; only fully typed,
boxed commands cross into the tick.
*/

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;

use crate::ecs::plugins::network::components::WireEnvelope;
use crate::ecs::plugins::reconcile::{ApplyCommand, BoxedCommand};

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("malformed envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("no decoder registered for shape '{0}'")]
    UnknownShape(String),

    #[error("malformed '{shape}' payload: {source}")]
    Payload {
        shape: String,
        #[source]
        source: serde_json::Error,
    },
}

type Decoder = Arc<dyn Fn(serde_json::Value) -> Result<BoxedCommand, serde_json::Error> + Send + Sync>;

/// Shape tag to decoder table. Cloning is cheap, the network thread gets
/// its own copy when it starts.
#[derive(Resource, Default, Clone)]
pub struct WireRegistry {
    decoders: HashMap<String, Decoder>,
}

impl WireRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes payloads tagged `shape` as `C`.
    pub fn register<C>(&mut self, shape: &str) -> &mut Self
    where
        C: ApplyCommand + DeserializeOwned,
    {
        let decoder: Decoder = Arc::new(|payload: serde_json::Value| {
            serde_json::from_value::<C>(payload).map(|command| Box::new(command) as BoxedCommand)
        });
        if self.decoders.insert(shape.to_string(), decoder).is_some() {
            log::warn!("Replacing decoder for wire shape '{}'", shape);
        }
        self
    }

    pub fn contains(&self, shape: &str) -> bool {
        self.decoders.contains_key(shape)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    pub fn decode(&self, text: &str) -> Result<BoxedCommand, WireError> {
        let envelope: WireEnvelope = serde_json::from_str(text).map_err(WireError::Envelope)?;
        self.decode_envelope(envelope)
    }

    pub fn decode_envelope(&self, envelope: WireEnvelope) -> Result<BoxedCommand, WireError> {
        let decoder = self
            .decoders
            .get(&envelope.shape)
            .ok_or_else(|| WireError::UnknownShape(envelope.shape.clone()))?;

        decoder(envelope.payload).map_err(|source| WireError::Payload {
            shape: envelope.shape,
            source,
        })
    }
}

pub trait WireAppExt {
    fn register_wire_shape<C>(&mut self, shape: &str) -> &mut Self
    where
        C: ApplyCommand + DeserializeOwned;
}

impl WireAppExt for App {
    fn register_wire_shape<C>(&mut self, shape: &str) -> &mut Self
    where
        C: ApplyCommand + DeserializeOwned,
    {
        self.world_mut()
            .get_resource_or_insert_with(WireRegistry::default)
            .register::<C>(shape);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::plugins::reconcile::EntityCommand;

    fn registry() -> WireRegistry {
        let mut registry = WireRegistry::new();
        registry.register::<EntityCommand<()>>("entity");
        registry
    }

    #[test]
    fn decodes_registered_shapes() {
        let text = r#"{
            "shape": "entity",
            "payload": { "id": 1, "type": "1:1", "opcode": "Create", "components": null }
        }"#;
        let command = registry().decode(text).unwrap();
        assert!(command.label().contains("EntityCommand"));
    }

    #[test]
    fn rejects_unknown_and_malformed_messages() {
        let registry = registry();

        assert!(matches!(registry.decode("not json"), Err(WireError::Envelope(_))));
        assert!(matches!(
            registry.decode(r#"{ "shape": "chat", "payload": {} }"#),
            Err(WireError::UnknownShape(shape)) if shape == "chat"
        ));
        assert!(matches!(
            registry.decode(r#"{ "shape": "entity", "payload": { "id": "x" } }"#),
            Err(WireError::Payload { .. })
        ));
    }
}
