pub mod components;
pub mod plugin;
pub mod registry;
pub mod ws;

pub use components::{ConnectionEvent, ServerConnection, WireEnvelope};
pub use plugin::{NetworkMode, NetworkPlugin};
pub use registry::{WireAppExt, WireError, WireRegistry};
