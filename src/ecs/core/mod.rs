pub mod components;
pub mod plugin;
pub mod resources;

pub use components::{Destroy, DestroyAfter, Identity};
pub use plugin::CorePlugin;
pub use resources::ClientConfig;
