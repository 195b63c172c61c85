pub mod core;
pub mod plugins;

pub use plugins::{ContentPlugin, NetworkPlugin, ReconcilePlugin, RelationPlugin};
