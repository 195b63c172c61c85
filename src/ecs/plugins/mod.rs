pub mod content;
pub mod network;
pub mod reactive;
pub mod reconcile;
pub mod relation;

pub use content::ContentPlugin;
pub use network::{NetworkMode, NetworkPlugin};
pub use reactive::ReactiveAppExt;
pub use reconcile::ReconcilePlugin;
pub use relation::RelationPlugin;
