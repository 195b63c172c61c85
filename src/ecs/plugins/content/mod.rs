pub mod components;
pub mod inventory;
pub mod plugin;
pub mod prototypes;

pub use components::*;
pub use inventory::{InventoryCommand, ItemChange, ItemState};
pub use plugin::ContentPlugin;
