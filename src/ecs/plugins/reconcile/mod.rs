pub mod command;
pub mod components;
pub mod dispatcher;
pub mod entity_link;
pub mod error;
pub mod id_cache;
pub mod operations;
pub mod plugin;
pub mod prototype;
pub mod store;
pub mod systems;

pub use command::{ApplyCommand, BatchCommand, ComponentCommand, ComponentSet, EntityCommand, Outcome};
pub use components::{BoxedCommand, InboundCommands, InboundSender, PendingCommands};
pub use dispatcher::{Dispatch, ReconciliationContext};
pub use entity_link::EntityLink;
pub use error::{PrototypeError, ReconcileError};
pub use id_cache::EntityIdCache;
pub use operations::{NetComponent, Opcode};
pub use plugin::{PrototypeAppExt, ReconcilePlugin};
pub use prototype::{PrototypeEntry, PrototypeRegistry, Prototyper, TypePath};
pub use store::{ComponentStore, NULL_ENTITY};
