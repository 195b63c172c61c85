/*!
# Relation Plugin

Relational (not transform) parent/child links between network entities. The
server only sends [`Parent`] with links to its children; every tick the
children that exist locally get a [`Child`] pointing back at their parent.
Children whose `Create` has not arrived yet are picked up on a later tick.
*/

pub mod components;
pub mod plugin;
pub mod systems;

pub use components::{Child, Parent};
pub use plugin::RelationPlugin;
