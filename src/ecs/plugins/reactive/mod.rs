/*!
# Reactive Notifications

Added/removed callbacks for any component type, layered over a store that
has no change notifications of its own. Enable it per type with
[`ReactiveAppExt::add_reactive`] and subscribe on [`ReactiveTracker<T>`].

Additions are reported during the first detection pass that sees the
component; removals during the first pass that misses it, with the value it
last had. Entities also carry a [`ReactiveAdded<T>`] or
[`ReactiveRemoved<T>`] marker for exactly one tick.
*/

pub mod components;
pub mod plugin;
pub mod systems;
pub mod tracker;

pub use components::{ReactiveAdded, ReactiveRemoved};
pub use plugin::{ReactiveAppExt, ReactiveSet};
pub use tracker::{ListenerError, ListenerFn, ListenerId, ReactiveTracker};
