use bevy::prelude::*;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

/// Returned by a listener that can no longer handle notifications. The
/// listener is disabled afterwards.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ListenerError(pub String);

impl From<&str> for ListenerError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl From<String> for ListenerError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type ListenerFn<T> = Box<dyn FnMut(Entity, &T) -> Result<(), ListenerError> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListenerKind {
    Added,
    Removed,
}

struct Listener<T> {
    id: ListenerId,
    kind: ListenerKind,
    callback: ListenerFn<T>,
}

/// Added/removed detection state for one component type.
///
/// The store has no change notifications, so the tracker keeps a shadow copy
/// of every `T` it has seen and diffs against it once per tick. The shadow
/// also supplies the last value to removal listeners after the live
/// component is gone.
#[derive(Resource)]
pub struct ReactiveTracker<T: Component + Clone> {
    shadows: HashMap<Entity, T>,
    /// Shadows of removals reported this pass, discarded on the next one.
    removed: HashMap<Entity, T>,
    listeners: Vec<Listener<T>>,
    staged: Vec<Listener<T>>,
    next_id: u64,
}

impl<T: Component + Clone> Default for ReactiveTracker<T> {
    fn default() -> Self {
        Self {
            shadows: HashMap::new(),
            removed: HashMap::new(),
            listeners: Vec::new(),
            staged: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T: Component + Clone> ReactiveTracker<T> {
    /// Calls `listener` once for every entity that gains a `T`. Takes effect
    /// from the next detection pass.
    ///
    /// A listener that returns an error or panics is disabled; the other
    /// listeners still run. Builds with `panic = "abort"` cannot recover from
    /// the panic.
    pub fn on_added(
        &mut self,
        listener: impl FnMut(Entity, &T) -> Result<(), ListenerError> + Send + Sync + 'static,
    ) -> ListenerId {
        self.stage(ListenerKind::Added, Box::new(listener))
    }

    /// Calls `listener` with the last known value once an entity loses its
    /// `T` or is despawned. Takes effect from the next detection pass.
    pub fn on_removed(
        &mut self,
        listener: impl FnMut(Entity, &T) -> Result<(), ListenerError> + Send + Sync + 'static,
    ) -> ListenerId {
        self.stage(ListenerKind::Removed, Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len() + self.staged.len();
        self.listeners.retain(|listener| listener.id != id);
        self.staged.retain(|listener| listener.id != id);
        before != self.listeners.len() + self.staged.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len() + self.staged.len()
    }

    /// Number of entities currently tracked as carrying a `T`.
    pub fn tracked_len(&self) -> usize {
        self.shadows.len()
    }

    pub fn shadow(&self, entity: Entity) -> Option<&T> {
        self.shadows.get(&entity)
    }

    /// Last value of a `T` whose removal was reported by the latest pass.
    pub fn removed(&self, entity: Entity) -> Option<&T> {
        self.removed.get(&entity)
    }

    fn stage(&mut self, kind: ListenerKind, callback: ListenerFn<T>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.staged.push(Listener { id, kind, callback });
        id
    }

    pub(crate) fn activate_staged(&mut self) {
        self.listeners.append(&mut self.staged);
    }

    pub(crate) fn is_tracked(&self, entity: Entity) -> bool {
        self.shadows.contains_key(&entity)
    }

    pub(crate) fn tracked_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.shadows.keys().copied()
    }

    pub(crate) fn discard_removed(&mut self) {
        self.removed.clear();
    }

    pub(crate) fn refresh(&mut self, entity: Entity, value: T) {
        self.shadows.insert(entity, value);
    }

    pub(crate) fn notify_added(&mut self, entity: Entity, value: &T) {
        self.notify(ListenerKind::Added, entity, value);
    }

    /// Moves the shadow of `entity` out of tracking and reports it.
    pub(crate) fn notify_removed(&mut self, entity: Entity) {
        let Some(value) = self.shadows.remove(&entity) else {
            return;
        };
        self.notify(ListenerKind::Removed, entity, &value);
        self.removed.insert(entity, value);
    }

    fn notify(&mut self, kind: ListenerKind, entity: Entity, value: &T) {
        let component = std::any::type_name::<T>();
        self.listeners.retain_mut(|listener| {
            if listener.kind != kind {
                return true;
            }
            let callback = &mut listener.callback;
            match panic::catch_unwind(AssertUnwindSafe(|| callback(entity, value))) {
                Ok(Ok(())) => true,
                Ok(Err(error)) => {
                    log::error!(
                        "Disabling {:?} listener {:?} for {}: {}",
                        kind,
                        listener.id,
                        component,
                        error
                    );
                    false
                }
                Err(_) => {
                    log::error!(
                        "Disabling {:?} listener {:?} for {}: listener panicked",
                        kind,
                        listener.id,
                        component
                    );
                    false
                }
            }
        });
    }
}
