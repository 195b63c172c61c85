/*!
# Prototypes

Templates for network entities, addressed by a colon-delimited type path
such as `"1:1"` or `"ui:popup:3"`. Every segment but the last selects a
[`Prototyper`] in the [`PrototypeRegistry`] tree; the last one is the numeric
sub-id of an entry inside that prototyper.

Factories populate a freshly created entity instead of returning one, so a
prototype can also be instantiated into an entity that was reserved before
its `Create` command arrived.
*/

use bevy::prelude::*;
use std::collections::HashMap;

use crate::ecs::plugins::reconcile::error::PrototypeError;
use crate::ecs::plugins::reconcile::store::ComponentStore;

/// Populates or post-processes an entity of a store.
pub type PrototypeHook<S> = Box<dyn Fn(&mut S, Entity) + Send + Sync>;

/// Builds the components of a single prototype.
pub struct PrototypeEntry<S = World> {
    pub type_id: i16,
    factory: PrototypeHook<S>,
    after_create: Option<PrototypeHook<S>>,
    after_clone: Option<PrototypeHook<S>>,
}

impl<S> PrototypeEntry<S> {
    pub fn new(type_id: i16, factory: impl Fn(&mut S, Entity) + Send + Sync + 'static) -> Self {
        Self {
            type_id,
            factory: Box::new(factory),
            after_create: None,
            after_clone: None,
        }
    }

    pub fn after_create(mut self, hook: impl Fn(&mut S, Entity) + Send + Sync + 'static) -> Self {
        self.after_create = Some(Box::new(hook));
        self
    }

    pub fn after_clone(mut self, hook: impl Fn(&mut S, Entity) + Send + Sync + 'static) -> Self {
        self.after_clone = Some(Box::new(hook));
        self
    }
}

impl PrototypeEntry<World> {
    /// An entry that spawns a copy of `bundle` on every clone. The bundle is
    /// cloned per instance, so owned collections are never shared.
    pub fn from_bundle<B: Bundle + Clone>(type_id: i16, bundle: B) -> Self {
        Self::new(type_id, move |world: &mut World, entity| {
            world.entity_mut(entity).insert(bundle.clone());
        })
    }
}

/// All prototypes registered under one path segment.
pub struct Prototyper<S = World> {
    entries: HashMap<i16, PrototypeEntry<S>>,
    after_instantiate: Option<PrototypeHook<S>>,
}

impl<S> Default for Prototyper<S> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            after_instantiate: None,
        }
    }
}

impl<S> Prototyper<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, replacing any previous one with the same sub-id.
    pub fn register(&mut self, entry: PrototypeEntry<S>) -> &mut Self {
        self.entries.insert(entry.type_id, entry);
        self
    }

    /// Hook that runs last for every instance of this prototyper.
    pub fn after_instantiate(
        &mut self,
        hook: impl Fn(&mut S, Entity) + Send + Sync + 'static,
    ) -> &mut Self {
        self.after_instantiate = Some(Box::new(hook));
        self
    }

    pub fn contains(&self, type_id: i16) -> bool {
        self.entries.contains_key(&type_id)
    }

    fn build(&self, store: &mut S, entity: Entity, type_id: i16) {
        let Some(entry) = self.entries.get(&type_id) else {
            return;
        };

        (entry.factory)(store, entity);
        if let Some(hook) = &entry.after_create {
            hook(store, entity);
        }
        if let Some(hook) = &entry.after_clone {
            hook(store, entity);
        }
        if let Some(hook) = &self.after_instantiate {
            hook(store, entity);
        }
    }
}

struct PrototypeNode<S> {
    prototyper: Option<Prototyper<S>>,
    children: HashMap<String, PrototypeNode<S>>,
}

impl<S> Default for PrototypeNode<S> {
    fn default() -> Self {
        Self {
            prototyper: None,
            children: HashMap::new(),
        }
    }
}

/// Parsed form of a type path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypePath<'a> {
    pub segments: Vec<&'a str>,
    pub sub_id: i16,
}

impl<'a> TypePath<'a> {
    pub fn parse(path: &'a str) -> Result<Self, PrototypeError> {
        let mut segments: Vec<&str> = path.split(':').collect();
        let sub_id = segments.pop().unwrap_or_default();

        if segments.is_empty() || segments.iter().any(|segment| segment.is_empty()) {
            return Err(PrototypeError::MalformedPath(path.to_string()));
        }

        let sub_id = sub_id
            .trim()
            .parse::<i16>()
            .map_err(|_| PrototypeError::InvalidSubId {
                path: path.to_string(),
                sub_id: sub_id.to_string(),
            })?;

        Ok(Self { segments, sub_id })
    }
}

/// Tree of prototypers keyed by path segment.
pub struct PrototypeRegistry<S = World> {
    root: PrototypeNode<S>,
}

impl<S> Default for PrototypeRegistry<S> {
    fn default() -> Self {
        Self {
            root: PrototypeNode::default(),
        }
    }
}

impl<S: ComponentStore> PrototypeRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `prototyper` under `segment`, which may itself contain
    /// colons to nest deeper (`"ui:popup"`).
    pub fn register(&mut self, segment: &str, prototyper: Prototyper<S>) -> &mut Self {
        let mut node = &mut self.root;
        for part in segment.split(':') {
            node = node.children.entry(part.to_string()).or_default();
        }

        if node.prototyper.is_some() {
            log::warn!("Replacing prototyper registered under '{}'", segment);
        }
        node.prototyper = Some(prototyper);
        self
    }

    /// Whether `path` names a registered prototype.
    pub fn contains(&self, path: &str) -> bool {
        self.lookup(path).is_ok()
    }

    /// Creates a new entity from the prototype named by `path`, running the
    /// factory, then the after-clone hooks, then the after-instantiate hook.
    pub fn clone_entity(&self, path: &str, store: &mut S) -> Result<Entity, PrototypeError> {
        let (prototyper, sub_id) = self.lookup(path)?;
        let entity = store.create();
        prototyper.build(store, entity, sub_id);
        Ok(entity)
    }

    /// Runs the prototype named by `path` on an entity that already exists.
    pub fn instantiate_into(
        &self,
        path: &str,
        store: &mut S,
        entity: Entity,
    ) -> Result<(), PrototypeError> {
        let (prototyper, sub_id) = self.lookup(path)?;
        if !store.exists(entity) {
            return Err(PrototypeError::MissingTarget(entity));
        }
        prototyper.build(store, entity, sub_id);
        Ok(())
    }

    fn lookup(&self, path: &str) -> Result<(&Prototyper<S>, i16), PrototypeError> {
        let parsed = TypePath::parse(path)?;

        let mut node = &self.root;
        for segment in &parsed.segments {
            node = node
                .children
                .get(*segment)
                .ok_or_else(|| PrototypeError::UnknownSegment {
                    path: path.to_string(),
                    segment: segment.to_string(),
                })?;
        }

        let prototyper = node
            .prototyper
            .as_ref()
            .ok_or_else(|| PrototypeError::UnknownSegment {
                path: path.to_string(),
                segment: parsed.segments.join(":"),
            })?;

        if !prototyper.contains(parsed.sub_id) {
            return Err(PrototypeError::UnknownSubId {
                path: path.to_string(),
                sub_id: parsed.sub_id,
            });
        }

        Ok((prototyper, parsed.sub_id))
    }
}
