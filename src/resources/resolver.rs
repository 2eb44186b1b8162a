//! Resource Resolution Interface
//!
//! The seam between the simulation core and the external resource
//! collaborator. Everything here is synchronous and already-cached: the
//! collaborator performs its async cache population before handing a
//! level to the simulation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::resources::config::{AnimationSet, EntityDefinition};

/// Opaque handle to a renderer-owned visual asset.
///
/// The simulation only stashes these into entity state for the draw
/// collaborator; it never inspects them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteHandle(pub String);

impl SpriteHandle {
    /// The sprite reference this handle resolves to.
    pub fn key(&self) -> &str {
        &self.0
    }
}

/// Synchronous access to cached resources.
pub trait ResourceResolver {
    /// Look up an entity definition by reference id.
    fn definition(&self, id: &str) -> Option<Arc<EntityDefinition>>;

    /// Look up an animation collection by reference id.
    fn animation(&self, id: &str) -> Option<Arc<AnimationSet>>;

    /// Look up a visual asset by reference id.
    fn sprite(&self, id: &str) -> Option<SpriteHandle>;
}

/// In-memory resolver used by tests and the demo binary.
///
/// Registering an animation also registers all of its frame sprites,
/// mirroring the collaborator's cache step that pre-caches every scene
/// frame when an animated entity loads.
#[derive(Default)]
pub struct InMemoryResources {
    definitions: HashMap<String, Arc<EntityDefinition>>,
    animations: HashMap<String, Arc<AnimationSet>>,
    sprites: HashMap<String, SpriteHandle>,
}

impl InMemoryResources {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity definition under `id`.
    pub fn insert_definition(&mut self, id: &str, def: EntityDefinition) {
        if !def.sprite.is_empty() {
            self.register_sprite(&def.sprite.clone());
        }
        self.definitions.insert(id.to_owned(), Arc::new(def));
    }

    /// Register an animation collection under `id`, caching its frames.
    pub fn insert_animation(&mut self, id: &str, set: AnimationSet) {
        for scene in &set.scenes {
            for frame in &scene.frame_sprite_ids {
                self.register_sprite(frame);
            }
        }
        debug!(id, scenes = set.scenes.len(), "cached animation collection");
        self.animations.insert(id.to_owned(), Arc::new(set));
    }

    /// Register a standalone sprite.
    pub fn register_sprite(&mut self, id: &str) {
        self.sprites
            .insert(id.to_owned(), SpriteHandle(id.to_owned()));
    }
}

impl ResourceResolver for InMemoryResources {
    fn definition(&self, id: &str) -> Option<Arc<EntityDefinition>> {
        self.definitions.get(id).cloned()
    }

    fn animation(&self, id: &str) -> Option<Arc<AnimationSet>> {
        self.animations.get(id).cloned()
    }

    fn sprite(&self, id: &str) -> Option<SpriteHandle> {
        self.sprites.get(id).cloned()
    }
}
