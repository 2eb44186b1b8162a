//! External Resource Interface
//!
//! Types and the resolver seam the simulation shares with the resource
//! collaborator. Loading, parsing, and caching live outside the core;
//! everything arriving here is already resolved.

pub mod config;
pub mod resolver;

// Re-export key types
pub use config::{
    AnimationSet, AnimationScene, ColorMapping, EntityDefinition, ResolvedLevel, TileGrid,
};
pub use resolver::{InMemoryResources, ResourceResolver, SpriteHandle};
