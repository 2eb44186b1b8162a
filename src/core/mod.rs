//! Core simulation primitives.
//!
//! Domain-free geometry types shared by the collision index, the physics
//! resolver, and the entity components.

pub mod rect;

// Re-export core types
pub use rect::{Rect, TileRect};
