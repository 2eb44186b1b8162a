//! # Tilestride
//!
//! Tick-based simulation core for 2D tile-grid platformers.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       TILESTRIDE                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Geometry primitives                       │
//! │  └── rect.rs     - Tile-space and world-space rects          │
//! │                                                              │
//! │  resources/      - Resource configuration and resolution     │
//! │  ├── config.rs   - Entity definitions, animations, grids     │
//! │  └── resolver.rs - The resource-cache seam                   │
//! │                                                              │
//! │  sim/            - The simulation core                       │
//! │  ├── input.rs    - Per-frame input snapshot                  │
//! │  ├── entity.rs   - Entity state and the live roster          │
//! │  ├── collision.rs- Merged level geometry and queries         │
//! │  ├── physics.rs  - Integration and penetration resolution    │
//! │  ├── player.rs   - Player control component                  │
//! │  ├── ai.rs       - Patrol AI component                       │
//! │  ├── animation.rs- Scene and frame state machine             │
//! │  ├── damage.rs   - Emitter/receiver damage exchange          │
//! │  ├── door.rs     - Level-switch triggers                     │
//! │  └── tick.rs     - Simulation facade and scheduler           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design
//!
//! Entity behaviour is capability-driven: an entity definition declares a
//! capability by carrying its parameter block, and the scheduler ticks
//! exactly the components whose capabilities are declared, in a fixed
//! order. Components communicate only through shared entity state -
//! never by calling each other.
//!
//! The simulation core is self-contained and renderer-agnostic: drawing,
//! cameras, audio, and asset loading live behind the
//! [`resources::ResourceResolver`] seam and the read-only views on
//! [`sim::Simulation`]. Level switches surface as [`sim::LevelRequest`]
//! values rather than being performed internally.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod resources;
pub mod sim;

// Re-export commonly used types
pub use crate::core::rect::{Rect, TileRect};
pub use resources::config::{EntityDefinition, ResolvedLevel, TileGrid};
pub use resources::resolver::{InMemoryResources, ResourceResolver, SpriteHandle};
pub use sim::{
    CollisionIndex, EntityId, EntityState, InputFrame, LevelRequest, SimConfig, Simulation,
    TickResult,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
