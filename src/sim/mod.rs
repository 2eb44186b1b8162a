//! Simulation Module
//!
//! The tick-driven simulation core. One [`Simulation`] per loaded level.
//!
//! ## Module Structure
//!
//! - `input`: Per-frame input snapshot
//! - `entity`: Entity state and the live-entity roster
//! - `collision`: Static level geometry and overlap queries
//! - `physics`: Integration and penetration resolution
//! - `player`: Player control component
//! - `ai`: AI behaviours (patrol)
//! - `animation`: Scene and frame state machine
//! - `damage`: Emitter/receiver damage exchange
//! - `door`: Level-switch triggers
//! - `tick`: The simulation facade and component scheduler

pub mod input;
pub mod entity;
pub mod collision;
pub mod physics;
pub mod player;
pub mod ai;
pub mod animation;
pub mod damage;
pub mod door;
pub mod tick;

// Re-export key types
pub use input::InputFrame;
pub use entity::{EntityId, EntityState, LevelState};
pub use collision::{CollisionHit, CollisionIndex};
pub use door::LevelRequest;
pub use tick::{LevelError, SimConfig, Simulation, TickResult};
