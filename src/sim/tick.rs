//! Simulation Facade and Component Scheduler
//!
//! [`Simulation`] owns the live level state, the static collision index,
//! and a handle to the resource resolver. Each call to
//! [`Simulation::tick`] advances every entity through its declared
//! capabilities in a fixed component order:
//!
//! ```text
//! for each entity (spawn order):
//!     physics -> animation -> door -> player -> ai
//!         -> receiver timer decay -> damage emitter
//! ```
//!
//! The order is part of the contract: receiver timers decay before
//! emitters scan, so a hit taken this tick is already protected from the
//! next emitter in the same pass.

use glam::Vec2;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::info;

use crate::resources::config::ResolvedLevel;
use crate::resources::resolver::ResourceResolver;
use crate::sim::collision::CollisionIndex;
use crate::sim::door::LevelRequest;
use crate::sim::entity::{EntityId, EntityState, LevelState};
use crate::sim::input::InputFrame;
use crate::sim::{ai, animation, damage, door, physics, player};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Global simulation tuning, shared by every component.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// World gravity (negative = down), world units per second squared.
    pub gravity: f32,
    /// Penetration-resolution passes per physics step.
    pub max_resolve_iterations: u32,
    /// Minimum downward impact speed for a floor rebound.
    pub bounce_min_impulse: f32,
    /// Post-resolution velocities below this snap to zero.
    pub tiny_velocity_cutoff: f32,
    /// Seconds after a hit during which the player can bounce off the
    /// damaged entity.
    pub damage_feedback_window: f32,
    /// How far ahead of its footprint a patroller probes for geometry.
    pub ai_probe_distance: f32,
    /// Speed above which a grounded AI shows its walk scene.
    pub walk_speed_threshold: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            max_resolve_iterations: 3,
            bounce_min_impulse: 0.5,
            tiny_velocity_cutoff: 0.01,
            damage_feedback_window: 0.2,
            ai_probe_distance: 0.1,
            walk_speed_threshold: 0.1,
        }
    }
}

// =============================================================================
// TICK RESULT / ERRORS
// =============================================================================

/// Everything a tick asks of the embedding loop.
#[derive(Clone, Debug, Default)]
pub struct TickResult {
    /// Set when a door triggered this tick. First trigger wins.
    pub level_request: Option<LevelRequest>,
}

/// Errors loading a level into the simulation.
#[derive(Debug, Error)]
pub enum LevelError {
    /// Collision and entity layers disagree on grid dimensions.
    #[error(
        "level '{name}': collision layer is {cw}x{ch} but entity layer is {ew}x{eh}"
    )]
    LayerSizeMismatch {
        /// Level name.
        name: String,
        /// Collision layer width.
        cw: usize,
        /// Collision layer height.
        ch: usize,
        /// Entity layer width.
        ew: usize,
        /// Entity layer height.
        eh: usize,
    },
}

// =============================================================================
// SIMULATION
// =============================================================================

/// The simulation core: level state, collision geometry, and the
/// per-tick component scheduler, generic over the resource seam.
pub struct Simulation<R: ResourceResolver> {
    resources: R,
    config: SimConfig,
    collision: CollisionIndex,
    state: LevelState,
}

impl<R: ResourceResolver> Simulation<R> {
    /// Create a simulation with no level loaded.
    pub fn new(resources: R, config: SimConfig) -> Self {
        Self {
            resources,
            config,
            collision: CollisionIndex::empty(),
            state: LevelState::new(),
        }
    }

    /// Replace the current level: rebuild collision geometry and respawn
    /// entities from the level's entity layer.
    pub fn load_level(&mut self, level: &ResolvedLevel) -> Result<(), LevelError> {
        let (cw, ch) = (level.collision.width(), level.collision.height());
        let (ew, eh) = (level.entities.width(), level.entities.height());
        if (cw, ch) != (ew, eh) {
            return Err(LevelError::LayerSizeMismatch {
                name: level.name.clone(),
                cw,
                ch,
                ew,
                eh,
            });
        }

        self.collision = CollisionIndex::build(&level.collision);
        self.state.reset(&level.name);
        self.state.spawn_from_grid(&level.entities, &self.resources);

        info!(
            level = %level.name,
            rects = self.collision.rects().len(),
            entities = self.state.entities().len(),
            "level loaded"
        );
        Ok(())
    }

    /// Advance the simulation by `dt` seconds with the given input.
    pub fn tick(&mut self, input: &InputFrame, dt: f32) -> TickResult {
        self.state.time += dt;

        let mut result = TickResult::default();

        for i in 0..self.state.entities.len() {
            physics::step(&mut self.state.entities[i], &self.collision, &self.config, dt);

            animation::tick_animation(&mut self.state.entities[i], &self.resources, dt);

            if result.level_request.is_none() {
                result.level_request = door::tick_door(&self.state, i, input);
            }

            player::tick_player(&mut self.state, i, input, &self.config, &self.resources, dt);

            ai::tick_ai(&mut self.state, i, &self.collision, &self.config, &self.resources);

            damage::decay_receiver_timer(&mut self.state.entities[i], dt);

            damage::tick_emitter(&mut self.state, i);
        }

        result
    }

    /// Current simulation tuning.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The static collision geometry of the loaded level.
    pub fn collision_index(&self) -> &CollisionIndex {
        &self.collision
    }

    /// Seconds of simulation since the level loaded.
    pub fn time(&self) -> f32 {
        self.state.time
    }

    /// Read-only view of the live entities for draw submission.
    pub fn entities(&self) -> &[EntityState] {
        self.state.entities()
    }

    /// Look up an entity by id.
    pub fn find_entity_by_id(&self, id: EntityId) -> Option<&EntityState> {
        self.state.find_by_id(id)
    }

    /// Look up an entity by definition name.
    pub fn find_entity_by_name(&self, name: &str) -> Option<&EntityState> {
        self.state.find_by_name(name)
    }

    /// The entity the external camera should follow, if any.
    pub fn camera_target(&self) -> Option<&EntityState> {
        self.state.entities().iter().find(|e| e.camera_target)
    }

    /// Spawn an entity into the running level by definition reference.
    pub fn spawn(&mut self, definition_id: &str, position: Vec2) -> Option<EntityId> {
        let def = self.resources.definition(definition_id)?;
        Some(self.state.spawn(def, position, &self.resources))
    }
}
