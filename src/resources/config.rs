//! Resource Configuration Structures
//!
//! The data the resource collaborator hands to the simulation core:
//! entity definitions with per-capability parameter blocks, animation
//! collections, and indexed tile grids decoded from colour maps.
//!
//! Definitions are immutable once loaded and shared by reference
//! (`Arc<EntityDefinition>`) across every entity spawned from them.

use serde::{Serialize, Deserialize};
use thiserror::Error;

// =============================================================================
// ENTITY DEFINITION
// =============================================================================

/// Immutable per-type entity configuration.
///
/// A capability is declared by the presence of its parameter block:
/// `Some(params)` means the component scheduler will tick that component
/// for every instance of this definition. The set of `Option`s is the
/// capability set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityDefinition {
    /// Identity name (also used by external by-name lookups).
    pub name: String,
    /// Static sprite reference, used when no animation capability is declared.
    pub sprite: String,
    /// Base health at spawn.
    pub health: f32,
    /// Visual footprint width in world units.
    pub width: i32,
    /// Visual footprint height in world units.
    pub height: i32,
    /// Render layer hint for the draw collaborator.
    pub layer: i32,
    /// Free-form tags consumed by damage target filtering.
    pub tags: Vec<String>,

    /// Player control capability.
    pub player_controller: Option<PlayerControllerParams>,
    /// AI capability.
    pub ai: Option<AiParams>,
    /// Physics capability (gravity, drag, collision response).
    pub physics: Option<PhysicsParams>,
    /// Collision-shape override capability.
    pub collision: Option<CollisionParams>,
    /// Animation capability.
    pub animation: Option<AnimationParams>,
    /// Damage emitter capability.
    pub damage_emitter: Option<DamageEmitterParams>,
    /// Damage receiver capability.
    pub damage_receiver: Option<DamageReceiverParams>,
    /// Score reward granted on death.
    pub death_reward: Option<DeathRewardParams>,
    /// Collectible capability.
    pub collectible: Option<CollectibleParams>,
    /// Spawner capability.
    pub spawner: Option<SpawnerParams>,
    /// Door capability.
    pub door: Option<DoorParams>,
}

impl EntityDefinition {
    /// Footprint size in world units, with non-positive dimensions
    /// clamped to one tile.
    #[inline]
    pub fn size(&self) -> glam::Vec2 {
        let w = if self.width > 0 { self.width as f32 } else { 1.0 };
        let h = if self.height > 0 { self.height as f32 } else { 1.0 };
        glam::Vec2::new(w, h)
    }
}

/// Player movement and jump tuning.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerControllerParams {
    /// Walking speed.
    pub move_speed: f32,
    /// Running speed (run modifier held).
    pub run_speed: f32,
    /// Tap jump height in world units.
    pub jump_height: f32,
    /// Held jump height in world units (>= `jump_height`).
    pub jump_height_max: f32,
    /// Horizontal acceleration toward the target speed.
    pub acceleration: f32,
    /// Grounded deceleration.
    pub deceleration: f32,
    /// Airborne deceleration.
    pub air_deceleration: f32,
}

/// AI behaviour selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiBehavior {
    /// Walk back and forth, reversing at geometry and other live AI.
    #[default]
    Patrol,
}

/// AI tuning.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AiParams {
    /// Which behaviour this AI runs.
    pub behavior: AiBehavior,
    /// Patrol speed.
    pub move_speed: f32,
}

/// Physics body tuning.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Body mass; values <= 0 fall back to 1.
    pub mass: f32,
    /// Linear drag per second, applied to both axes.
    pub drag: f32,
    /// Floor rebound factor in 0..=1.
    pub bounciness: f32,
}

/// Collision-shape override.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionParams {
    /// Collider width in world units.
    pub width: f32,
    /// Collider height in world units.
    pub height: f32,
}

/// Animation selection.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationParams {
    /// Animation collection reference.
    pub animation_id: String,
    /// Playback speed multiplier hint.
    pub animation_speed: f32,
    /// Scene the entity starts in.
    pub default_scene: String,
    /// Whether scenes wrap at the last frame.
    pub looped: bool,
}

/// Damage emitter tuning.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageEmitterParams {
    /// Emitter reach hint for the draw collaborator.
    pub radius: f32,
    /// Damage subtracted per valid hit.
    pub damage: f32,
    /// Tags a target must share for a hit; empty means any target.
    pub target_tags: Vec<String>,
    /// Damage enabled when the target is above the emitter.
    pub hits_up: bool,
    /// Damage enabled when the target is below the emitter.
    pub hits_down: bool,
    /// Damage enabled when the target is to the left.
    pub hits_left: bool,
    /// Damage enabled when the target is to the right.
    pub hits_right: bool,
}

/// Damage receiver tuning.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageReceiverParams {
    /// Tags this receiver accepts damage from (informational).
    pub source_tags: Vec<String>,
    /// Seconds of invulnerability armed after a hit.
    pub invulnerability_time: f32,
}

/// Score reward granted when this entity dies.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeathRewardParams {
    /// Score value.
    pub value: i32,
}

/// Pickup tuning.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectibleParams {
    /// Pickup radius.
    pub radius: f32,
    /// Score value.
    pub value: i32,
}

/// Spawner tuning.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerParams {
    /// Spawns per second.
    pub spawn_rate: f32,
    /// Definition reference of the spawned entity.
    pub spawned_entity: String,
}

/// Door tuning.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorParams {
    /// Level config reference loaded when the door triggers.
    pub target_level: String,
    /// Score reward for entering.
    pub reward_value: i32,
}

// =============================================================================
// ANIMATION COLLECTION
// =============================================================================

/// A named set of animation scenes sharing one frame rate.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSet {
    /// Collection identity.
    pub animation_id: String,
    /// Frames per second; values < 1 fall back to 1.
    pub frame_rate: i32,
    /// Scenes keyed by scene id.
    pub scenes: Vec<AnimationScene>,
}

impl AnimationSet {
    /// Look up a scene by id.
    pub fn scene(&self, scene_id: &str) -> Option<&AnimationScene> {
        self.scenes.iter().find(|s| s.scene_id == scene_id)
    }
}

/// One animation scene: an ordered list of frame sprite references.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationScene {
    /// Scene id ("Idle", "Walk", ...).
    pub scene_id: String,
    /// Frame sprite references in playback order.
    pub frame_sprite_ids: Vec<String>,
}

// =============================================================================
// INDEXED TILE GRID
// =============================================================================

/// Cell value for "nothing here".
pub const EMPTY_CELL: i32 = -1;

/// One colour-to-resource mapping of a decoded colour map.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColorMapping {
    /// The id cells of this colour were stored as.
    pub map_id: i32,
    /// The resource this colour refers to (entity definition, "Solid", ...).
    pub ref_id: String,
}

/// Error building a [`TileGrid`] from a raw cell buffer.
#[derive(Debug, Error)]
#[error("cell buffer length {len} does not match {width}x{height} grid")]
pub struct GridShapeError {
    /// Declared width.
    pub width: usize,
    /// Declared height.
    pub height: usize,
    /// Actual buffer length.
    pub len: usize,
}

/// A 2D grid of per-cell integer ids decoded from a colour map, plus the
/// mappings that resolve those ids to resource references.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<i32>,
    mappings: Vec<ColorMapping>,
}

impl TileGrid {
    /// Create an empty grid (all cells [`EMPTY_CELL`]).
    pub fn new(width: usize, height: usize, mappings: Vec<ColorMapping>) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY_CELL; width * height],
            mappings,
        }
    }

    /// Create a grid from a row-major cell buffer (row 0 = bottom).
    pub fn from_cells(
        width: usize,
        height: usize,
        cells: Vec<i32>,
        mappings: Vec<ColorMapping>,
    ) -> Result<Self, GridShapeError> {
        if cells.len() != width * height {
            return Err(GridShapeError {
                width,
                height,
                len: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
            mappings,
        })
    }

    /// Grid width in tiles.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in tiles.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The colour mappings of this grid.
    pub fn mappings(&self) -> &[ColorMapping] {
        &self.mappings
    }

    /// Set a cell id.
    pub fn set(&mut self, x: usize, y: usize, id: i32) {
        if x >= self.width || y >= self.height {
            tracing::error!(x, y, "TileGrid::set: coordinates out of bounds");
            return;
        }
        self.cells[y * self.width + x] = id;
    }

    /// The raw id at a cell, or [`EMPTY_CELL`] out of bounds.
    #[inline]
    pub fn cell_id(&self, x: usize, y: usize) -> i32 {
        if x >= self.width || y >= self.height {
            return EMPTY_CELL;
        }
        self.cells[y * self.width + x]
    }

    /// Resolve the resource reference at a cell, if any.
    pub fn ref_id_at(&self, x: usize, y: usize) -> Option<&str> {
        let id = self.cell_id(x, y);
        if id == EMPTY_CELL {
            return None;
        }
        self.mappings
            .iter()
            .find(|m| m.map_id == id)
            .map(|m| m.ref_id.as_str())
    }

    /// Find the map id for a given resource reference.
    pub fn map_id_for(&self, ref_id: &str) -> Option<i32> {
        self.mappings
            .iter()
            .find(|m| m.ref_id == ref_id)
            .map(|m| m.map_id)
    }
}

// =============================================================================
// RESOLVED LEVEL
// =============================================================================

/// A level config with both layers already decoded by the resource
/// collaborator: what `Simulation::load_level` consumes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ResolvedLevel {
    /// Display name.
    pub name: String,
    /// Collision layer (cells mapped to "Solid" are impassable).
    pub collision: TileGrid,
    /// Entity layer (cells mapped to entity definition references).
    pub entities: TileGrid,
}
