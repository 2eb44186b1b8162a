//! Entity State and the Live-Entity Roster
//!
//! `EntityState` is the single mutable record every behaviour component
//! reads and writes; components never call each other directly. The
//! roster is a flat, index-stable collection with sequential ids - no
//! mid-level despawn in current scope, so slots never move.

use std::sync::Arc;

use glam::Vec2;
use serde::{Serialize, Deserialize};
use tracing::{debug, error, info, warn};

use crate::core::rect::Rect;
use crate::resources::config::{EntityDefinition, TileGrid};
use crate::resources::resolver::{ResourceResolver, SpriteHandle};
use crate::sim::animation;

/// Stable numeric entity identifier, unique within a level.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EntityId(pub u32);

/// Mutable per-entity simulation state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntityState {
    /// Stable id within the level.
    pub id: EntityId,

    /// Shared immutable definition this entity was spawned from.
    pub def: Arc<EntityDefinition>,

    /// World position (bottom-left corner of the footprint).
    pub position: Vec2,

    /// World velocity.
    pub velocity: Vec2,

    /// True only during the frame a floor collision was resolved.
    pub grounded: bool,

    /// Current health. May go transiently negative on a hit; use
    /// [`EntityState::alive`] / [`EntityState::display_health`].
    pub health: f32,

    /// Whether control (player or AI) is currently enabled.
    pub has_control: bool,

    /// Countdown during which damage is ignored and control is disabled.
    pub invulnerability_timer: f32,

    /// Camera-follow hint for the external camera collaborator.
    pub camera_target: bool,

    /// Visual handle for the draw collaborator.
    pub sprite: Option<SpriteHandle>,

    /// Horizontal sprite mirroring.
    pub sprite_flipped: bool,

    /// Current animation scene id.
    pub animation_scene: String,

    /// Current frame within the scene.
    pub frame_index: usize,

    /// Time accumulated toward the next frame advance.
    pub frame_timer: f32,

    /// Last horizontal patrol direction (+1 right, -1 left).
    pub last_ai_direction: f32,

    /// Set when damaged while alive; consumed by the enemy-bounce check.
    pub was_damaged_recently: bool,

    /// Simulation time of the last damaging hit.
    pub last_damaged_time: f32,

    /// Normalised direction from the damage source toward this entity.
    pub last_damage_source_dir: Vec2,
}

impl EntityState {
    /// Construct entity state from a definition, without resolving any
    /// visual assets. Prefer [`LevelState::spawn`] in simulation code.
    pub fn new(id: EntityId, def: Arc<EntityDefinition>, position: Vec2) -> Self {
        let camera_target = def.player_controller.is_some();
        let animation_scene = def
            .animation
            .as_ref()
            .map(|a| a.default_scene.clone())
            .unwrap_or_default();

        Self {
            id,
            health: def.health,
            camera_target,
            animation_scene,
            def,
            position,
            velocity: Vec2::ZERO,
            grounded: false,
            has_control: true,
            invulnerability_timer: 0.0,
            sprite: None,
            sprite_flipped: false,
            frame_index: 0,
            frame_timer: 0.0,
            last_ai_direction: 1.0,
            was_damaged_recently: false,
            last_damaged_time: f32::MIN,
            last_damage_source_dir: Vec2::ZERO,
        }
    }

    /// World-space bounding rect, bottom-left anchored at `position`.
    #[inline]
    pub fn rect(&self) -> Rect {
        let size = self.def.size();
        Rect::new(self.position, size.x, size.y)
    }

    /// AABB overlap test against another entity.
    #[inline]
    pub fn overlaps(&self, other: &EntityState) -> bool {
        self.rect().overlaps(&other.rect())
    }

    /// Whether the entity still counts as living.
    #[inline]
    pub fn alive(&self) -> bool {
        self.health > 0.0
    }

    /// Health clamped at zero, for external display.
    #[inline]
    pub fn display_health(&self) -> f32 {
        self.health.max(0.0)
    }
}

/// The live-entity collection for the current level, plus level-scoped
/// simulation time.
#[derive(Default)]
pub struct LevelState {
    /// Live entities, index-stable for the lifetime of the level.
    pub entities: Vec<EntityState>,
    /// Seconds of simulation since the level loaded.
    pub time: f32,
    /// Name of the loaded level.
    pub level_name: String,
    next_id: u32,
}

impl LevelState {
    /// Create an empty level state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all entities and restart level time for a fresh level.
    pub fn reset(&mut self, level_name: &str) {
        self.entities.clear();
        self.time = 0.0;
        self.next_id = 0;
        self.level_name = level_name.to_owned();
    }

    /// Spawn one entity from a definition, eagerly resolving its initial
    /// visual: the default scene's first frame when animated, otherwise
    /// the definition's static sprite.
    pub fn spawn(
        &mut self,
        def: Arc<EntityDefinition>,
        position: Vec2,
        resources: &dyn ResourceResolver,
    ) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let mut ent = EntityState::new(id, def, position);

        if ent.def.animation.is_some() {
            animation::resolve_current_frame(&mut ent, resources);
            if ent.sprite.is_none() {
                warn!(
                    entity = %ent.def.name,
                    scene = %ent.animation_scene,
                    "could not resolve initial animation frame"
                );
            }
        } else {
            ent.sprite = resources.sprite(&ent.def.sprite);
        }

        debug!(id = id.0, entity = %ent.def.name, ?position, "spawned entity");
        self.entities.push(ent);
        id
    }

    /// Spawn entities from an entity-layer grid: every cell whose id
    /// resolves to an entity definition produces one instance at the
    /// cell's coordinates. Unresolvable definitions are logged and
    /// skipped.
    pub fn spawn_from_grid(&mut self, grid: &TileGrid, resources: &dyn ResourceResolver) {
        for x in 0..grid.width() {
            for y in 0..grid.height() {
                let Some(ref_id) = grid.ref_id_at(x, y) else {
                    continue;
                };

                match resources.definition(ref_id) {
                    Some(def) => {
                        self.spawn(def, Vec2::new(x as f32, y as f32), resources);
                    }
                    None => {
                        error!(ref_id, x, y, "no entity definition for entity-layer cell");
                    }
                }
            }
        }

        info!(count = self.entities.len(), level = %self.level_name, "built level entities");
    }

    /// Read-only view of the live entities for draw submission.
    pub fn entities(&self) -> &[EntityState] {
        &self.entities
    }

    /// Look up an entity by id.
    pub fn find_by_id(&self, id: EntityId) -> Option<&EntityState> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Look up an entity by definition name.
    pub fn find_by_name(&self, name: &str) -> Option<&EntityState> {
        self.entities.iter().find(|e| e.def.name == name)
    }

    /// Index of the first player-controlled entity, if any.
    pub fn player_index(&self) -> Option<usize> {
        self.entities
            .iter()
            .position(|e| e.def.player_controller.is_some())
    }
}
