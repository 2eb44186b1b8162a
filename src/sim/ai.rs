//! AI Component
//!
//! Patrol behaviour: walk in the remembered direction, reversing when a
//! short probe ahead intersects level geometry or when overlapping
//! another living AI entity. Velocity is set directly from the resolved
//! direction each tick - patrollers do not accelerate.

use glam::Vec2;

use crate::resources::config::AiBehavior;
use crate::resources::resolver::ResourceResolver;
use crate::sim::animation::{self, scenes};
use crate::sim::collision::CollisionIndex;
use crate::sim::entity::LevelState;
use crate::sim::tick::SimConfig;

/// Tick AI for the entity at `idx`.
pub(crate) fn tick_ai(
    state: &mut LevelState,
    idx: usize,
    index: &CollisionIndex,
    config: &SimConfig,
    resources: &dyn ResourceResolver,
) {
    let Some(ai) = state.entities[idx].def.ai else {
        return;
    };

    // -------- Control & status handling -------- //
    {
        let ent = &mut state.entities[idx];
        if ent.health <= 0.0 {
            ent.has_control = false;
            ent.velocity = Vec2::ZERO; // stop completely when dead
        } else if ent.invulnerability_timer > 0.0 {
            ent.has_control = false;
            ent.velocity = Vec2::ZERO; // freeze while hurt
        } else {
            ent.has_control = true;
        }
    }

    // -------- Animation scene request -------- //
    if state.entities[idx].def.animation.is_some() {
        let walk_threshold = config.walk_speed_threshold;
        let ent = &mut state.entities[idx];
        let desired = if ent.health <= 0.0 {
            scenes::DEAD
        } else if ent.invulnerability_timer > 0.0 {
            scenes::HURT
        } else if !ent.grounded {
            scenes::JUMP
        } else if ent.velocity.length() > walk_threshold {
            scenes::WALK
        } else {
            scenes::IDLE
        };

        animation::request_scene(ent, desired, resources);
    }

    // -------- Behaviour -------- //
    if state.entities[idx].has_control {
        match ai.behavior {
            AiBehavior::Patrol => tick_patrol(state, idx, index, config, ai.move_speed),
        }
    }
}

fn tick_patrol(
    state: &mut LevelState,
    idx: usize,
    index: &CollisionIndex,
    config: &SimConfig,
    speed: f32,
) {
    let ent = &state.entities[idx];

    let mut direction = ent.last_ai_direction;
    if direction == 0.0 {
        direction = 1.0;
    }

    // Reverse when the probe ahead hits level geometry
    let size = ent.def.size();
    let probe_pos = ent.position + Vec2::new(direction * config.ai_probe_distance, 0.0);
    if index.query(ent.id, probe_pos, size).is_some() {
        direction = -direction;
    }

    // Reverse away from overlapping living AI entities
    let my_id = ent.id;
    let my_rect = ent.rect();
    let my_x = ent.position.x;
    for other in &state.entities {
        if other.id == my_id {
            continue;
        }
        if other.def.ai.is_none() {
            continue;
        }
        if other.health <= 0.0 {
            continue; // corpses do not redirect live AI
        }

        if my_rect.overlaps(&other.rect()) {
            direction = if other.position.x > my_x { -1.0 } else { 1.0 };
            break;
        }
    }

    let ent = &mut state.entities[idx];
    ent.last_ai_direction = direction;
    ent.velocity.x = speed * direction;
    ent.sprite_flipped = direction > 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::config::{AiParams, ColorMapping, EntityDefinition, TileGrid};
    use crate::resources::resolver::InMemoryResources;
    use crate::sim::collision::SOLID_REF_ID;
    use crate::sim::entity::{EntityId, EntityState};
    use std::sync::Arc;

    fn walker_def() -> Arc<EntityDefinition> {
        Arc::new(EntityDefinition {
            name: "Walker".into(),
            health: 2.0,
            width: 1,
            height: 1,
            ai: Some(AiParams { move_speed: 2.0, ..Default::default() }),
            ..Default::default()
        })
    }

    fn wall_at(x: usize, height: usize) -> CollisionIndex {
        let mut grid = TileGrid::new(
            x + 1,
            height,
            vec![ColorMapping { map_id: 1, ref_id: SOLID_REF_ID.into() }],
        );
        for y in 0..height {
            grid.set(x, y, 1);
        }
        CollisionIndex::build(&grid)
    }

    #[test]
    fn test_patrol_reverses_once_at_wall() {
        let config = SimConfig::default();
        let res = InMemoryResources::new();
        // Wall column at x=5; walker just left of it, probing right hits it
        let index = wall_at(5, 3);

        let mut state = LevelState::new();
        state
            .entities
            .push(EntityState::new(EntityId(0), walker_def(), Vec2::new(3.95, 0.0)));

        tick_ai(&mut state, 0, &index, &config, &res);

        let ent = &state.entities[0];
        assert_eq!(ent.last_ai_direction, -1.0);
        assert_eq!(ent.velocity.x, -2.0);
        assert!(!ent.sprite_flipped);

        // Still reversed, not flip-flopping: now probing left into open space
        tick_ai(&mut state, 0, &index, &config, &res);
        assert_eq!(state.entities[0].last_ai_direction, -1.0);
    }

    #[test]
    fn test_patrol_walks_right_by_default() {
        let config = SimConfig::default();
        let res = InMemoryResources::new();
        let mut state = LevelState::new();
        state
            .entities
            .push(EntityState::new(EntityId(0), walker_def(), Vec2::ZERO));

        tick_ai(&mut state, 0, &CollisionIndex::empty(), &config, &res);

        let ent = &state.entities[0];
        assert_eq!(ent.velocity.x, 2.0);
        assert!(ent.sprite_flipped);
    }

    #[test]
    fn test_overlapping_live_ai_repel() {
        let config = SimConfig::default();
        let res = InMemoryResources::new();
        let mut state = LevelState::new();
        state
            .entities
            .push(EntityState::new(EntityId(0), walker_def(), Vec2::new(1.0, 0.0)));
        state
            .entities
            .push(EntityState::new(EntityId(1), walker_def(), Vec2::new(1.5, 0.0)));

        // The left one moves away to the left, the right one to the right
        tick_ai(&mut state, 0, &CollisionIndex::empty(), &config, &res);
        tick_ai(&mut state, 1, &CollisionIndex::empty(), &config, &res);

        assert_eq!(state.entities[0].last_ai_direction, -1.0);
        assert_eq!(state.entities[1].last_ai_direction, 1.0);
    }

    #[test]
    fn test_dead_ai_does_not_redirect() {
        let config = SimConfig::default();
        let res = InMemoryResources::new();
        let mut state = LevelState::new();
        state
            .entities
            .push(EntityState::new(EntityId(0), walker_def(), Vec2::new(1.0, 0.0)));
        let mut corpse = EntityState::new(EntityId(1), walker_def(), Vec2::new(1.5, 0.0));
        corpse.health = 0.0;
        state.entities.push(corpse);

        tick_ai(&mut state, 0, &CollisionIndex::empty(), &config, &res);
        assert_eq!(state.entities[0].last_ai_direction, 1.0);
    }

    #[test]
    fn test_frozen_while_invulnerable() {
        let config = SimConfig::default();
        let res = InMemoryResources::new();
        let mut state = LevelState::new();
        let mut ent = EntityState::new(EntityId(0), walker_def(), Vec2::ZERO);
        ent.invulnerability_timer = 0.4;
        ent.velocity = Vec2::new(2.0, 0.0);
        state.entities.push(ent);

        tick_ai(&mut state, 0, &CollisionIndex::empty(), &config, &res);

        let ent = &state.entities[0];
        assert!(!ent.has_control);
        assert_eq!(ent.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_stopped_when_dead() {
        let config = SimConfig::default();
        let res = InMemoryResources::new();
        let mut state = LevelState::new();
        let mut ent = EntityState::new(EntityId(0), walker_def(), Vec2::ZERO);
        ent.health = 0.0;
        ent.velocity = Vec2::new(2.0, 1.0);
        state.entities.push(ent);

        tick_ai(&mut state, 0, &CollisionIndex::empty(), &config, &res);

        assert_eq!(state.entities[0].velocity, Vec2::ZERO);
        assert!(!state.entities[0].has_control);
    }
}
