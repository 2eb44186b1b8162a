//! Damage Exchange
//!
//! Emitters scan all other entities once per frame. A hit requires the
//! target to declare the receiver capability, not be invulnerable, share
//! a tag when the emitter filters by tags, spatially overlap, and sit in
//! a direction the emitter has damage enabled for. The dominant axis of
//! the position delta decides which direction flag applies.
//!
//! Receiver timers are decayed by the scheduler in the slot just before
//! emitters run, so a hit this frame is protected from the very next
//! emitter in the same pass.

use tracing::debug;

use crate::sim::entity::{EntityState, LevelState};

/// Decay the invulnerability timer of a damage receiver, clamping at 0.
pub(crate) fn decay_receiver_timer(ent: &mut EntityState, dt: f32) {
    if ent.invulnerability_timer > 0.0 {
        ent.invulnerability_timer -= dt;
        if ent.invulnerability_timer < 0.0 {
            ent.invulnerability_timer = 0.0;
        }
    }
}

/// Run the damage-emitter scan for the entity at `idx`.
pub(crate) fn tick_emitter(state: &mut LevelState, idx: usize) {
    let Some(emitter) = state.entities[idx].def.damage_emitter.clone() else {
        return;
    };

    // A hurt or frozen entity deals no damage
    if state.entities[idx].invulnerability_timer > 0.0 || !state.entities[idx].has_control {
        return;
    }

    let emitter_pos = state.entities[idx].position;
    let emitter_rect = state.entities[idx].rect();
    let emitter_name = state.entities[idx].def.name.clone();
    let now = state.time;

    for j in 0..state.entities.len() {
        if j == idx {
            continue;
        }

        let target = &state.entities[j];
        let Some(receiver) = target.def.damage_receiver.as_ref() else {
            continue;
        };
        if target.invulnerability_timer > 0.0 {
            continue;
        }

        // Tag filtering
        if !emitter.target_tags.is_empty() {
            let tag_match = target
                .def
                .tags
                .iter()
                .any(|tag| emitter.target_tags.contains(tag));
            if !tag_match {
                continue;
            }
        }

        // Overlap check
        if !emitter_rect.overlaps(&target.rect()) {
            continue;
        }

        // Direction gating on the dominant axis of the delta
        let delta = target.position - emitter_pos;
        let direction_valid = if delta.x.abs() > delta.y.abs() {
            (delta.x > 0.0 && emitter.hits_right) || (delta.x < 0.0 && emitter.hits_left)
        } else {
            (delta.y > 0.0 && emitter.hits_up) || (delta.y < 0.0 && emitter.hits_down)
        };
        if !direction_valid {
            continue;
        }

        // ---- Apply damage ----
        let invulnerability_time = receiver.invulnerability_time;
        let target = &mut state.entities[j];
        let prev_health = target.health;
        target.health -= emitter.damage;
        target.invulnerability_timer = invulnerability_time;

        // Record hit feedback only when the target was alive before the hit
        if prev_health > 0.0 {
            target.was_damaged_recently = true;
            target.last_damaged_time = now;
            target.last_damage_source_dir = (emitter_pos - target.position).normalize_or_zero();
        }

        debug!(
            target = %target.def.name,
            damage = emitter.damage,
            from = %emitter_name,
            "entity took damage"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::config::{
        DamageEmitterParams, DamageReceiverParams, EntityDefinition,
    };
    use crate::sim::entity::EntityId;
    use glam::Vec2;
    use std::sync::Arc;

    fn spike_def(tags: &[&str]) -> Arc<EntityDefinition> {
        Arc::new(EntityDefinition {
            name: "Spike".into(),
            health: 1.0,
            width: 1,
            height: 1,
            damage_emitter: Some(DamageEmitterParams {
                damage: 1.0,
                target_tags: tags.iter().map(|t| (*t).to_owned()).collect(),
                hits_up: true,
                hits_down: true,
                hits_left: true,
                hits_right: true,
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn victim_def(tags: &[&str]) -> Arc<EntityDefinition> {
        Arc::new(EntityDefinition {
            name: "Victim".into(),
            health: 3.0,
            width: 1,
            height: 1,
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            damage_receiver: Some(DamageReceiverParams {
                invulnerability_time: 0.5,
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn two_entity_state(
        emitter: Arc<EntityDefinition>,
        victim: Arc<EntityDefinition>,
        victim_pos: Vec2,
    ) -> LevelState {
        let mut state = LevelState::new();
        state
            .entities
            .push(EntityState::new(EntityId(0), emitter, Vec2::ZERO));
        state
            .entities
            .push(EntityState::new(EntityId(1), victim, victim_pos));
        state
    }

    #[test]
    fn test_hit_reduces_health_and_arms_timer() {
        let mut state = two_entity_state(spike_def(&[]), victim_def(&[]), Vec2::new(0.5, 0.0));
        state.time = 3.0;

        tick_emitter(&mut state, 0);

        let victim = &state.entities[1];
        assert_eq!(victim.health, 2.0);
        assert_eq!(victim.invulnerability_timer, 0.5);
        assert!(victim.was_damaged_recently);
        assert_eq!(victim.last_damaged_time, 3.0);
        // Source direction points from the victim back toward the emitter
        assert!(victim.last_damage_source_dir.x < 0.0);
    }

    #[test]
    fn test_invulnerable_target_is_ignored() {
        let mut state = two_entity_state(spike_def(&[]), victim_def(&[]), Vec2::new(0.5, 0.0));

        tick_emitter(&mut state, 0);
        assert_eq!(state.entities[1].health, 2.0);

        // Timer still armed: the second hit must not land
        tick_emitter(&mut state, 0);
        assert_eq!(state.entities[1].health, 2.0);

        // Timer expired: hits land again
        state.entities[1].invulnerability_timer = 0.0;
        tick_emitter(&mut state, 0);
        assert_eq!(state.entities[1].health, 1.0);
    }

    #[test]
    fn test_timer_decay_clamps_at_zero() {
        let mut ent = EntityState::new(EntityId(0), victim_def(&[]), Vec2::ZERO);
        ent.invulnerability_timer = 0.05;

        decay_receiver_timer(&mut ent, 0.1);
        assert_eq!(ent.invulnerability_timer, 0.0);

        decay_receiver_timer(&mut ent, 0.1);
        assert_eq!(ent.invulnerability_timer, 0.0);
    }

    #[test]
    fn test_tag_filter() {
        // Emitter only targets "player"-tagged entities
        let mut state = two_entity_state(
            spike_def(&["player"]),
            victim_def(&["enemy"]),
            Vec2::new(0.5, 0.0),
        );
        tick_emitter(&mut state, 0);
        assert_eq!(state.entities[1].health, 3.0);

        let mut state = two_entity_state(
            spike_def(&["player"]),
            victim_def(&["player", "squishy"]),
            Vec2::new(0.5, 0.0),
        );
        tick_emitter(&mut state, 0);
        assert_eq!(state.entities[1].health, 2.0);
    }

    #[test]
    fn test_no_overlap_no_hit() {
        let mut state = two_entity_state(spike_def(&[]), victim_def(&[]), Vec2::new(3.0, 0.0));
        tick_emitter(&mut state, 0);
        assert_eq!(state.entities[1].health, 3.0);
    }

    #[test]
    fn test_direction_gating_dominant_axis() {
        // Emitter that only damages upward
        let up_only = Arc::new(EntityDefinition {
            name: "Stomper".into(),
            health: 1.0,
            width: 1,
            height: 1,
            damage_emitter: Some(DamageEmitterParams {
                damage: 1.0,
                hits_up: true,
                ..Default::default()
            }),
            ..Default::default()
        });

        // Target mostly above: vertical axis dominates, up is enabled
        let mut state = two_entity_state(up_only.clone(), victim_def(&[]), Vec2::new(0.1, 0.8));
        tick_emitter(&mut state, 0);
        assert_eq!(state.entities[1].health, 2.0);

        // Target mostly to the right: horizontal dominates, right is disabled
        let mut state = two_entity_state(up_only, victim_def(&[]), Vec2::new(0.8, 0.1));
        tick_emitter(&mut state, 0);
        assert_eq!(state.entities[1].health, 3.0);
    }

    #[test]
    fn test_dead_target_gets_no_feedback_mark() {
        let mut state = two_entity_state(spike_def(&[]), victim_def(&[]), Vec2::new(0.5, 0.0));
        state.entities[1].health = 0.0;

        tick_emitter(&mut state, 0);

        let victim = &state.entities[1];
        // Damage still applies (health goes negative), but no bounce feedback
        assert_eq!(victim.health, -1.0);
        assert!(!victim.was_damaged_recently);
    }

    #[test]
    fn test_hurt_emitter_is_silent() {
        let mut state = two_entity_state(spike_def(&[]), victim_def(&[]), Vec2::new(0.5, 0.0));
        state.entities[0].invulnerability_timer = 0.3;

        tick_emitter(&mut state, 0);
        assert_eq!(state.entities[1].health, 3.0);

        state.entities[0].invulnerability_timer = 0.0;
        state.entities[0].has_control = false;
        tick_emitter(&mut state, 0);
        assert_eq!(state.entities[1].health, 3.0);
    }
}
