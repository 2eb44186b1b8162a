//! Player Control Component
//!
//! Horizontal accel/decel toward an input-derived target speed, a
//! variable-height jump, and the enemy-bounce check. Control is revoked
//! while the entity is invulnerable or dead; the physics step still runs
//! for uncontrolled entities, so knockback and gravity keep applying.

use glam::Vec2;

use crate::resources::resolver::ResourceResolver;
use crate::sim::animation::{self, scenes};
use crate::sim::entity::LevelState;
use crate::sim::input::{InputFrame, AXIS_DEADZONE};
use crate::sim::tick::SimConfig;

/// Tick player control for the entity at `idx`.
pub(crate) fn tick_player(
    state: &mut LevelState,
    idx: usize,
    input: &InputFrame,
    config: &SimConfig,
    resources: &dyn ResourceResolver,
    dt: f32,
) {
    let Some(ctrl) = state.entities[idx].def.player_controller else {
        return;
    };

    let gravity_mag = config.gravity.abs();

    // -------- Control gating -------- //
    {
        let ent = &mut state.entities[idx];
        ent.has_control = ent.invulnerability_timer <= 0.0;
        if ent.health <= 0.0 {
            ent.has_control = false;
        }
    }

    // -------- Input -------- //
    let has_control = state.entities[idx].has_control;
    let is_grounded = state.entities[idx].grounded;

    let mut move_dir = input.move_axis().signum();
    let mut has_input = input.has_move();
    if !has_control {
        move_dir = 0.0;
        has_input = false;
    }

    // -------- Move params -------- //
    let max_speed = if input.run_held() { ctrl.run_speed } else { ctrl.move_speed };

    // -------- Variable jump params -------- //
    let base_jump_height = ctrl.jump_height.max(0.01); // tap height
    let max_jump_height = ctrl.jump_height_max.max(base_jump_height); // held height
    let min_jump_vel = (2.0 * gravity_mag * base_jump_height).sqrt();
    let held_gravity_scale = (base_jump_height / max_jump_height).clamp(0.0, 1.0);
    let anti_gravity_per_sec = gravity_mag * (1.0 - held_gravity_scale);

    // -------- Horizontal accel / decel -------- //
    let target_speed = if has_input { move_dir * max_speed } else { 0.0 };

    {
        let ent = &mut state.entities[idx];

        let speed_diff = target_speed - ent.velocity.x;
        let dir = if speed_diff.abs() >= AXIS_DEADZONE { speed_diff.signum() } else { 0.0 };

        if has_input && dir.signum() == move_dir.signum() {
            ent.velocity.x += ctrl.acceleration * dir * dt;
        } else {
            let decel_rate = if is_grounded { ctrl.deceleration } else { ctrl.air_deceleration };
            ent.velocity.x += decel_rate * dir * dt;
        }

        // -------- Sprite facing -------- //
        if has_input {
            ent.sprite_flipped = move_dir < 0.0;
        }

        // -------- Jumping -------- //
        if input.jump_pressed() && is_grounded {
            ent.velocity.y = min_jump_vel;
            ent.grounded = false;
        }

        if input.jump_held() && ent.velocity.y > 0.0 {
            ent.velocity.y += anti_gravity_per_sec * dt;
        }

        if !input.jump_held() && ent.velocity.y > min_jump_vel {
            ent.velocity.y = min_jump_vel;
        }
    }

    // -------- Bounce off recently damaged enemies -------- //
    let my_y = state.entities[idx].position.y;
    let now = state.time;
    let mut bounce = false;

    for j in 0..state.entities.len() {
        if j == idx {
            continue;
        }
        let other = &state.entities[j];
        if !other.was_damaged_recently {
            continue;
        }

        if now - other.last_damaged_time < config.damage_feedback_window
            && my_y > other.position.y
        {
            bounce = true;
            // Consume so the same hit cannot be bounced off twice
            state.entities[j].was_damaged_recently = false;
        }
    }

    if bounce {
        let bounce_vel = (2.0 * gravity_mag * ctrl.jump_height).sqrt();
        state.entities[idx].velocity.y = bounce_vel;
    }

    // -------- Animation scene request -------- //
    if state.entities[idx].def.animation.is_some() {
        let ent = &mut state.entities[idx];
        let desired = if !ent.grounded {
            scenes::JUMP
        } else if ent.health <= 0.0 {
            scenes::DEAD
        } else if ent.invulnerability_timer > 0.0 {
            scenes::HURT
        } else if has_input {
            scenes::WALK
        } else {
            scenes::IDLE
        };

        animation::request_scene(ent, desired, resources);
    }
}
