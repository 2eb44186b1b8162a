//! Physics Integration and Penetration Resolution
//!
//! Velocity is additive: this step never resets it, it only applies
//! gravity, passive drag, and collision response. Horizontal drag is
//! attenuated to quarter strength for player-controlled entities so
//! passive damping never fights the controller's input authority.

use crate::sim::collision::CollisionIndex;
use crate::sim::entity::EntityState;
use crate::sim::tick::SimConfig;

/// Advance one physics step for an entity declaring the Physics
/// capability. Mutates position, velocity, and the grounded flag only.
pub fn step(ent: &mut EntityState, index: &CollisionIndex, config: &SimConfig, dt: f32) {
    let Some(phys) = ent.def.physics else {
        return;
    };

    let mass = if phys.mass > 0.0 { phys.mass } else { 1.0 };
    let drag = phys.drag.max(0.0);
    let bounciness = phys.bounciness.clamp(0.0, 1.0);
    let player_controlled = ent.def.player_controller.is_some();
    let size = ent.def.size();

    // Grounded is a per-step fact; only a floor hit below re-sets it.
    ent.grounded = false;

    // Gravity
    ent.velocity.y += (config.gravity / mass) * dt;

    // Passive damping
    if drag > 0.0 {
        let x_damp = if player_controlled {
            (1.0 - drag * 0.25 * dt).max(0.0)
        } else {
            (1.0 - drag * dt).max(0.0)
        };
        let y_damp = (1.0 - drag * dt).max(0.0);

        ent.velocity.x *= x_damp;
        ent.velocity.y *= y_damp;
    }

    // Integrate
    ent.position += ent.velocity * dt;

    // Resolve penetration, re-querying after each push-out
    for _ in 0..config.max_resolve_iterations {
        let Some(hit) = index.query(ent.id, ent.position, size) else {
            break;
        };

        ent.position = hit.resolved_pos;

        if hit.push.x != 0.0 {
            // Wall: stop into-wall motion, keep vertical velocity
            ent.velocity.x = 0.0;
        } else if hit.push.y > 0.0 {
            // Floor: record impact speed before zeroing for the rebound
            let down_speed = -ent.velocity.y.min(0.0);

            ent.velocity.y = 0.0;
            ent.grounded = true;

            if down_speed > config.bounce_min_impulse && bounciness > 0.0 {
                ent.velocity.y = down_speed * bounciness;
            }
        } else if hit.push.y < 0.0 {
            // Ceiling: stop upward motion
            ent.velocity.y = ent.velocity.y.min(0.0);
        } else {
            continue;
        }

        // Snap micro velocities to zero to prevent jitter
        if ent.velocity.x.abs() < config.tiny_velocity_cutoff {
            ent.velocity.x = 0.0;
        }
        if ent.velocity.y.abs() < config.tiny_velocity_cutoff {
            ent.velocity.y = 0.0;
        }
    }
}
