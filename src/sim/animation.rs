//! Animation State Machine
//!
//! Scene selection is request-based: the controlling component (player or
//! AI) asks for the scene matching the entity's status each tick, and the
//! request is a no-op when the scene is already active, so frame progress
//! survives repeated identical requests. The frame clock itself advances
//! in the scheduler's animation slot.

use tracing::warn;

use crate::resources::resolver::ResourceResolver;
use crate::sim::entity::EntityState;

/// Well-known scene ids shared by the player and AI status machines.
pub mod scenes {
    /// Standing still.
    pub const IDLE: &str = "Idle";
    /// Moving along the ground.
    pub const WALK: &str = "Walk";
    /// Airborne.
    pub const JUMP: &str = "Jump";
    /// Recently damaged, still invulnerable.
    pub const HURT: &str = "Hurt";
    /// Health depleted.
    pub const DEAD: &str = "Dead";
}

/// Request a scene switch. Switching to the already-active scene is a
/// no-op; a real switch restarts the frame clock at frame zero.
pub(crate) fn request_scene(
    ent: &mut EntityState,
    desired: &str,
    resources: &dyn ResourceResolver,
) {
    if ent.animation_scene == desired {
        return;
    }

    ent.animation_scene = desired.to_owned();
    ent.frame_index = 0;
    ent.frame_timer = 0.0;
    resolve_current_frame(ent, resources);
}

/// Resolve the sprite for the entity's current scene and frame index,
/// writing it into `ent.sprite`. Missing collections, scenes, or frames
/// leave the previous sprite in place.
pub(crate) fn resolve_current_frame(ent: &mut EntityState, resources: &dyn ResourceResolver) {
    let Some(params) = ent.def.animation.clone() else {
        return;
    };

    let Some(set) = resources.animation(&params.animation_id) else {
        warn!(
            entity = %ent.def.name,
            animation = %params.animation_id,
            "animation collection not cached"
        );
        return;
    };

    let Some(scene) = set.scene(&ent.animation_scene) else {
        warn!(
            entity = %ent.def.name,
            animation = %params.animation_id,
            scene = %ent.animation_scene,
            "animation collection has no such scene"
        );
        return;
    };

    let Some(frame_id) = scene.frame_sprite_ids.get(ent.frame_index) else {
        return;
    };

    match resources.sprite(frame_id) {
        Some(handle) => ent.sprite = Some(handle),
        None => warn!(frame = %frame_id, "animation frame sprite not cached"),
    }
}

/// Advance the frame clock by `dt` and resolve the resulting sprite.
///
/// Looping scenes wrap past the last frame; non-looping scenes hold it.
pub(crate) fn tick_animation(ent: &mut EntityState, resources: &dyn ResourceResolver, dt: f32) {
    let Some(params) = ent.def.animation.clone() else {
        return;
    };

    let Some(set) = resources.animation(&params.animation_id) else {
        return;
    };
    let Some(scene) = set.scene(&ent.animation_scene) else {
        return;
    };

    let frame_count = scene.frame_sprite_ids.len();
    if frame_count == 0 {
        return;
    }

    let frame_duration = 1.0 / set.frame_rate.max(1) as f32;
    let speed = if params.animation_speed > 0.0 {
        params.animation_speed
    } else {
        1.0
    };

    ent.frame_timer += dt * speed;
    while ent.frame_timer >= frame_duration {
        ent.frame_timer -= frame_duration;

        if ent.frame_index + 1 < frame_count {
            ent.frame_index += 1;
        } else if params.looped {
            ent.frame_index = 0;
        } else {
            // Hold the last frame; drop the surplus so the timer
            // cannot grow without bound.
            ent.frame_timer = 0.0;
            break;
        }
    }

    resolve_current_frame(ent, resources);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::config::{
        AnimationParams, AnimationScene, AnimationSet, EntityDefinition,
    };
    use crate::resources::resolver::{InMemoryResources, SpriteHandle};
    use crate::sim::entity::EntityId;
    use glam::Vec2;
    use std::sync::Arc;

    fn resources() -> InMemoryResources {
        let mut res = InMemoryResources::new();
        res.insert_animation(
            "anim_walker",
            AnimationSet {
                animation_id: "anim_walker".into(),
                frame_rate: 10, // 0.1s per frame
                scenes: vec![
                    AnimationScene {
                        scene_id: scenes::IDLE.into(),
                        frame_sprite_ids: vec!["spr_idle_0".into(), "spr_idle_1".into()],
                    },
                    AnimationScene {
                        scene_id: scenes::DEAD.into(),
                        frame_sprite_ids: vec!["spr_dead_0".into(), "spr_dead_1".into()],
                    },
                ],
            },
        );
        res
    }

    fn animated_entity(looped: bool) -> EntityState {
        let def = EntityDefinition {
            name: "Walker".into(),
            width: 1,
            height: 1,
            animation: Some(AnimationParams {
                animation_id: "anim_walker".into(),
                animation_speed: 1.0,
                default_scene: scenes::IDLE.into(),
                looped,
            }),
            ..Default::default()
        };
        EntityState::new(EntityId(0), Arc::new(def), Vec2::ZERO)
    }

    #[test]
    fn test_frames_advance_and_wrap_when_looped() {
        let res = resources();
        let mut ent = animated_entity(true);

        tick_animation(&mut ent, &res, 0.11);
        assert_eq!(ent.frame_index, 1);
        assert_eq!(ent.sprite, Some(SpriteHandle("spr_idle_1".into())));

        tick_animation(&mut ent, &res, 0.11);
        assert_eq!(ent.frame_index, 0);
        assert_eq!(ent.sprite, Some(SpriteHandle("spr_idle_0".into())));
    }

    #[test]
    fn test_non_looped_holds_last_frame() {
        let res = resources();
        let mut ent = animated_entity(false);

        for _ in 0..10 {
            tick_animation(&mut ent, &res, 0.11);
        }
        assert_eq!(ent.frame_index, 1);
    }

    #[test]
    fn test_sub_frame_dt_accumulates() {
        let res = resources();
        let mut ent = animated_entity(true);

        tick_animation(&mut ent, &res, 0.04);
        assert_eq!(ent.frame_index, 0);
        tick_animation(&mut ent, &res, 0.04);
        assert_eq!(ent.frame_index, 0);
        tick_animation(&mut ent, &res, 0.04);
        assert_eq!(ent.frame_index, 1);
    }

    #[test]
    fn test_scene_switch_restarts_clock() {
        let res = resources();
        let mut ent = animated_entity(true);

        tick_animation(&mut ent, &res, 0.11);
        assert_eq!(ent.frame_index, 1);

        request_scene(&mut ent, scenes::DEAD, &res);
        assert_eq!(ent.animation_scene, scenes::DEAD);
        assert_eq!(ent.frame_index, 0);
        assert_eq!(ent.frame_timer, 0.0);
        assert_eq!(ent.sprite, Some(SpriteHandle("spr_dead_0".into())));
    }

    #[test]
    fn test_same_scene_request_keeps_progress() {
        let res = resources();
        let mut ent = animated_entity(true);

        tick_animation(&mut ent, &res, 0.11);
        let frame = ent.frame_index;
        let timer = ent.frame_timer;

        request_scene(&mut ent, scenes::IDLE, &res);
        assert_eq!(ent.frame_index, frame);
        assert_eq!(ent.frame_timer, timer);
    }

    #[test]
    fn test_missing_collection_is_inert() {
        let res = InMemoryResources::new();
        let mut ent = animated_entity(true);

        tick_animation(&mut ent, &res, 0.5);
        assert_eq!(ent.frame_index, 0);
        assert!(ent.sprite.is_none());
    }
}
