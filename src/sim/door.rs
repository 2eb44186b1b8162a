//! Door Component
//!
//! Doors never mutate simulation state. When the interact input is
//! pressed and the player stands inside the door's footprint, the tick
//! surfaces a [`LevelRequest`] for the embedding loop to act on - the
//! simulation core does not load levels on its own.

use tracing::info;

use crate::sim::entity::LevelState;
use crate::sim::input::InputFrame;

/// A request to switch levels, emitted by a triggered door.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelRequest {
    /// Level config reference the embedding loop should load next.
    pub target_level: String,
}

/// Tick the door at `idx`, returning a level request if it triggered.
pub(crate) fn tick_door(state: &LevelState, idx: usize, input: &InputFrame) -> Option<LevelRequest> {
    let door = state.entities[idx].def.door.as_ref()?;

    if !input.interact_pressed() {
        return None;
    }

    let player_idx = state.player_index()?;
    if player_idx == idx {
        return None;
    }

    let door_ent = &state.entities[idx];
    let player = &state.entities[player_idx];
    if !door_ent.overlaps(player) {
        return None;
    }

    info!(
        door = %door_ent.def.name,
        target = %door.target_level,
        "door triggered"
    );

    Some(LevelRequest {
        target_level: door.target_level.clone(),
    })
}
