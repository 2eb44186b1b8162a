//! Tilestride Demo
//!
//! Builds a small level in memory, loads it into the simulation, and
//! runs a scripted input sequence, logging what happens.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tilestride::{
    resources::config::{ColorMapping, ResolvedLevel},
    sim::collision::SOLID_REF_ID,
    EntityDefinition, InMemoryResources, InputFrame, SimConfig, Simulation, TileGrid, TICK_RATE,
    VERSION,
};

const SOLID: i32 = 1;
const PLAYER: i32 = 10;
const WALKER: i32 = 11;
const DOOR: i32 = 12;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Tilestride v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    demo_level()?;
    Ok(())
}

/// Build and run a small demo level.
fn demo_level() -> Result<()> {
    info!("=== Starting Demo Level ===");

    let resources = demo_resources()?;
    let level = demo_room();

    let mut sim = Simulation::new(resources, SimConfig::default());
    sim.load_level(&level)?;

    let dt = 1.0 / TICK_RATE as f32;

    // Script: settle, walk right, jump over the gap, keep walking,
    // interact at the door.
    let idle = InputFrame::new();
    let walk = InputFrame::with_move(1.0);
    let jump = InputFrame::with_move(1.0)
        .pressing(InputFrame::FLAG_JUMP_PRESSED)
        .pressing(InputFrame::FLAG_JUMP_HELD);
    let glide = InputFrame::with_move(1.0).pressing(InputFrame::FLAG_JUMP_HELD);
    let interact = InputFrame::new().pressing(InputFrame::FLAG_INTERACT_PRESSED);

    let mut script: Vec<(InputFrame, u32)> = vec![
        (idle, 30),
        (walk, 90),
        (jump, 1),
        (glide, 30),
        (walk, 180),
        (interact, 1),
    ];

    let mut requested_level = None;
    for (input, frames) in script.drain(..) {
        for _ in 0..frames {
            let result = sim.tick(&input, dt);
            if let Some(req) = result.level_request {
                requested_level = Some(req.target_level);
            }
        }
        log_player(&sim);
    }

    for ent in sim.entities() {
        info!(
            name = %ent.def.name,
            pos = ?ent.position,
            health = ent.display_health(),
            "final entity state"
        );
    }

    match requested_level {
        Some(target) => info!(%target, "door reached, level switch requested"),
        None => info!("demo ended without reaching the door"),
    }

    Ok(())
}

fn log_player(sim: &Simulation<InMemoryResources>) {
    if let Some(player) = sim.find_entity_by_name("Player") {
        info!(
            t = format!("{:.2}", sim.time()),
            x = format!("{:.2}", player.position.x),
            y = format!("{:.2}", player.position.y),
            grounded = player.grounded,
            "player"
        );
    }
}

/// Entity definitions for the demo, parsed from JSON the way the
/// resource collaborator would deliver them.
fn demo_resources() -> Result<InMemoryResources> {
    let player: EntityDefinition = serde_json::from_str(
        r#"{
            "name": "Player",
            "health": 3.0,
            "width": 1,
            "height": 2,
            "tags": ["player"],
            "player_controller": {
                "move_speed": 4.0,
                "run_speed": 7.0,
                "jump_height": 1.5,
                "jump_height_max": 3.5,
                "acceleration": 40.0,
                "deceleration": 60.0,
                "air_deceleration": 15.0
            },
            "physics": { "mass": 1.0 },
            "damage_receiver": { "invulnerability_time": 1.0 }
        }"#,
    )?;

    let walker: EntityDefinition = serde_json::from_str(
        r#"{
            "name": "Walker",
            "health": 2.0,
            "width": 1,
            "height": 1,
            "tags": ["enemy"],
            "ai": { "behavior": "Patrol", "move_speed": 2.0 },
            "physics": { "mass": 1.0 },
            "damage_emitter": {
                "damage": 1.0,
                "target_tags": ["player"],
                "hits_left": true,
                "hits_right": true,
                "hits_down": true
            },
            "damage_receiver": { "invulnerability_time": 0.4 }
        }"#,
    )?;

    let door: EntityDefinition = serde_json::from_str(
        r#"{
            "name": "ExitDoor",
            "width": 1,
            "height": 2,
            "door": { "target_level": "level_2", "reward_value": 100 }
        }"#,
    )?;

    let mut resources = InMemoryResources::new();
    resources.insert_definition("ent_player", player);
    resources.insert_definition("ent_walker", walker);
    resources.insert_definition("ent_door", door);
    Ok(resources)
}

/// A 24x10 room with a floor gap and an exit door on the right.
fn demo_room() -> ResolvedLevel {
    let mappings = vec![
        ColorMapping { map_id: SOLID, ref_id: SOLID_REF_ID.into() },
        ColorMapping { map_id: PLAYER, ref_id: "ent_player".into() },
        ColorMapping { map_id: WALKER, ref_id: "ent_walker".into() },
        ColorMapping { map_id: DOOR, ref_id: "ent_door".into() },
    ];

    let mut collision = TileGrid::new(24, 10, mappings.clone());
    for x in 0..24 {
        // Gap at x = 10..12
        if !(10..12).contains(&x) {
            collision.set(x, 0, SOLID);
        }
    }
    for y in 0..10 {
        collision.set(0, y, SOLID);
        collision.set(23, y, SOLID);
    }

    let mut entities = TileGrid::new(24, 10, mappings);
    entities.set(2, 1, PLAYER);
    entities.set(16, 1, WALKER);
    entities.set(21, 1, DOOR);

    ResolvedLevel {
        name: "demo_room".into(),
        collision,
        entities,
    }
}
