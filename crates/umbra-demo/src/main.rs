//! Demo binary: generates a small dungeon, walks a torch-bearing player and a
//! few wandering lights through it, and prints what the player sees.
//!
//! Run with `cargo run -p umbra-demo -- --style hell --ticks 20`.

mod dungeon;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tracing::info;
use umbra_config::{CliArgs, Config, default_config_dir};
use umbra_engine::{LightId, LightingEngine, TileFlags};

/// Characters for light levels 0 (bright) to 15 (dark).
const SHADES: &[u8; 16] = b"@@%%##**++==--..";

const VIEW_RADIUS: i32 = 14;

struct Wanderer {
    light: LightId,
    pos: (i32, i32),
}

fn main() {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    umbra_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let mut engine = match LightingEngine::new(&config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Cannot start: {e}");
            std::process::exit(1);
        }
    };

    let mut rng = Xoshiro256StarStar::seed_from_u64(args.seed);
    let (layout, rooms) = dungeon::generate(config.map.width, config.map.height, 40, &mut rng);
    if rooms.is_empty() {
        eprintln!("Map too small for any room");
        std::process::exit(1);
    }
    let style = config.lighting.style;
    if let Err(e) = engine.load_level(layout, style, None) {
        eprintln!("Cannot load level: {e}");
        std::process::exit(1);
    }
    info!(rooms = rooms.len(), %style, "generated dungeon");

    // Wall torches in every other room become part of the static light.
    for room in rooms.iter().step_by(2) {
        let (x, _) = room.center();
        engine.bake_static_light(x, room.y0, 3);
    }
    engine.save_pre_lighting();

    let mut player = rooms[0].center();
    let torch = engine.add_light(player.0, player.1, 8);
    let eyes = engine.add_vision(player.0, player.1, 10, true);

    let mut wanderers: Vec<Wanderer> = rooms
        .iter()
        .skip(1)
        .take(4)
        .map(|room| {
            let pos = room.center();
            Wanderer {
                light: engine.add_light(pos.0, pos.1, 4),
                pos,
            }
        })
        .collect();

    engine.tick();

    let mut route = rooms.iter().map(|r| r.center()).cycle().skip(1);
    let mut target = route.next().unwrap_or(player);
    for tick in 0..args.ticks {
        if player == target {
            target = route.next().unwrap_or(player);
        }
        player = step_towards(&engine, player, target);
        engine.change_light_xy(torch, player.0, player.1);
        engine.change_vision_xy(eyes, player.0, player.1);

        for wanderer in &mut wanderers {
            let (dx, dy) = (rng.gen_range(-1..=1), rng.gen_range(-1..=1));
            let next = (wanderer.pos.0 + dx, wanderer.pos.1 + dy);
            if !engine.layout().is_opaque(next.0, next.1) {
                wanderer.pos = next;
                engine.change_light_xy(wanderer.light, next.0, next.1);
                let offset = (rng.gen_range(-7..=7), rng.gen_range(-7..=7));
                engine.change_light_offset(wanderer.light, offset.0, offset.1);
            }
        }
        if tick == args.ticks / 2
            && let Some(gone) = wanderers.pop()
        {
            engine.remove_light(gone.light);
        }

        engine.tick();
        engine.cycle_colors();
    }

    print_view(&engine, player);
    print_summary(&engine);
}

/// One step along the corridor shape the generator carves: horizontal
/// first, then vertical. Stays put when blocked.
fn step_towards(engine: &LightingEngine, from: (i32, i32), to: (i32, i32)) -> (i32, i32) {
    let dx = (to.0 - from.0).signum();
    let dy = (to.1 - from.1).signum();
    [(from.0 + dx, from.1), (from.0, from.1 + dy)]
        .into_iter()
        .find(|&(x, y)| (x, y) != from && !engine.layout().is_opaque(x, y))
        .unwrap_or(from)
}

fn print_view(engine: &LightingEngine, player: (i32, i32)) {
    for y in player.1 - VIEW_RADIUS..=player.1 + VIEW_RADIUS {
        let row: String = (player.0 - VIEW_RADIUS..=player.0 + VIEW_RADIUS)
            .map(|x| {
                let flags = engine.flags_at(x, y);
                if (x, y) == player {
                    'P'
                } else if !flags.contains(TileFlags::EXPLORED) {
                    ' '
                } else if engine.layout().is_opaque(x, y) {
                    if flags.contains(TileFlags::VISIBLE) { 'W' } else { 'w' }
                } else if flags.contains(TileFlags::VISIBLE) {
                    SHADES[engine.light_at(x, y) as usize] as char
                } else {
                    ','
                }
            })
            .collect();
        println!("{row}");
    }
}

fn print_summary(engine: &LightingEngine) {
    let explored = engine
        .flags()
        .iter()
        .filter(|(_, _, f)| f.contains(TileFlags::EXPLORED))
        .count();
    let visible = engine
        .flags()
        .iter()
        .filter(|(_, _, f)| f.contains(TileFlags::VISIBLE))
        .count();
    let regions: Vec<u8> = (1..=u8::MAX)
        .filter(|&r| engine.is_translucency_active(r))
        .collect();
    let table = engine.light_table();

    println!();
    println!("style:            {}", engine.style());
    println!("lights:           {}", engine.lights().len());
    println!("explored tiles:   {explored}");
    println!("visible tiles:    {visible}");
    println!("active regions:   {regions:?}");
    println!("ramp rows:        {}", table.ramps().len());
    println!("ramp[0][1..8]:    {:?}", &table.ramp_for_level(0)[1..8]);
}
