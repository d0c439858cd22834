//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use umbra_grid::DungeonStyle;

use crate::Config;

/// Umbra command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "umbra", about = "Tile lighting and visibility demo")]
pub struct CliArgs {
    /// Map width in tiles.
    #[arg(long)]
    pub width: Option<usize>,

    /// Map height in tiles.
    #[arg(long)]
    pub height: Option<usize>,

    /// Dungeon style (town, cathedral, catacombs, caves, hell, nest, crypt).
    #[arg(long)]
    pub style: Option<DungeonStyle>,

    /// Maximum number of dynamic lights.
    #[arg(long)]
    pub max_lights: Option<usize>,

    /// Maximum number of vision sources.
    #[arg(long)]
    pub max_visions: Option<usize>,

    /// Use three coarse brightness ramps.
    #[arg(long)]
    pub four_level_ramps: Option<bool>,

    /// Start with every tile fully lit.
    #[arg(long)]
    pub full_bright: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = 8)]
    pub ticks: u32,

    /// Seed for the scripted wanderers.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.map.width = w;
        }
        if let Some(h) = args.height {
            self.map.height = h;
        }
        if let Some(style) = args.style {
            self.lighting.style = style;
        }
        if let Some(n) = args.max_lights {
            self.lighting.max_lights = n;
        }
        if let Some(n) = args.max_visions {
            self.vision.max_visions = n;
        }
        if let Some(four) = args.four_level_ramps {
            self.lighting.four_level_ramps = four;
        }
        if let Some(full_bright) = args.full_bright {
            self.debug.full_bright = full_bright;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
