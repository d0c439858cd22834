//! Dungeon styles that select falloff curves and ramp variants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Visual style of the current level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DungeonStyle {
    /// Surface town.
    Town,
    /// Levels 1-4.
    #[default]
    Cathedral,
    /// Levels 5-8.
    Catacombs,
    /// Levels 9-12.
    Caves,
    /// Levels 13-16. Reddish ramp with colour cycling.
    Hell,
    /// Expansion hive levels.
    Nest,
    /// Expansion crypt levels.
    Crypt,
}

impl DungeonStyle {
    /// All styles in level order.
    pub const ALL: [Self; 7] = [
        Self::Town,
        Self::Cathedral,
        Self::Catacombs,
        Self::Caves,
        Self::Hell,
        Self::Nest,
        Self::Crypt,
    ];

    /// Expansion styles use the gray ramp, the squared falloff curve, and do
    /// not force the source tile to full brightness.
    pub fn is_expansion(self) -> bool {
        matches!(self, Self::Nest | Self::Crypt)
    }

    /// Returns `true` for the style with the blood-red ramp and lava cycling.
    pub fn is_hell(self) -> bool {
        self == Self::Hell
    }

    /// Lowercase name used in config files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Town => "town",
            Self::Cathedral => "cathedral",
            Self::Catacombs => "catacombs",
            Self::Caves => "caves",
            Self::Hell => "hell",
            Self::Nest => "nest",
            Self::Crypt => "crypt",
        }
    }
}

impl fmt::Display for DungeonStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a style name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown dungeon style: {0}")]
pub struct ParseStyleError(pub String);

impl FromStr for DungeonStyle {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.name() == lower)
            .ok_or_else(|| ParseStyleError(s.to_string()))
    }
}
