//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use umbra_grid::{DEFAULT_MAP_SIZE, DungeonStyle};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Largest accepted map side. Light windows and vision rays use `i32` tile
/// coordinates with some headroom.
const MAX_MAP_SIDE: usize = 4096;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Dungeon dimensions.
    pub map: MapConfig,
    /// Light pool and palette settings.
    pub lighting: LightingConfig,
    /// Vision list settings.
    pub vision: VisionConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Dungeon grid dimensions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    /// Width in tiles.
    pub width: usize,
    /// Height in tiles.
    pub height: usize,
}

/// Lighting configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    /// Maximum number of simultaneous dynamic lights.
    pub max_lights: usize,
    /// Dungeon style used when none is given at level load.
    pub style: DungeonStyle,
    /// Build three coarse brightness ramps instead of fifteen.
    pub four_level_ramps: bool,
}

/// Vision configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VisionConfig {
    /// Maximum number of simultaneous observers.
    pub max_visions: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Light every tile fully and freeze the light list.
    pub full_bright: bool,
}

// --- Default implementations ---

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_MAP_SIZE,
            height: DEFAULT_MAP_SIZE,
        }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            max_lights: 32,
            style: DungeonStyle::default(),
            four_level_ramps: false,
        }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self { max_visions: 32 }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            full_bright: false,
        }
    }
}

/// Platform config directory for Umbra, e.g. `~/.config/umbra` on Linux.
/// Falls back to the working directory when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("umbra")
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Checks that sizes and capacities are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, side) in [("map.width", self.map.width), ("map.height", self.map.height)] {
            if side == 0 || side > MAX_MAP_SIDE {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("{side} is outside 1..={MAX_MAP_SIDE}"),
                });
            }
        }
        if self.lighting.max_lights == 0 || self.lighting.max_lights >= u16::MAX as usize {
            return Err(ConfigError::InvalidValue {
                field: "lighting.max_lights",
                reason: format!("{} is outside 1..{}", self.lighting.max_lights, u16::MAX),
            });
        }
        if self.vision.max_visions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "vision.max_visions",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 112"));
        assert!(ron_str.contains("max_lights: 32"));
        assert!(ron_str.contains("style: Cathedral"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.lighting.style = DungeonStyle::Crypt;
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(map: (width: 64), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.map.width, 64);
        assert_eq!(config.map.height, DEFAULT_MAP_SIZE);
        assert_eq!(config.lighting, LightingConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.map.width = 40;
        config.lighting.style = DungeonStyle::Hell;
        config.lighting.four_level_ramps = true;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.vision.max_visions = 4;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.vision.max_visions), Some(4));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "(lighting: (max_lights: 0))").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid config value for lighting.max_lights: 0 is outside 1..65535"
        );
    }

    #[test]
    fn test_validate_rejects_empty_map() {
        let mut config = Config::default();
        config.map.height = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "map.height", .. })
        ));
    }

    #[test]
    fn test_default_config_dir_ends_with_umbra() {
        assert!(default_config_dir().ends_with("umbra"));
    }
}
