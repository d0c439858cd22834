//! The lighting engine facade.

use umbra_config::Config;
use umbra_grid::{
    DungeonLayout, DungeonStyle, GridError, LIGHT_DARK, LIGHT_FULL, TileFlags, TileGrid,
    TranslucencySet,
};
use umbra_lighting::{LightGrid, LightId, LightManager, LightTables, apply_light};
use umbra_palette::{LightTable, OverlayTranslations, RampMode};
use umbra_vision::{VisionId, VisionManager};

use crate::error::EngineError;

/// Owns every grid, table and source list of the current level.
pub struct LightingEngine {
    style: DungeonStyle,
    layout: DungeonLayout,
    light: LightGrid,
    flags: TileGrid<TileFlags>,
    translucency: TranslucencySet,
    tables: LightTables,
    lights: LightManager,
    visions: VisionManager,
    ramp_mode: RampMode,
    overlays: OverlayTranslations,
    light_table: LightTable,
    full_bright: bool,
}

impl LightingEngine {
    /// Creates an engine with an open, unlit map sized from `config`.
    pub fn new(config: &Config) -> Result<Self, EngineError> {
        config.validate()?;
        let (width, height) = (config.map.width, config.map.height);
        let style = config.lighting.style;
        let ramp_mode = RampMode::from_four_level(config.lighting.four_level_ramps);
        let overlays = OverlayTranslations::default();

        tracing::info!(width, height, %style, ?ramp_mode, "creating lighting engine");
        let mut engine = Self {
            style,
            layout: DungeonLayout::open(width, height),
            light: LightGrid::new(width, height, LIGHT_DARK),
            flags: TileGrid::new(width, height, TileFlags::NONE),
            translucency: TranslucencySet::new(),
            tables: LightTables::new(style),
            lights: LightManager::new(config.lighting.max_lights),
            visions: VisionManager::new(config.vision.max_visions),
            ramp_mode,
            light_table: LightTable::build(style, ramp_mode, &overlays),
            overlays,
            full_bright: false,
        };
        engine.set_full_bright(config.debug.full_bright);
        Ok(engine)
    }

    // -- Level lifecycle ----------------------------------------------------

    /// Installs a freshly generated level.
    ///
    /// `base_light` is the generator's static light; `None` leaves the level
    /// fully dark. Every source and flag from the previous level is dropped.
    pub fn load_level(
        &mut self,
        layout: DungeonLayout,
        style: DungeonStyle,
        base_light: Option<TileGrid<u8>>,
    ) -> Result<(), EngineError> {
        let (width, height) = layout.size();
        let base = match base_light {
            Some(base) if base.size() != layout.size() => {
                return Err(GridError::DimensionMismatch(layout.size(), base.size()).into());
            }
            Some(base) => base,
            None => TileGrid::new(width, height, LIGHT_DARK),
        };

        if style != self.tables.style {
            self.tables = LightTables::new(style);
        }
        self.style = style;
        self.layout = layout;
        self.light = LightGrid::from_base(base);
        self.flags = TileGrid::new(width, height, TileFlags::NONE);
        self.translucency.clear();
        self.lights.clear();
        self.visions.clear();
        self.build_light_ramps(style);
        self.reapply_full_bright();

        tracing::info!(width, height, %style, "loaded level");
        Ok(())
    }

    /// Restarts the current level: forgets exploration, drops every source
    /// and restores the static light.
    pub fn reset_level(&mut self) {
        self.flags.fill(TileFlags::NONE);
        self.translucency.clear();
        self.light.restore_base();
        self.lights.clear();
        self.visions.clear();
        self.reapply_full_bright();
        tracing::debug!("reset level state");
    }

    /// Adds a permanent light to the level's static light.
    pub fn bake_static_light(&mut self, x: i32, y: i32, radius: u8) {
        LightManager::bake_static(&mut self.light.base, &self.tables, x, y, radius);
        apply_light(&mut self.light.working, &self.tables, x, y, (0, 0), radius);
    }

    /// Makes the current working light the new static light.
    pub fn save_pre_lighting(&mut self) {
        self.light.save_pre_lighting();
    }

    /// Freezes or unfreezes the light list.
    pub fn set_frozen(&mut self, frozen: bool) {
        self.lights.set_frozen(frozen);
    }

    /// Switches the debug full-bright view.
    ///
    /// While enabled every working tile is fully lit and the light list is
    /// frozen. Disabling restores the static light and re-applies every live
    /// source where it currently stands.
    pub fn set_full_bright(&mut self, enabled: bool) {
        if enabled == self.full_bright {
            return;
        }
        self.full_bright = enabled;
        self.lights.set_frozen(enabled);
        if enabled {
            self.light.working.fill(LIGHT_FULL);
        } else {
            self.light.restore_base();
            for (_, source) in self.lights.live() {
                apply_light(
                    &mut self.light.working,
                    &self.tables,
                    source.x,
                    source.y,
                    source.offset,
                    source.radius,
                );
            }
        }
        tracing::debug!(enabled, "full-bright lighting");
    }

    pub fn is_full_bright(&self) -> bool {
        self.full_bright
    }

    // Level changes drop the frozen flag along with the light list.
    fn reapply_full_bright(&mut self) {
        if self.full_bright {
            self.lights.set_frozen(true);
            self.light.working.fill(LIGHT_FULL);
        }
    }

    /// Replaces the infravision and stone overlays and rebuilds the ramps
    /// for the style they were last built for.
    pub fn set_overlay_translations(&mut self, overlays: OverlayTranslations) {
        self.overlays = overlays;
        self.build_light_ramps(self.light_table.style());
    }

    /// Processes the light list, then the vision list.
    pub fn tick(&mut self) {
        self.process_light_list();
        self.process_vision_list();
    }

    // -- Lights -------------------------------------------------------------

    /// Adds a light; [`LightId::NONE`] when the pool is full or frozen.
    pub fn add_light(&mut self, x: i32, y: i32, radius: u8) -> LightId {
        self.lights.add_light(x, y, radius)
    }

    /// Marks a light for removal on the next light process.
    pub fn remove_light(&mut self, id: LightId) {
        self.lights.remove_light(id);
    }

    /// Resizes a light; clamped to 15 tiles.
    pub fn change_light_radius(&mut self, id: LightId, radius: u8) {
        self.lights.change_light_radius(id, radius);
    }

    /// Moves a light to another tile.
    pub fn change_light_xy(&mut self, id: LightId, x: i32, y: i32) {
        self.lights.change_light_xy(id, x, y);
    }

    /// Sets the sub-tile offset in eighths of a tile (`-7..=7`).
    pub fn change_light_offset(&mut self, id: LightId, ox: i8, oy: i8) {
        self.lights.change_light_offset(id, ox, oy);
    }

    /// Moves and resizes a light in one change.
    pub fn change_light(&mut self, id: LightId, x: i32, y: i32, radius: u8) {
        self.lights.change_light(id, x, y, radius);
    }

    /// Applies pending light mutations to the light grid.
    pub fn process_light_list(&mut self) {
        self.lights.process(&mut self.light, &self.tables);
    }

    // -- Vision -------------------------------------------------------------

    /// Adds an observer. `personal` marks the local player.
    pub fn add_vision(&mut self, x: i32, y: i32, radius: u8, personal: bool) -> VisionId {
        self.visions.add_vision(x, y, radius, personal)
    }

    /// Marks an observer for removal on the next vision process.
    pub fn remove_vision(&mut self, id: VisionId) {
        self.visions.remove_vision(id);
    }

    /// Changes how far an observer sees.
    pub fn change_vision_radius(&mut self, id: VisionId, radius: u8) {
        self.visions.change_vision_radius(id, radius);
    }

    /// Moves an observer to another tile.
    pub fn change_vision_xy(&mut self, id: VisionId, x: i32, y: i32) {
        self.visions.change_vision_xy(id, x, y);
    }

    /// Applies pending vision mutations to the tile flags.
    pub fn process_vision_list(&mut self) {
        self.visions
            .process(&mut self.flags, &self.layout, &mut self.translucency);
    }

    // -- Queries ------------------------------------------------------------

    /// Light level at `(x, y)`: `0` brightest, `15` dark. Off-map tiles are dark.
    pub fn light_at(&self, x: i32, y: i32) -> u8 {
        self.light.level(x, y)
    }

    /// Flags at `(x, y)`; empty for off-map tiles.
    pub fn flags_at(&self, x: i32, y: i32) -> TileFlags {
        self.flags.get(x, y).unwrap_or_default()
    }

    /// Returns `true` once the player has ever seen the tile.
    pub fn is_explored(&self, x: i32, y: i32) -> bool {
        self.flags_at(x, y).contains(TileFlags::EXPLORED)
    }

    /// Returns `true` if any observer sees the tile this tick.
    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        self.flags_at(x, y).contains(TileFlags::VISIBLE)
    }

    /// Returns `true` if the player sees the tile this tick.
    pub fn is_lit(&self, x: i32, y: i32) -> bool {
        self.flags_at(x, y).contains(TileFlags::LIT)
    }

    /// Returns `true` if the player currently sees into `region`.
    pub fn is_translucency_active(&self, region: u8) -> bool {
        self.translucency.is_active(region)
    }

    /// Style of the loaded level.
    pub fn style(&self) -> DungeonStyle {
        self.style
    }

    /// Opacity and region grids of the loaded level.
    pub fn layout(&self) -> &DungeonLayout {
        &self.layout
    }

    /// Base and working light layers.
    pub fn light_grid(&self) -> &LightGrid {
        &self.light
    }

    /// Per-tile visibility flags.
    pub fn flags(&self) -> &TileGrid<TileFlags> {
        &self.flags
    }

    /// The dynamic light pool.
    pub fn lights(&self) -> &LightManager {
        &self.lights
    }

    /// The observer list.
    pub fn visions(&self) -> &VisionManager {
        &self.visions
    }

    // -- Palette ------------------------------------------------------------

    /// Rebuilds the palette ramps for `style`.
    pub fn build_light_ramps(&mut self, style: DungeonStyle) {
        self.light_table = LightTable::build(style, self.ramp_mode, &self.overlays);
    }

    /// Current palette ramps.
    pub fn light_table(&self) -> &LightTable {
        &self.light_table
    }

    /// Advances the Hell lava colour cycle. Other styles are unaffected.
    pub fn cycle_colors(&mut self) {
        self.light_table.cycle_colors();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.map.width = 32;
        config.map.height = 32;
        config
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = small_config();
        config.lighting.max_lights = 0;
        assert!(matches!(LightingEngine::new(&config), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_new_engine_is_dark_and_unexplored() {
        let engine = LightingEngine::new(&small_config()).unwrap();
        assert_eq!(engine.light_at(5, 5), LIGHT_DARK);
        assert_eq!(engine.flags_at(5, 5), TileFlags::NONE);
        assert_eq!(engine.style(), DungeonStyle::Cathedral);
        assert_eq!(engine.light_table().ramps().len(), 19);
    }

    #[test]
    fn test_load_level_checks_base_light_size() {
        let mut engine = LightingEngine::new(&small_config()).unwrap();
        let result = engine.load_level(
            DungeonLayout::open(16, 16),
            DungeonStyle::Caves,
            Some(TileGrid::new(16, 8, 3)),
        );
        assert!(matches!(result, Err(EngineError::Grid(_))));
    }

    #[test]
    fn test_load_level_replaces_state() {
        let mut engine = LightingEngine::new(&small_config()).unwrap();
        engine.add_light(4, 4, 3);
        engine.add_vision(4, 4, 3, true);
        engine.tick();

        engine
            .load_level(
                DungeonLayout::open(16, 16),
                DungeonStyle::Hell,
                Some(TileGrid::new(16, 16, 9)),
            )
            .unwrap();
        assert_eq!(engine.layout().size(), (16, 16));
        assert_eq!(engine.light_at(4, 4), 9);
        assert!(!engine.is_explored(4, 4));
        assert!(engine.lights().is_empty());
        assert!(engine.visions().is_empty());
        assert_eq!(engine.light_table().style(), DungeonStyle::Hell);
    }

    #[test]
    fn test_baked_light_survives_dynamic_undo() {
        let mut engine = LightingEngine::new(&small_config()).unwrap();
        engine.bake_static_light(10, 10, 4);
        assert_eq!(engine.light_at(10, 10), LIGHT_FULL);

        let id = engine.add_light(12, 10, 6);
        engine.tick();
        engine.remove_light(id);
        engine.tick();
        assert_eq!(engine.light_at(10, 10), LIGHT_FULL);
        assert_eq!(engine.light_grid().working, engine.light_grid().base);
    }

    #[test]
    fn test_reset_level_forgets_exploration_and_sources() {
        let mut engine = LightingEngine::new(&small_config()).unwrap();
        engine.add_light(8, 8, 5);
        engine.add_vision(8, 8, 5, true);
        engine.tick();
        assert!(engine.is_explored(8, 8));

        engine.reset_level();
        assert!(!engine.is_explored(8, 8));
        assert_eq!(engine.light_at(8, 8), LIGHT_DARK);
        assert!(engine.lights().is_empty());
    }

    #[test]
    fn test_frozen_engine_ignores_light_changes() {
        let mut engine = LightingEngine::new(&small_config()).unwrap();
        engine.set_frozen(true);
        assert!(engine.add_light(8, 8, 5).is_none());
        engine.tick();
        assert_eq!(engine.light_at(8, 8), LIGHT_DARK);
    }

    #[test]
    fn test_off_map_queries_are_dark_and_empty() {
        let engine = LightingEngine::new(&small_config()).unwrap();
        assert_eq!(engine.light_at(-1, 3), LIGHT_DARK);
        assert_eq!(engine.flags_at(3, 99), TileFlags::NONE);
        assert!(!engine.is_visible(100, 100));
    }

    #[test]
    fn test_overlay_translations_rebuild_ramps() {
        let mut engine = LightingEngine::new(&small_config()).unwrap();
        let stone: Vec<u8> = vec![7; 256];
        engine.set_overlay_translations(OverlayTranslations {
            stone: umbra_palette::TranslationTable::from_bytes(&stone).unwrap(),
            ..OverlayTranslations::default()
        });
        assert!(engine.light_table().stone().iter().all(|&c| c == 7));
    }

    #[test]
    fn test_overlay_change_keeps_rebuilt_ramp_style() {
        let mut engine = LightingEngine::new(&small_config()).unwrap();
        engine.build_light_ramps(DungeonStyle::Hell);
        let hell = engine.light_table().clone();

        engine.set_overlay_translations(OverlayTranslations::default());
        assert_eq!(engine.light_table().style(), DungeonStyle::Hell);
        assert_eq!(engine.light_table(), &hell);
        assert_eq!(engine.style(), DungeonStyle::Cathedral);
    }

    #[test]
    fn test_full_bright_floods_and_restores() {
        let mut engine = LightingEngine::new(&small_config()).unwrap();
        engine.bake_static_light(5, 5, 2);
        let id = engine.add_light(20, 20, 4);
        engine.tick();
        let lit = engine.light_grid().working.clone();

        engine.set_full_bright(true);
        assert!(engine.is_full_bright());
        assert!(engine.light_grid().working.as_slice().iter().all(|&l| l == LIGHT_FULL));
        engine.change_light_xy(id, 8, 8);
        engine.tick();
        assert!(engine.light_grid().working.as_slice().iter().all(|&l| l == LIGHT_FULL));

        engine.set_full_bright(false);
        assert_eq!(engine.light_grid().working, lit);
        engine.change_light_xy(id, 8, 8);
        engine.tick();
        assert_eq!(engine.light_at(8, 8), LIGHT_FULL);
        assert_eq!(engine.light_at(20, 20), LIGHT_DARK);
    }

    #[test]
    fn test_full_bright_from_config_survives_level_load() {
        let mut config = small_config();
        config.debug.full_bright = true;
        let mut engine = LightingEngine::new(&config).unwrap();
        assert_eq!(engine.light_at(3, 3), LIGHT_FULL);

        engine
            .load_level(DungeonLayout::open(16, 16), DungeonStyle::Caves, None)
            .unwrap();
        assert_eq!(engine.light_at(15, 15), LIGHT_FULL);
        assert!(engine.add_light(4, 4, 3).is_none());
    }

    #[test]
    fn test_cycle_colors_only_in_hell() {
        let mut engine = LightingEngine::new(&small_config()).unwrap();
        let before = engine.light_table().clone();
        engine.cycle_colors();
        assert_eq!(engine.light_table(), &before);

        engine.build_light_ramps(DungeonStyle::Hell);
        let hell = engine.light_table().clone();
        engine.cycle_colors();
        assert_ne!(engine.light_table(), &hell);
    }
}
