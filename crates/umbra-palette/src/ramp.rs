//! Light table construction.
//!
//! Layout of the table, one 256-entry ramp per row:
//!
//! | rows                   | contents                                  |
//! |------------------------|-------------------------------------------|
//! | `0..shades`            | brightness ramps, brightest first         |
//! | `shades`               | black ramp                                |
//! | `shades + 1`           | infravision overlay                       |
//! | `shades + 2`           | stone overlay                             |
//! | `shades + 3`           | spell effect ramp                         |

use umbra_grid::{DungeonStyle, LIGHT_DARK};

use crate::translation::OverlayTranslations;

/// Entries per ramp: one per palette index.
pub const RAMP_LEN: usize = 256;

/// One palette remapping.
pub type Ramp = [u8; RAMP_LEN];

/// Number of entries of the Hell colour cycle (indices `1..=31`).
const CYCLE_LEN: usize = 31;

/// How many distinct brightness ramps to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RampMode {
    /// Fifteen shaded ramps, one per light level.
    #[default]
    Full,
    /// Three coarse ramps for low-colour displays.
    FourLevel,
}

impl RampMode {
    /// Picks [`RampMode::FourLevel`] when `four_level` is set.
    pub fn from_four_level(four_level: bool) -> Self {
        if four_level { Self::FourLevel } else { Self::Full }
    }

    /// Number of shaded ramps before the black ramp.
    pub fn shade_count(self) -> usize {
        match self {
            Self::Full => 15,
            Self::FourLevel => 3,
        }
    }

    fn shade_step(self) -> u8 {
        match self {
            Self::Full => 1,
            Self::FourLevel => 5,
        }
    }
}

// ---------------------------------------------------------------------------
// LightTable
// ---------------------------------------------------------------------------

/// All ramps for the current level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LightTable {
    style: DungeonStyle,
    mode: RampMode,
    ramps: Vec<Ramp>,
}

impl LightTable {
    /// Builds every ramp for `style`.
    pub fn build(style: DungeonStyle, mode: RampMode, overlays: &OverlayTranslations) -> Self {
        let shades = mode.shade_count();
        let mut ramps: Vec<Ramp> = (0..shades)
            .map(|i| shaded_ramp(i as u8 * mode.shade_step()))
            .collect();
        ramps.push([0; RAMP_LEN]);

        if style.is_hell() {
            for (i, ramp) in ramps[..shades].iter_mut().enumerate() {
                apply_blood_ramp(ramp, shades, i);
            }
            ramps[shades][1..=CYCLE_LEN].fill(1);
        }

        if style.is_expansion() {
            for ramp in &mut ramps[..shades] {
                for (j, entry) in ramp[..16].iter_mut().enumerate() {
                    *entry = j as u8;
                }
            }
            ramps[shades][1..16].fill(1);
        }

        ramps.push(*overlays.infravision.as_bytes());
        ramps.push(*overlays.stone.as_bytes());
        ramps.push(effects_ramp());

        tracing::debug!(%style, ?mode, ramps = ramps.len(), "built light table");
        Self { style, mode, ramps }
    }

    pub fn style(&self) -> DungeonStyle {
        self.style
    }

    pub fn mode(&self) -> RampMode {
        self.mode
    }

    /// Every ramp in table order.
    pub fn ramps(&self) -> &[Ramp] {
        &self.ramps
    }

    /// Ramp at table row `index`.
    pub fn ramp(&self, index: usize) -> Option<&Ramp> {
        self.ramps.get(index)
    }

    /// Ramp for a tile light level (`0` brightest, `15` dark).
    ///
    /// In four-level mode each ramp covers four consecutive levels.
    pub fn ramp_for_level(&self, level: u8) -> &Ramp {
        let level = level.min(LIGHT_DARK) as usize;
        let index = match self.mode {
            RampMode::Full => level,
            RampMode::FourLevel => level >> 2,
        };
        &self.ramps[index.min(self.mode.shade_count())]
    }

    /// Remaps palette index `color` for a tile at light `level`.
    pub fn shade(&self, level: u8, color: u8) -> u8 {
        self.ramp_for_level(level)[color as usize]
    }

    /// The ramp that blacks out everything.
    pub fn black(&self) -> &Ramp {
        &self.ramps[self.mode.shade_count()]
    }

    pub fn infravision(&self) -> &Ramp {
        &self.ramps[self.mode.shade_count() + 1]
    }

    pub fn stone(&self) -> &Ramp {
        &self.ramps[self.mode.shade_count() + 2]
    }

    /// Ramp used to tint spell effects.
    pub fn effects(&self) -> &Ramp {
        &self.ramps[self.mode.shade_count() + 3]
    }

    /// Advances the lava colour cycle by one step. Only Hell cycles.
    ///
    /// Rotates the first 31 non-zero entries of every brightness ramp and
    /// the black ramp one place to the left.
    pub fn cycle_colors(&mut self) {
        if !self.style.is_hell() {
            return;
        }
        let shades = self.mode.shade_count();
        for ramp in &mut self.ramps[..=shades] {
            ramp[1..=CYCLE_LEN].rotate_left(1);
        }
    }
}

fn to_ramp(entries: &[u8]) -> Ramp {
    let mut ramp = [0; RAMP_LEN];
    ramp.copy_from_slice(entries);
    ramp
}

/// Appends `len` entries counting up from `start` to `end`, then zeros.
/// Index 255 is never emitted.
fn push_band(entries: &mut Vec<u8>, start: u8, end: u8, len: usize) {
    let mut col = start;
    let mut max = end;
    for _ in 0..len {
        entries.push(col);
        if col < max {
            col += 1;
        } else {
            max = 0;
            col = 0;
        }
        if col == u8::MAX {
            max = 0;
            col = 0;
        }
    }
}

/// Brightness ramp darkened by `shade` steps.
///
/// The palette is organised as bands of 16 (or 8) colours running from
/// bright to dark; darkening shifts every index `shade` steps along its band
/// and falls off to black at the band end.
fn shaded_ramp(shade: u8) -> Ramp {
    let mut entries = Vec::with_capacity(RAMP_LEN);
    for band in 0..8u8 {
        push_band(&mut entries, 16 * band + shade, 16 * band + 15, 16);
    }
    for band in 16..20u8 {
        push_band(&mut entries, 8 * band + shade / 2, 8 * band + 7, 8);
    }
    for band in 10..16u8 {
        push_band(&mut entries, 16 * band + shade, 16 * band + 15, 16);
    }
    // Index 0 is the transparent colour.
    entries[0] = 0;
    to_ramp(&entries)
}

/// Replaces the first 32 entries with a red ramp that rises from 1 and
/// mirrors back down, compressed further for darker `ramp_index`.
fn apply_blood_ramp(ramp: &mut Ramp, shades: usize, ramp_index: usize) {
    let steps = shades - ramp_index;
    let div = shades / steps;
    let rem = shades % steps;
    let mut acc = steps;
    let mut count = 0;
    let mut col = 1u8;
    let mut blood = [0u8; 16];

    let mut j = 1;
    while j < 16 {
        blood[j] = col;
        acc += rem;
        if acc > steps && j < 15 {
            j += 1;
            blood[j] = col;
            acc -= steps;
        }
        count += 1;
        if count == div {
            col += 1;
            count = 0;
        }
        j += 1;
    }

    ramp[0] = 0;
    for j in 1..=15 {
        ramp[j] = blood[j];
        ramp[31 - j] = blood[j];
    }
    ramp[CYCLE_LEN] = 1;
}

fn effects_ramp() -> Ramp {
    let mut entries = Vec::with_capacity(RAMP_LEN);
    for row in 0..8 {
        for col in 226..239u8 {
            entries.push(if row == 0 && col == 226 { 0 } else { col });
        }
        entries.extend([0, 0, 0]);
    }
    for _ in 0..4 {
        entries.extend((224..239u8).step_by(2));
    }
    for _ in 0..6 {
        entries.extend(224..239u8);
        entries.push(0);
    }
    to_ramp(&entries)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
