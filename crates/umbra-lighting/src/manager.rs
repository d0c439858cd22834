//! Fixed-capacity pool of dynamic light sources.
//!
//! Mutations only record intent. Geometry is touched once per tick by
//! [`LightManager::process`], which undoes stale contributions, re-applies
//! every live source, and returns deleted slots to the free list.

use umbra_grid::TileGrid;

use crate::propagation::{LightGrid, apply_light, unlight};
use crate::tables::{LightTables, MAX_LIGHT_RADIUS, SUBTILE};

/// Handle to a light source: its pool slot.
///
/// [`LightId::NONE`] is returned when the pool is full and is accepted (and
/// ignored) by every mutator, so callers can store it unconditionally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LightId(pub u16);

impl LightId {
    /// Sentinel for "no light".
    pub const NONE: Self = Self(u16::MAX);

    /// Returns `true` for the sentinel.
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

/// A dynamic point light.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LightSource {
    /// Tile X.
    pub x: i32,
    /// Tile Y.
    pub y: i32,
    /// Sub-tile offset in eighths of a tile (`-7..=7` per axis).
    pub offset: (i8, i8),
    /// Radius in tiles (`0..=15`).
    pub radius: u8,
    /// Tile X at the last process call.
    pub old_x: i32,
    /// Tile Y at the last process call.
    pub old_y: i32,
    /// Radius at the last process call.
    pub old_radius: u8,
    /// Removed; reclaimed on the next process call.
    pub pending_delete: bool,
    /// Moved or resized since the last process call.
    pub pending_change: bool,
}

/// Pool of light sources with deferred geometry updates.
pub struct LightManager {
    sources: Vec<LightSource>,
    /// Slot permutation: the first `count` entries are allocated.
    slots: Vec<u16>,
    allocated: Vec<bool>,
    count: usize,
    dirty: bool,
    frozen: bool,
}

impl LightManager {
    /// Default number of simultaneous dynamic lights.
    pub const DEFAULT_CAPACITY: usize = 32;

    /// Creates an empty pool holding at most `capacity` lights.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(u16::MAX as usize);
        Self {
            sources: vec![LightSource::default(); capacity],
            slots: (0..capacity as u16).collect(),
            allocated: vec![false; capacity],
            count: 0,
            dirty: false,
            frozen: false,
        }
    }

    /// Drops every light without touching any grid (level change).
    pub fn clear(&mut self) {
        let capacity = self.capacity();
        *self = Self::new(capacity);
    }

    /// Maximum number of lights.
    pub fn capacity(&self) -> usize {
        self.sources.len()
    }

    /// Number of allocated lights, including ones pending deletion.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if no lights are allocated.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns `true` if a mutation is waiting for the next process call.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns `true` while mutations are being ignored.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// While frozen, every mutator and [`process`](Self::process) is a no-op.
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    /// Returns the source behind `id`, if it is allocated.
    pub fn get(&self, id: LightId) -> Option<&LightSource> {
        self.slot(id).map(|slot| &self.sources[slot])
    }

    /// Iterates over allocated lights that are not pending deletion.
    pub fn live(&self) -> impl Iterator<Item = (LightId, &LightSource)> + '_ {
        self.slots[..self.count]
            .iter()
            .map(|&slot| (LightId(slot), &self.sources[slot as usize]))
            .filter(|(_, source)| !source.pending_delete)
    }

    fn slot(&self, id: LightId) -> Option<usize> {
        let slot = id.0 as usize;
        (!id.is_none() && self.allocated.get(slot).copied().unwrap_or(false)).then_some(slot)
    }

    /// Allocates a light at `(x, y)` with `radius`. Takes effect on the next
    /// process call.
    ///
    /// Returns [`LightId::NONE`] if the pool is full or frozen.
    pub fn add_light(&mut self, x: i32, y: i32, radius: u8) -> LightId {
        if self.frozen {
            return LightId::NONE;
        }
        if self.count >= self.capacity() {
            tracing::warn!(capacity = self.capacity(), x, y, "light pool exhausted");
            return LightId::NONE;
        }

        let slot = self.slots[self.count];
        self.count += 1;
        self.allocated[slot as usize] = true;
        let radius = radius.min(MAX_LIGHT_RADIUS);
        self.sources[slot as usize] = LightSource {
            x,
            y,
            radius,
            old_x: x,
            old_y: y,
            old_radius: radius,
            ..LightSource::default()
        };
        self.dirty = true;
        LightId(slot)
    }

    /// Marks a light for deletion.
    pub fn remove_light(&mut self, id: LightId) {
        if self.frozen {
            return;
        }
        let Some(slot) = self.slot(id) else {
            tracing::trace!(?id, "remove of unallocated light");
            return;
        };
        self.sources[slot].pending_delete = true;
        self.dirty = true;
    }

    /// Records the pre-change state once per tick and returns the source to edit.
    fn begin_change(&mut self, id: LightId) -> Option<&mut LightSource> {
        if self.frozen {
            return None;
        }
        let Some(slot) = self.slot(id) else {
            tracing::trace!(?id, "change of unallocated light");
            return None;
        };
        self.dirty = true;
        let source = &mut self.sources[slot];
        if !source.pending_change {
            source.pending_change = true;
            source.old_x = source.x;
            source.old_y = source.y;
            source.old_radius = source.radius;
        }
        Some(source)
    }

    /// Changes a light's radius.
    pub fn change_light_radius(&mut self, id: LightId, radius: u8) {
        if let Some(source) = self.begin_change(id) {
            source.radius = radius.min(MAX_LIGHT_RADIUS);
        }
    }

    /// Moves a light to tile `(x, y)`.
    pub fn change_light_xy(&mut self, id: LightId, x: i32, y: i32) {
        if let Some(source) = self.begin_change(id) {
            source.x = x;
            source.y = y;
        }
    }

    /// Sets a light's sub-tile offset in eighths of a tile.
    pub fn change_light_offset(&mut self, id: LightId, ox: i8, oy: i8) {
        let limit = (SUBTILE - 1) as i8;
        if let Some(source) = self.begin_change(id) {
            source.offset = (ox.clamp(-limit, limit), oy.clamp(-limit, limit));
        }
    }

    /// Moves and resizes a light.
    pub fn change_light(&mut self, id: LightId, x: i32, y: i32, radius: u8) {
        if let Some(source) = self.begin_change(id) {
            source.x = x;
            source.y = y;
            source.radius = radius.min(MAX_LIGHT_RADIUS);
        }
    }

    /// Applies every pending mutation to `grid`.
    ///
    /// Undoes deleted lights at their current position and changed lights at
    /// their previous position, re-applies every live light, then reclaims
    /// deleted slots. Does nothing when idle or frozen.
    pub fn process(&mut self, grid: &mut LightGrid, tables: &LightTables) {
        if self.frozen || !self.dirty {
            return;
        }

        for &slot in &self.slots[..self.count] {
            let source = &mut self.sources[slot as usize];
            if source.pending_delete {
                unlight(grid, tables, source.x, source.y, source.radius);
            }
            if source.pending_change {
                unlight(grid, tables, source.old_x, source.old_y, source.old_radius);
                source.pending_change = false;
            }
        }

        for &slot in &self.slots[..self.count] {
            let source = &self.sources[slot as usize];
            if !source.pending_delete {
                apply_light(
                    &mut grid.working,
                    tables,
                    source.x,
                    source.y,
                    source.offset,
                    source.radius,
                );
            }
        }

        let mut reclaimed = 0;
        let mut i = 0;
        while i < self.count {
            let slot = self.slots[i] as usize;
            if self.sources[slot].pending_delete {
                self.count -= 1;
                self.slots.swap(i, self.count);
                self.allocated[slot] = false;
                self.sources[slot] = LightSource::default();
                reclaimed += 1;
            } else {
                i += 1;
            }
        }

        self.dirty = false;
        tracing::debug!(live = self.count, reclaimed, "processed light list");
    }

    /// Writes a light straight into `base` during level load, bypassing the
    /// pool (pre-placed torches, lava glow).
    pub fn bake_static(
        base: &mut TileGrid<u8>,
        tables: &LightTables,
        x: i32,
        y: i32,
        radius: u8,
    ) {
        apply_light(base, tables, x, y, (0, 0), radius);
    }
}

impl Default for LightManager {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
