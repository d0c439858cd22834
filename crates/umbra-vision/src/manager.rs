//! Vision sources with deferred updates.
//!
//! Sources are kept in a dense list and found by id with a linear scan; the
//! list is short (one entry per player plus a few scripted observers).

use umbra_grid::{DungeonLayout, TileFlags, TileGrid, TranslucencySet};

use crate::shadowcast::{cast_vision, unvision};

/// Stable identifier of a vision source.
///
/// Ids increase monotonically from 1 and are never reused within a level.
/// [`VisionId::NONE`] is returned when the list is full and ignored by every
/// mutator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VisionId(pub u32);

impl VisionId {
    /// Sentinel for "no vision source".
    pub const NONE: Self = Self(0);

    /// Returns `true` for the sentinel.
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

/// An observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisionSource {
    /// Handle given out by [`VisionManager::add_vision`].
    pub id: VisionId,
    /// Tile X.
    pub x: i32,
    /// Tile Y.
    pub y: i32,
    /// Sight range in tiles.
    pub radius: u8,
    /// Tile X at the last process call.
    pub old_x: i32,
    /// Tile Y at the last process call.
    pub old_y: i32,
    /// Radius at the last process call.
    pub old_radius: u8,
    /// The local player: explores, lights and activates translucency.
    pub personal: bool,
    /// Removed; dropped on the next process call.
    pub pending_delete: bool,
    /// Moved or resized since the last process call.
    pub pending_change: bool,
}

/// Bounded list of vision sources.
pub struct VisionManager {
    sources: Vec<VisionSource>,
    capacity: usize,
    next_id: u32,
    dirty: bool,
}

impl VisionManager {
    /// Default number of simultaneous observers.
    pub const DEFAULT_CAPACITY: usize = 32;

    /// Creates an empty list holding at most `capacity` sources.
    pub fn new(capacity: usize) -> Self {
        Self {
            sources: Vec::with_capacity(capacity),
            capacity,
            next_id: 1,
            dirty: false,
        }
    }

    /// Drops every source and restarts id allocation (level change).
    pub fn clear(&mut self) {
        self.sources.clear();
        self.next_id = 1;
        self.dirty = false;
    }

    /// Maximum number of sources.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of sources, including ones pending deletion.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Returns `true` if a source changed since the last process call.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the source with `id`, if any.
    pub fn get(&self, id: VisionId) -> Option<&VisionSource> {
        self.sources.iter().find(|s| s.id == id)
    }

    /// Iterates over sources that are not pending deletion.
    pub fn live(&self) -> impl Iterator<Item = &VisionSource> + '_ {
        self.sources.iter().filter(|s| !s.pending_delete)
    }

    fn position(&self, id: VisionId) -> Option<usize> {
        if id.is_none() {
            return None;
        }
        let index = self.sources.iter().position(|s| s.id == id);
        if index.is_none() {
            tracing::trace!(?id, "unknown vision id");
        }
        index
    }

    /// Adds an observer at `(x, y)`. Takes effect on the next process call.
    ///
    /// Returns [`VisionId::NONE`] when the list is full.
    pub fn add_vision(&mut self, x: i32, y: i32, radius: u8, personal: bool) -> VisionId {
        if self.sources.len() >= self.capacity {
            tracing::warn!(capacity = self.capacity, x, y, "vision list exhausted");
            return VisionId::NONE;
        }

        let id = VisionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        self.sources.push(VisionSource {
            id,
            x,
            y,
            radius,
            old_x: x,
            old_y: y,
            old_radius: radius,
            personal,
            pending_delete: false,
            pending_change: false,
        });
        self.dirty = true;
        id
    }

    /// Marks an observer for deletion.
    pub fn remove_vision(&mut self, id: VisionId) {
        if let Some(index) = self.position(id) {
            self.sources[index].pending_delete = true;
            self.dirty = true;
        }
    }

    /// Records the pre-change state once per tick and returns the source to edit.
    fn begin_change(&mut self, id: VisionId) -> Option<&mut VisionSource> {
        let index = self.position(id)?;
        self.dirty = true;
        let source = &mut self.sources[index];
        if !source.pending_change {
            source.pending_change = true;
            source.old_x = source.x;
            source.old_y = source.y;
            source.old_radius = source.radius;
        }
        Some(source)
    }

    /// Changes an observer's radius.
    pub fn change_vision_radius(&mut self, id: VisionId, radius: u8) {
        if let Some(source) = self.begin_change(id) {
            source.radius = radius;
        }
    }

    /// Moves an observer to tile `(x, y)`.
    pub fn change_vision_xy(&mut self, id: VisionId, x: i32, y: i32) {
        if let Some(source) = self.begin_change(id) {
            source.x = x;
            source.y = y;
        }
    }

    /// Recomputes visibility if anything changed since the last call.
    ///
    /// Clears the old footprint of deleted and changed sources, rebuilds the
    /// translucency set from scratch, re-casts every live source and drops
    /// deleted ones.
    pub fn process(
        &mut self,
        flags: &mut TileGrid<TileFlags>,
        layout: &DungeonLayout,
        translucency: &mut TranslucencySet,
    ) {
        if !self.dirty {
            return;
        }

        for source in &mut self.sources {
            if source.pending_delete {
                unvision(flags, source.x, source.y, source.radius);
            }
            if source.pending_change {
                unvision(flags, source.old_x, source.old_y, source.old_radius);
                source.pending_change = false;
            }
        }

        translucency.clear();
        for source in self.live() {
            cast_vision(
                flags,
                layout,
                translucency,
                source.x,
                source.y,
                source.radius,
                source.personal,
            );
        }

        let before = self.sources.len();
        let mut i = 0;
        while i < self.sources.len() {
            if self.sources[i].pending_delete {
                self.sources.swap_remove(i);
            } else {
                i += 1;
            }
        }

        self.dirty = false;
        tracing::debug!(
            live = self.sources.len(),
            removed = before - self.sources.len(),
            "processed vision list"
        );
    }
}

impl Default for VisionManager {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
