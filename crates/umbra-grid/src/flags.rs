//! Per-tile visibility bits.

use serde::{Deserialize, Serialize};

/// Per-tile flag bits. Combines via bitwise OR.
///
/// `EXPLORED` is sticky for the lifetime of a level; `VISIBLE` and `LIT` are
/// recomputed by every vision pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileFlags(pub u8);

impl TileFlags {
    /// No bits set.
    pub const NONE: Self = Self(0);
    /// Seen at least once by a personal vision source (automap).
    pub const EXPLORED: Self = Self(1 << 0);
    /// In line of sight of some vision source this tick.
    pub const VISIBLE: Self = Self(1 << 1);
    /// In line of sight of a personal vision source this tick.
    pub const LIT: Self = Self(1 << 2);

    /// Bits cleared when a vision source is undone.
    pub const TRANSIENT: Self = Self(Self::VISIBLE.0 | Self::LIT.0);

    /// Returns true if `self` contains all bits in `other`.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if no bits are set.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Sets the bits in `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears the bits in `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl std::ops::BitOr for TileFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for TileFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for TileFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
