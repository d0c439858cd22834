//! 256-entry palette translation tables supplied by the asset layer.

use thiserror::Error;

use crate::ramp::RAMP_LEN;

// ---------------------------------------------------------------------------
// PaletteError
// ---------------------------------------------------------------------------

/// Errors returned while assembling palette tables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    /// A translation table did not contain exactly one entry per palette index.
    #[error("translation table must be {expected} bytes, got {actual}")]
    TranslationLength {
        /// Required length.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },
}

// ---------------------------------------------------------------------------
// TranslationTable
// ---------------------------------------------------------------------------

/// Remaps every palette index to another index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslationTable([u8; RAMP_LEN]);

impl TranslationTable {
    /// The table that maps every index to itself.
    pub fn identity() -> Self {
        let mut table = [0u8; RAMP_LEN];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = i as u8;
        }
        Self(table)
    }

    /// Parses a raw translation file. The input must be exactly 256 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PaletteError> {
        let table: [u8; RAMP_LEN] = bytes.try_into().map_err(|_| PaletteError::TranslationLength {
            expected: RAMP_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(table))
    }

    /// Translated index for `color`.
    pub fn apply(&self, color: u8) -> u8 {
        self.0[color as usize]
    }

    /// The raw table.
    pub fn as_bytes(&self) -> &[u8; RAMP_LEN] {
        &self.0
    }
}

impl Default for TranslationTable {
    fn default() -> Self {
        Self::identity()
    }
}

/// Overlay ramps appended after the brightness ramps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayTranslations {
    /// Tints monsters seen through infravision.
    pub infravision: TranslationTable,
    /// Tints petrified monsters.
    pub stone: TranslationTable,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_maps_every_index_to_itself() {
        let table = TranslationTable::identity();
        assert!((0..=255u8).all(|c| table.apply(c) == c));
    }

    #[test]
    fn test_from_bytes_accepts_full_table() {
        let bytes: Vec<u8> = (0..=255u8).rev().collect();
        let table = TranslationTable::from_bytes(&bytes).unwrap();
        assert_eq!(table.apply(0), 255);
        assert_eq!(table.apply(255), 0);
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        let err = TranslationTable::from_bytes(&[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            PaletteError::TranslationLength {
                expected: 256,
                actual: 3
            }
        );
        assert_eq!(err.to_string(), "translation table must be 256 bytes, got 3");
    }
}
