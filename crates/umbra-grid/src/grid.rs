//! Flat row-major 2D tile storage with signed, bounds-checked coordinates.
//!
//! Lighting and vision math routinely produces candidate tiles outside the
//! map near its edges. [`TileGrid`] therefore takes `i32` coordinates: reads
//! outside the map return `None` and writes outside the map are skipped.

use std::ops::Range;

use thiserror::Error;

/// Errors raised when constructing a grid from external data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The supplied cell buffer does not match `width * height`.
    #[error("grid buffer has {actual} cells, expected {width}x{height} = {expected}")]
    SizeMismatch {
        /// Requested width in tiles.
        width: usize,
        /// Requested height in tiles.
        height: usize,
        /// `width * height`.
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },
    /// Two grids that must share dimensions do not.
    #[error("grid dimensions differ: {0:?} vs {1:?}")]
    DimensionMismatch((usize, usize), (usize, usize)),
}

/// A `width x height` grid of `Copy` cells stored row by row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Copy> TileGrid<T> {
    /// Creates a grid with every cell set to `fill`.
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// Wraps an existing row-major buffer.
    pub fn from_vec(width: usize, height: usize, cells: Vec<T>) -> Result<Self, GridError> {
        let expected = width * height;
        if cells.len() != expected {
            return Err(GridError::SizeMismatch {
                width,
                height,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Width in tiles.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns `true` if `(x, y)` lies on the map.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.contains(x, y).then(|| y as usize * self.width + x as usize)
    }

    /// Returns the cell at `(x, y)`, or `None` off the map.
    pub fn get(&self, x: i32, y: i32) -> Option<T> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Mutable access to the cell at `(x, y)`, or `None` off the map.
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Writes `value` at `(x, y)`. Off-map writes are skipped and return `false`.
    pub fn set(&mut self, x: i32, y: i32, value: T) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    /// Sets every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    /// Copies every cell of `other` into `self`.
    pub fn copy_from(&mut self, other: &Self) -> Result<(), GridError> {
        if self.size() != other.size() {
            return Err(GridError::DimensionMismatch(self.size(), other.size()));
        }
        self.cells.copy_from_slice(&other.cells);
        Ok(())
    }

    /// Copies the cells of `other` inside the clipped square centred on
    /// `(cx, cy)` with inclusive half-extent `half` into `self`.
    ///
    /// Both grids must share dimensions; a mismatch copies nothing.
    pub fn copy_square_from(&mut self, other: &Self, cx: i32, cy: i32, half: i32) {
        if self.size() != other.size() {
            return;
        }
        let (xs, ys) = self.clip_square(cx, cy, half);
        for y in ys {
            let row = y * self.width;
            let span = row + xs.start..row + xs.end;
            self.cells[span.clone()].copy_from_slice(&other.cells[span]);
        }
    }

    /// Applies `f` to every cell inside the clipped square centred on
    /// `(cx, cy)` with inclusive half-extent `half`.
    pub fn update_square(&mut self, cx: i32, cy: i32, half: i32, mut f: impl FnMut(&mut T)) {
        let (xs, ys) = self.clip_square(cx, cy, half);
        for y in ys {
            let row = y * self.width;
            for cell in &mut self.cells[row + xs.start..row + xs.end] {
                f(cell);
            }
        }
    }

    /// Column and row ranges of the square `[cx - half, cx + half]` x
    /// `[cy - half, cy + half]` clipped to the map. Empty when fully off-map.
    pub fn clip_square(&self, cx: i32, cy: i32, half: i32) -> (Range<usize>, Range<usize>) {
        let half = i64::from(half);
        let clip = |c: i32, len: usize| {
            let (c, len) = (i64::from(c), len as i64);
            let lo = (c - half).clamp(0, len) as usize;
            let hi = (c + half + 1).clamp(0, len) as usize;
            lo..hi.max(lo)
        };
        (clip(cx, self.width), clip(cy, self.height))
    }

    /// Row-major view of all cells.
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// Iterates over `(x, y, value)` for every cell.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, T)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &v)| ((i % width) as i32, (i / width) as i32, v))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
