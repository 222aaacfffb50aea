//! Grid geometry.

use serde::{Deserialize, Serialize};

use crate::error::{CollageError, Result};

/// Largest number of rows or columns a collage may have.
pub const MAX_GRID_SIDE: u32 = 5;

/// Validated collage grid shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSpec {
    rows: u32,
    cols: u32,
}

impl GridSpec {
    /// Create a grid, checking `1 <= rows, cols <= 5`.
    pub fn new(rows: u32, cols: u32) -> Result<Self> {
        let in_range = |n: u32| (1..=MAX_GRID_SIDE).contains(&n);
        if !in_range(rows) || !in_range(cols) {
            return Err(CollageError::InvalidConfiguration(format!(
                "Invalid number of columns or rows: {}x{}: values must be between 1 and {}",
                cols, rows, MAX_GRID_SIDE
            )));
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of cells, which is also the top-list limit.
    pub fn capacity(&self) -> u32 {
        self.rows * self.cols
    }

    /// Row-major `(row, col)` of the cell for item `index`.
    pub fn cell_of(&self, index: u32) -> Option<(u32, u32)> {
        (index < self.capacity()).then(|| (index / self.cols, index % self.cols))
    }
}

/// Pixel size of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for CellSize {
    /// Last.fm "extralarge" cover size.
    fn default() -> Self {
        Self::new(300, 300)
    }
}
