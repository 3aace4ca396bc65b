//! Grid cells and their derived scores.

use geo::Coord;
use thiserror::Error;

/// A single cell of the analysis grid.
///
/// Centroids are expressed in a planar projected coordinate system
/// (metres), so pairwise distances are plain Euclidean distances.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use sitecover_core::GridCell;
///
/// # fn main() -> Result<(), sitecover_core::GridCellError> {
/// let cell = GridCell::new(7, Coord { x: 100.0, y: 250.0 }, 42.0)?;
/// assert_eq!(cell.id, 7);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCell {
    /// Unique identifier, stable across the whole pipeline.
    pub id: u64,
    /// Cell centroid in planar projected coordinates.
    pub centroid: Coord<f64>,
    /// Non-negative demand weight carried by this cell.
    pub demand: f64,
}

/// Errors returned by [`GridCell::new`].
#[derive(Debug, Error, PartialEq)]
pub enum GridCellError {
    /// The demand weight was negative, NaN, or infinite.
    #[error("demand weight {demand} for cell {id} must be finite and non-negative")]
    InvalidDemand {
        /// Identifier of the offending cell.
        id: u64,
        /// The rejected demand value.
        demand: f64,
    },
    /// A centroid coordinate was NaN or infinite.
    #[error("centroid of cell {id} must have finite coordinates")]
    NonFiniteCentroid {
        /// Identifier of the offending cell.
        id: u64,
    },
}

impl GridCell {
    /// Validates and constructs a [`GridCell`].
    ///
    /// # Errors
    /// Returns [`GridCellError`] when the demand weight is negative or
    /// non-finite, or when a centroid coordinate is non-finite.
    pub fn new(id: u64, centroid: Coord<f64>, demand: f64) -> Result<Self, GridCellError> {
        if !centroid.x.is_finite() || !centroid.y.is_finite() {
            return Err(GridCellError::NonFiniteCentroid { id });
        }
        if !demand.is_finite() || demand < 0.0 {
            return Err(GridCellError::InvalidDemand { id, demand });
        }
        Ok(Self {
            id,
            centroid,
            demand,
        })
    }

    /// Euclidean distance between this cell's centroid and another's.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        (self.centroid.x - other.centroid.x).hypot(self.centroid.y - other.centroid.y)
    }
}

/// Per-cell scalars derived from the distance table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellScores {
    /// Count of facility instances within the access distance, summed
    /// over all facility types.
    pub accessibility: u32,
    /// Shannon entropy of the per-type count distribution. Zero when
    /// no facility is accessible.
    pub diversity: f64,
}

/// A grid cell together with its derived scores.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoredCell {
    /// The underlying cell.
    pub cell: GridCell,
    /// Scores attached by the scoring engine.
    pub scores: CellScores,
}

/// The full grid after scoring.
///
/// Scoring never mutates the input grid; it produces one of these.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoredGrid {
    cells: Vec<ScoredCell>,
}

impl ScoredGrid {
    /// Wrap a list of scored cells.
    #[must_use]
    pub fn new(cells: Vec<ScoredCell>) -> Self {
        Self { cells }
    }

    /// Iterate over the scored cells in grid order.
    pub fn iter(&self) -> std::slice::Iter<'_, ScoredCell> {
        self.cells.iter()
    }

    /// Number of cells in the grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Report whether the grid is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Borrow the scored cells as a slice.
    #[must_use]
    pub fn cells(&self) -> &[ScoredCell] {
        &self.cells
    }

    /// Look up a scored cell by identifier.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&ScoredCell> {
        self.cells.iter().find(|scored| scored.cell.id == id)
    }

    /// Consume the wrapper and return the underlying cells.
    #[must_use]
    pub fn into_inner(self) -> Vec<ScoredCell> {
        self.cells
    }
}

impl<'a> IntoIterator for &'a ScoredGrid {
    type Item = &'a ScoredCell;
    type IntoIter = std::slice::Iter<'a, ScoredCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
