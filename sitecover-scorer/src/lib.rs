//! Scoring and candidate selection for the sitecover pipeline.
//!
//! The crate provides two complementary capabilities:
//! - **Accessibility and diversity scoring** turns raw per-cell
//!   distance observations into two scalars per grid cell: a count of
//!   facility instances within the access distance, and the Shannon
//!   entropy of the per-type count distribution. Scoring is pure and
//!   total; malformed or missing observations count as zero accessible
//!   facilities rather than raising errors.
//! - **Candidate selection** reduces the scored grid to the cells that
//!   sit at or above an upper quantile on *both* axes, alongside the
//!   unfiltered demand point set.
//!
//! # Examples
//!
//! ```
//! use geo::Coord;
//! use sitecover_core::{DistanceTable, GridCell};
//! use sitecover_scorer::score_grid;
//!
//! # fn main() -> Result<(), sitecover_core::GridCellError> {
//! let grid = vec![GridCell::new(1, Coord { x: 0.0, y: 0.0 }, 10.0)?];
//! let mut table = DistanceTable::new();
//! table.insert("cafe", 1, vec![Some(300.0), Some(2000.0)]);
//!
//! let scored = score_grid(&grid, &["cafe".to_owned()], &table, 1200.0);
//! assert_eq!(scored.cells()[0].scores.accessibility, 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use rayon::prelude::*;
use sitecover_core::{CellScores, DistanceTable, GridCell, ScoredCell, ScoredGrid};

mod select;

pub use select::{SelectError, Selection, select_candidates};

/// Shannon entropy (natural log) of a per-type count distribution.
///
/// Types with zero count contribute nothing; a zero total yields an
/// entropy of exactly `0.0` by policy, not `NaN`.
#[expect(
    clippy::cast_precision_loss,
    reason = "facility counts are far below the 2^52 precision horizon"
)]
#[must_use]
pub fn shannon_diversity(counts: &[u32]) -> f64 {
    let total: u64 = counts.iter().map(|&count| u64::from(count)).sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    counts
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let proportion = f64::from(count) / total;
            -proportion * proportion.ln()
        })
        .sum()
}

/// Score a single cell against the distance table.
///
/// For each facility type, counts observations that are present,
/// finite, and at most `max_distance` away (boundary inclusive).
/// Missing types or cells contribute zero. The function is pure and
/// never fails.
#[must_use]
pub fn score_cell(
    cell_id: u64,
    facility_types: &[String],
    table: &DistanceTable,
    max_distance: f64,
) -> CellScores {
    let counts: Vec<u32> = facility_types
        .iter()
        .map(|facility_type| {
            accessible_count(table.observations(facility_type, cell_id), max_distance)
        })
        .collect();
    CellScores {
        accessibility: counts.iter().sum(),
        diversity: shannon_diversity(&counts),
    }
}

/// Score every cell of the grid.
///
/// The input grid is read-only; scores are attached to a new
/// [`ScoredGrid`] preserving cell order. Cells are independent, so
/// scoring fans out across the rayon thread pool.
#[must_use]
pub fn score_grid(
    grid: &[GridCell],
    facility_types: &[String],
    table: &DistanceTable,
    max_distance: f64,
) -> ScoredGrid {
    let cells: Vec<ScoredCell> = grid
        .par_iter()
        .map(|cell| ScoredCell {
            scores: score_cell(cell.id, facility_types, table, max_distance),
            cell: cell.clone(),
        })
        .collect();
    log::debug!(
        "scored {} cells against {} facility types",
        cells.len(),
        facility_types.len()
    );
    ScoredGrid::new(cells)
}

fn accessible_count(observations: &[Option<f64>], max_distance: f64) -> u32 {
    let count = observations
        .iter()
        .filter(|entry| {
            entry.is_some_and(|distance| distance.is_finite() && distance <= max_distance)
        })
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests;
