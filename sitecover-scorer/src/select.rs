//! Reduce the scored grid to a tractable candidate pool.

use sitecover_core::ScoredGrid;
use thiserror::Error;

/// Outcome of candidate selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Cells at or above the quantile threshold on both the
    /// accessibility and diversity axes, ascending by identifier.
    pub candidates: Vec<u64>,
    /// Every grid cell identifier, in grid order. All cells are demand
    /// sources regardless of candidacy.
    pub demand_points: Vec<u64>,
}

/// Errors returned by [`select_candidates`].
#[derive(Debug, Error, PartialEq)]
pub enum SelectError {
    /// The quantile was outside the inclusive `0.0..=1.0` range.
    #[error("candidate quantile {value} must lie within 0.0..=1.0")]
    QuantileOutOfRange {
        /// The rejected quantile.
        value: f64,
    },
    /// The scored grid contained no cells.
    #[error("cannot select candidates from an empty grid")]
    EmptyGrid,
}

/// Select candidate sites and demand points from a scored grid.
///
/// Thresholds are the `quantile`-th quantiles of the accessibility and
/// diversity columns, computed independently with linear interpolation
/// between order statistics. A cell qualifies as a candidate only when
/// it meets *both* thresholds (comparison is `>=`, so ties at the
/// threshold are included). An empty intersection is a legitimate
/// empty candidate list, not an error.
///
/// # Errors
/// Returns [`SelectError`] when the quantile is out of range or the
/// grid is empty.
pub fn select_candidates(grid: &ScoredGrid, quantile: f64) -> Result<Selection, SelectError> {
    if !(0.0..=1.0).contains(&quantile) {
        return Err(SelectError::QuantileOutOfRange { value: quantile });
    }
    if grid.is_empty() {
        return Err(SelectError::EmptyGrid);
    }

    let access: Vec<f64> = grid
        .iter()
        .map(|scored| f64::from(scored.scores.accessibility))
        .collect();
    let diversity: Vec<f64> = grid.iter().map(|scored| scored.scores.diversity).collect();

    let access_threshold = column_quantile(&access, quantile);
    let diversity_threshold = column_quantile(&diversity, quantile);

    let mut candidates: Vec<u64> = grid
        .iter()
        .filter(|scored| {
            f64::from(scored.scores.accessibility) >= access_threshold
                && scored.scores.diversity >= diversity_threshold
        })
        .map(|scored| scored.cell.id)
        .collect();
    candidates.sort_unstable();

    let demand_points: Vec<u64> = grid.iter().map(|scored| scored.cell.id).collect();

    log::debug!(
        "selected {} candidates from {} cells at quantile {quantile}",
        candidates.len(),
        demand_points.len()
    );

    Ok(Selection {
        candidates,
        demand_points,
    })
}

/// Quantile of a column using linear interpolation between order
/// statistics, matching the conventional `(n - 1) * q` positioning.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "rank arithmetic stays within the column length"
)]
fn column_quantile(values: &[f64], quantile: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let rank = (sorted.len() - 1) as f64 * quantile;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - rank.floor();

    let low = sorted[lower];
    let high = sorted[upper.min(sorted.len() - 1)];
    low + fraction * (high - low)
}
