//! Core domain types for the sitecover siting engine.
//!
//! These models provide basic validation to keep downstream
//! components honest. Constructors return `Result` to surface
//! invalid input early. The crate also defines the narrow
//! [`CoverageSolver`] contract so optimization backends can be
//! swapped without touching scoring or selection.

#![forbid(unsafe_code)]

mod distance;
mod grid;
mod solver;

pub use distance::DistanceTable;
pub use grid::{CellScores, GridCell, GridCellError, ScoredCell, ScoredGrid};
pub use solver::{CoverageProblem, CoverageSolver, SiteSelection, SolveError};
