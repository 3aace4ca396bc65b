//! Facade crate for the sitecover facility siting engine.
//!
//! This crate re-exports the core domain types and exposes the exact
//! HiGHS-backed solver behind a feature flag.

#![forbid(unsafe_code)]

pub use sitecover_core::{
    CellScores, CoverageProblem, CoverageSolver, DistanceTable, GridCell, GridCellError,
    ScoredCell, ScoredGrid, SiteSelection, SolveError,
};

#[cfg(feature = "solver-highs")]
pub use sitecover_solver_highs::{HighsSolver, HighsSolverConfig};
