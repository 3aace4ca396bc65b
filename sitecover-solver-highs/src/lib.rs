//! Exact maximal covering location solver for sitecover.
//!
//! This crate provides [`HighsSolver`], the default implementation of
//! the [`CoverageSolver`](sitecover_core::CoverageSolver) trait. It
//! formulates the maximal covering location problem as a binary
//! integer program and hands it to the HiGHS mixed-integer solver, so
//! the returned selection carries a global optimality certificate
//! rather than a heuristic's best effort.
//!
//! The solve is one atomic call: neighbor lists are built up front (in
//! parallel, since demand points are independent), the model is solved
//! in a single HiGHS invocation, and covered demand is attributed to
//! selected sites as a post-processing step outside the objective.

#![forbid(unsafe_code)]

mod model;
mod solver;

pub use solver::{HighsSolver, HighsSolverConfig};
