//! Exact coverage solver contract.
//!
//! The maximal covering location problem is handed to a backend
//! through a deliberately narrow interface: a [`CoverageProblem`] in,
//! a [`SiteSelection`] out. Backends must solve to optimality or
//! report a distinct failure; heuristics do not satisfy this contract.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::GridCell;

/// One maximal covering location problem instance.
///
/// A demand point is covered when at least one selected candidate lies
/// within `max_distance` of it (Euclidean, boundary inclusive).
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageProblem {
    /// Candidate facility sites.
    pub candidates: Vec<GridCell>,
    /// Demand points; every grid cell counts, regardless of candidacy.
    pub demand_points: Vec<GridCell>,
    /// Number of facilities to place (exactly, not at most).
    pub facility_count: usize,
    /// Maximum coverage distance in metres.
    pub max_distance: f64,
}

impl CoverageProblem {
    /// Check the instance against the solver contract.
    ///
    /// # Errors
    /// Returns a [`SolveError`] validation variant when the facility
    /// count is zero or exceeds the candidate pool, when the coverage
    /// distance is not a positive finite number, or when a demand
    /// point carries a negative or non-finite weight. Validation runs
    /// before any optimization is attempted.
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.facility_count == 0 {
            return Err(SolveError::NonPositiveFacilityCount);
        }
        if self.facility_count > self.candidates.len() {
            return Err(SolveError::TooFewCandidates {
                requested: self.facility_count,
                available: self.candidates.len(),
            });
        }
        if !self.max_distance.is_finite() || self.max_distance <= 0.0 {
            return Err(SolveError::InvalidMaxDistance {
                value: self.max_distance,
            });
        }
        // Fields are public, so weights validated at construction may
        // have been overwritten since.
        if let Some(point) = self
            .demand_points
            .iter()
            .find(|point| !point.demand.is_finite() || point.demand < 0.0)
        {
            return Err(SolveError::InvalidDemandWeight {
                id: point.id,
                demand: point.demand,
            });
        }
        Ok(())
    }
}

/// Result of a successful solve.
///
/// Plain identifier and weight structures only; no geometry attached.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SiteSelection {
    /// Identifiers of the selected sites, ascending.
    pub selected: Vec<u64>,
    /// Demand weight attributed to each selected site. Every covered
    /// demand point contributes its weight to exactly one site.
    pub coverage: BTreeMap<u64, f64>,
    /// Total covered demand weight, the optimization objective.
    pub objective: f64,
}

/// Errors returned by [`CoverageSolver::solve`].
#[derive(Debug, Error, PartialEq)]
pub enum SolveError {
    /// The facility count was zero.
    #[error("facility count must be at least 1")]
    NonPositiveFacilityCount,
    /// More facilities were requested than candidates exist.
    #[error("facility count {requested} exceeds the {available} available candidate sites")]
    TooFewCandidates {
        /// Facilities requested.
        requested: usize,
        /// Candidate sites available.
        available: usize,
    },
    /// The coverage distance was not a positive finite number.
    #[error("maximum coverage distance {value} must be positive and finite")]
    InvalidMaxDistance {
        /// The rejected distance.
        value: f64,
    },
    /// A demand point carried a negative or non-finite weight.
    #[error("demand weight {demand} of point {id} must be finite and non-negative")]
    InvalidDemandWeight {
        /// Identifier of the offending demand point.
        id: u64,
        /// The rejected weight.
        demand: f64,
    },
    /// The model admits no assignment placing the requested sites.
    #[error("no feasible placement of {requested} facilities exists")]
    Infeasible {
        /// Facilities requested.
        requested: usize,
    },
    /// The backend terminated without an optimal certificate.
    #[error("solver terminated without an optimal certificate ({status})")]
    Backend {
        /// Backend-reported termination status.
        status: String,
        /// Last known objective value, when the backend exposed one.
        objective: Option<f64>,
    },
}

/// Choose facility sites maximizing covered demand weight.
///
/// Implementations must validate the problem before solving, return
/// the global optimum, and be `Send + Sync` so a solver can be shared
/// across threads. The solve is one atomic call: there are no partial
/// or incremental results.
pub trait CoverageSolver: Send + Sync {
    /// Solve an instance to optimality.
    ///
    /// # Errors
    /// Returns a validation variant of [`SolveError`] for contract
    /// violations, [`SolveError::Infeasible`] when no assignment
    /// exists, and [`SolveError::Backend`] when the underlying engine
    /// stops without an optimal certificate.
    fn solve(&self, problem: &CoverageProblem) -> Result<SiteSelection, SolveError>;
}
