//! Bipartite coverage relation and binary model assembly.

use highs::{Col, RowProblem};
use rayon::prelude::*;
use sitecover_core::CoverageProblem;

/// Decision columns of the assembled model.
pub(crate) struct CoverageModel {
    /// The row-oriented HiGHS problem, ready to optimise.
    pub problem: RowProblem,
    /// `x_i`: one binary per candidate, 1 iff the site is selected.
    pub site_cols: Vec<Col>,
    /// `y_j`: one binary per demand point, 1 iff the point is covered.
    pub covered_cols: Vec<Col>,
}

/// Candidate indices within coverage range of each demand point.
///
/// Entry `j` lists indices into `problem.candidates` whose centroid is
/// at most `max_distance` from demand point `j` (boundary inclusive).
/// An empty entry marks a demand point no selection can ever cover.
/// Demand points are independent, so the scan fans out across the
/// rayon thread pool.
pub(crate) fn neighbor_lists(problem: &CoverageProblem) -> Vec<Vec<usize>> {
    problem
        .demand_points
        .par_iter()
        .map(|demand| {
            problem
                .candidates
                .iter()
                .enumerate()
                .filter(|(_, candidate)| candidate.distance_to(demand) <= problem.max_distance)
                .map(|(index, _)| index)
                .collect()
        })
        .collect()
}

/// Assemble the binary covering model.
///
/// Objective: maximize `sum_j demand_j * y_j`. Constraints: exactly
/// `facility_count` sites selected; each `y_j` bounded by the sum of
/// its in-range `x_i`, or pinned to zero when no candidate is in
/// range (an uncoverable point is not an infeasibility).
#[expect(
    clippy::cast_precision_loss,
    reason = "facility counts are far below the 2^52 precision horizon"
)]
pub(crate) fn build_model(problem: &CoverageProblem, neighbors: &[Vec<usize>]) -> CoverageModel {
    let mut row_problem = RowProblem::new();

    let site_cols: Vec<Col> = problem
        .candidates
        .iter()
        .map(|_| row_problem.add_integer_column(0.0, 0.0..=1.0))
        .collect();
    let covered_cols: Vec<Col> = problem
        .demand_points
        .iter()
        .map(|demand| row_problem.add_integer_column(demand.demand, 0.0..=1.0))
        .collect();

    // sum_i x_i = facility_count
    let facility_count = problem.facility_count as f64;
    row_problem.add_row(
        facility_count..=facility_count,
        site_cols.iter().map(|&col| (col, 1.0)).collect::<Vec<_>>(),
    );

    for (covered_col, neighbor_sites) in covered_cols.iter().zip(neighbors) {
        if neighbor_sites.is_empty() {
            // y_j = 0: this point can never be covered.
            row_problem.add_row(0.0..=0.0, vec![(*covered_col, 1.0)]);
        } else {
            // y_j - sum_{i in N(j)} x_i <= 0
            let mut terms = vec![(*covered_col, 1.0)];
            terms.extend(neighbor_sites.iter().map(|&index| (site_cols[index], -1.0)));
            row_problem.add_row(..=0.0, terms);
        }
    }

    CoverageModel {
        problem: row_problem,
        site_cols,
        covered_cols,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::rstest;
    use sitecover_core::GridCell;

    fn cell(id: u64, x: f64, y: f64) -> GridCell {
        GridCell::new(id, Coord { x, y }, 1.0).expect("valid cell")
    }

    #[rstest]
    fn neighbor_lists_are_boundary_inclusive() {
        let problem = CoverageProblem {
            candidates: vec![cell(1, 0.0, 0.0), cell(2, 10.0, 0.0)],
            demand_points: vec![cell(1, 0.0, 0.0), cell(3, 20.0, 0.0), cell(4, 500.0, 0.0)],
            facility_count: 1,
            max_distance: 10.0,
        };

        let lists = neighbor_lists(&problem);

        // Demand 1 sits on candidate 1 and exactly 10m from candidate 2.
        assert_eq!(lists[0], vec![0, 1]);
        assert_eq!(lists[1], vec![1]);
        assert!(lists[2].is_empty());
    }

    #[rstest]
    fn model_has_one_column_per_decision() {
        let problem = CoverageProblem {
            candidates: vec![cell(1, 0.0, 0.0), cell(2, 10.0, 0.0)],
            demand_points: vec![cell(1, 0.0, 0.0), cell(3, 20.0, 0.0), cell(4, 500.0, 0.0)],
            facility_count: 1,
            max_distance: 10.0,
        };
        let neighbors = neighbor_lists(&problem);

        let model = build_model(&problem, &neighbors);

        assert_eq!(model.site_cols.len(), 2);
        assert_eq!(model.covered_cols.len(), 3);
    }
}
