//! [`HighsSolver`] implementation backed by the HiGHS MIP engine.

use std::collections::BTreeMap;

use highs::{HighsModelStatus, Sense};
use sitecover_core::{CoverageProblem, CoverageSolver, GridCell, SiteSelection, SolveError};

use crate::model::{build_model, neighbor_lists};

/// Configuration for [`HighsSolver`].
#[derive(Debug, Clone, Default)]
pub struct HighsSolverConfig {
    /// Forward HiGHS log output to the console. Off by default.
    pub verbose: bool,
}

/// Exact solver using HiGHS to place facilities optimally.
///
/// The solver validates the problem, builds the binary covering model,
/// solves it in one atomic call, and attributes covered demand to the
/// nearest selected site. Exact distance ties during attribution break
/// toward the lowest site identifier; this is a documented rule, since
/// the optimization itself does not constrain attribution.
#[derive(Debug, Clone, Default)]
pub struct HighsSolver {
    config: HighsSolverConfig,
}

impl HighsSolver {
    /// Construct a solver using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: HighsSolverConfig) -> Self {
        Self { config }
    }
}

impl CoverageSolver for HighsSolver {
    fn solve(&self, problem: &CoverageProblem) -> Result<SiteSelection, SolveError> {
        problem.validate()?;

        let neighbors = neighbor_lists(problem);
        log::debug!(
            "coverage relation built: {} demand points, {} candidates, {} coverable",
            problem.demand_points.len(),
            problem.candidates.len(),
            neighbors.iter().filter(|list| !list.is_empty()).count()
        );

        let model = build_model(problem, &neighbors);
        let mut highs_model = model.problem.optimise(Sense::Maximise);
        highs_model.set_option("output_flag", self.config.verbose);
        let solved = highs_model.solve();

        match solved.status() {
            HighsModelStatus::Optimal => {}
            HighsModelStatus::Infeasible => {
                return Err(SolveError::Infeasible {
                    requested: problem.facility_count,
                });
            }
            status => {
                // Resource-limit terminations may still carry a finite
                // incumbent objective; error terminations do not.
                let objective = solved.objective_value();
                return Err(SolveError::Backend {
                    status: format!("{status:?}"),
                    objective: objective.is_finite().then_some(objective),
                });
            }
        }

        let solution = solved.get_solution();
        let selected_indices: Vec<usize> = model
            .site_cols
            .iter()
            .enumerate()
            .filter(|(_, &col)| solution[col] > 0.5)
            .map(|(index, _)| index)
            .collect();
        let covered: Vec<bool> = model
            .covered_cols
            .iter()
            .map(|&col| solution[col] > 0.5)
            .collect();

        Ok(assemble_selection(problem, &selected_indices, &covered))
    }
}

/// Derive the selection report from the optimal assignment.
///
/// The objective is recomputed from the attributed demand weights so
/// it is consistent with the attribution totals by construction.
fn assemble_selection(
    problem: &CoverageProblem,
    selected_indices: &[usize],
    covered: &[bool],
) -> SiteSelection {
    let mut selected: Vec<u64> = selected_indices
        .iter()
        .map(|&index| problem.candidates[index].id)
        .collect();
    selected.sort_unstable();

    let mut coverage: BTreeMap<u64, f64> = selected.iter().map(|&id| (id, 0.0)).collect();
    let mut objective = 0.0;

    for (demand, _) in problem
        .demand_points
        .iter()
        .zip(covered)
        .filter(|(_, &is_covered)| is_covered)
    {
        match nearest_selected_site(problem, selected_indices, demand) {
            Some(site_id) => {
                objective += demand.demand;
                if let Some(total) = coverage.get_mut(&site_id) {
                    *total += demand.demand;
                }
            }
            None => {
                // Cannot occur for an optimal assignment; neither the
                // objective nor any site counts this point.
                log::warn!(
                    "demand point {} marked covered with no selected site in range",
                    demand.id
                );
            }
        }
    }

    SiteSelection {
        selected,
        coverage,
        objective,
    }
}

/// Closest selected site within coverage range of a demand point.
///
/// Ties at the exact minimum distance resolve to the lowest site id.
fn nearest_selected_site(
    problem: &CoverageProblem,
    selected_indices: &[usize],
    demand: &GridCell,
) -> Option<u64> {
    let mut best: Option<(f64, u64)> = None;
    for &index in selected_indices {
        let candidate = &problem.candidates[index];
        let distance = candidate.distance_to(demand);
        if distance > problem.max_distance {
            continue;
        }
        let closer = match best {
            None => true,
            Some((best_distance, best_id)) => {
                distance < best_distance || (distance == best_distance && candidate.id < best_id)
            }
        };
        if closer {
            best = Some((distance, candidate.id));
        }
    }
    best.map(|(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::rstest;

    fn cell(id: u64, x: f64, demand: f64) -> GridCell {
        GridCell::new(id, Coord { x, y: 0.0 }, demand).expect("valid cell")
    }

    #[rstest]
    fn attribution_prefers_the_nearest_site() {
        let problem = CoverageProblem {
            candidates: vec![cell(1, 0.0, 0.0), cell(2, 10.0, 0.0)],
            demand_points: vec![cell(3, 7.0, 4.0)],
            facility_count: 2,
            max_distance: 10.0,
        };

        let site = nearest_selected_site(&problem, &[0, 1], &problem.demand_points[0]);
        assert_eq!(site, Some(2));
    }

    #[rstest]
    fn attribution_ties_break_to_the_lowest_id() {
        let problem = CoverageProblem {
            candidates: vec![cell(9, 10.0, 0.0), cell(4, -10.0, 0.0)],
            demand_points: vec![cell(1, 0.0, 4.0)],
            facility_count: 2,
            max_distance: 50.0,
        };

        let site = nearest_selected_site(&problem, &[0, 1], &problem.demand_points[0]);
        assert_eq!(site, Some(4));
    }

    #[rstest]
    fn out_of_range_sites_attribute_nothing() {
        let problem = CoverageProblem {
            candidates: vec![cell(1, 100.0, 0.0)],
            demand_points: vec![cell(2, 0.0, 1.0)],
            facility_count: 1,
            max_distance: 10.0,
        };

        assert_eq!(
            nearest_selected_site(&problem, &[0], &problem.demand_points[0]),
            None
        );
    }

    #[rstest]
    fn unattributable_covered_points_do_not_inflate_the_objective() {
        let problem = CoverageProblem {
            candidates: vec![cell(1, 0.0, 0.0)],
            demand_points: vec![cell(10, 1.0, 5.0), cell(11, 500.0, 7.0)],
            facility_count: 1,
            max_distance: 10.0,
        };
        // The second flag contradicts the geometry; the point must not
        // count toward the objective it cannot be attributed under.
        let covered = vec![true, true];

        let selection = assemble_selection(&problem, &[0], &covered);

        assert_eq!(selection.objective, 5.0);
        let attributed: f64 = selection.coverage.values().sum();
        assert_eq!(attributed, selection.objective);
    }

    #[rstest]
    fn assemble_selection_partitions_covered_weight() {
        let problem = CoverageProblem {
            candidates: vec![cell(1, 0.0, 0.0), cell(2, 100.0, 0.0)],
            demand_points: vec![
                cell(10, 1.0, 5.0),
                cell(11, 99.0, 7.0),
                cell(12, 50.0, 3.0),
            ],
            facility_count: 2,
            max_distance: 10.0,
        };
        let covered = vec![true, true, false];

        let selection = assemble_selection(&problem, &[0, 1], &covered);

        assert_eq!(selection.selected, vec![1, 2]);
        assert_eq!(selection.coverage.get(&1), Some(&5.0));
        assert_eq!(selection.coverage.get(&2), Some(&7.0));
        assert_eq!(selection.objective, 12.0);
    }
}
