//! Unit coverage for scoring and candidate selection.
#![forbid(unsafe_code)]

use geo::Coord;
use proptest::prelude::*;
use rstest::rstest;
use sitecover_core::{CellScores, DistanceTable, GridCell, ScoredCell, ScoredGrid};

use crate::{SelectError, score_cell, score_grid, select_candidates, shannon_diversity};

#[expect(clippy::cast_precision_loss, reason = "test ids are tiny")]
fn cell(id: u64, demand: f64) -> GridCell {
    GridCell::new(
        id,
        Coord {
            x: id as f64,
            y: 0.0,
        },
        demand,
    )
    .expect("valid cell")
}

fn types(names: &[&str]) -> Vec<String> {
    names.iter().map(|&name| name.to_owned()).collect()
}

fn scored(entries: &[(u64, u32, f64)]) -> ScoredGrid {
    ScoredGrid::new(
        entries
            .iter()
            .map(|&(id, accessibility, diversity)| ScoredCell {
                cell: cell(id, 1.0),
                scores: CellScores {
                    accessibility,
                    diversity,
                },
            })
            .collect(),
    )
}

#[rstest]
fn diversity_is_zero_without_accessible_facilities() {
    assert_eq!(shannon_diversity(&[]), 0.0);
    assert_eq!(shannon_diversity(&[0, 0, 0]), 0.0);
}

#[rstest]
fn diversity_is_zero_for_a_single_type() {
    assert_eq!(shannon_diversity(&[5]), 0.0);
    assert_eq!(shannon_diversity(&[5, 0]), 0.0);
}

#[rstest]
fn diversity_is_positive_with_two_contributing_types() {
    assert!(shannon_diversity(&[3, 1]) > 0.0);
}

#[rstest]
fn diversity_peaks_when_counts_are_balanced() {
    // Same total split across three types: the even split dominates.
    let balanced = shannon_diversity(&[4, 4, 4]);
    assert!(balanced > shannon_diversity(&[10, 1, 1]));
    assert!(balanced > shannon_diversity(&[6, 4, 2]));
    let expected = (3.0_f64).ln();
    assert!((balanced - expected).abs() < 1e-12);
}

#[rstest]
fn counts_are_boundary_inclusive() {
    let mut table = DistanceTable::new();
    table.insert("park", 1, vec![Some(1200.0), Some(1200.1)]);
    let scores = score_cell(1, &types(&["park"]), &table, 1200.0);
    assert_eq!(scores.accessibility, 1);
}

#[rstest]
fn missing_type_and_cell_entries_count_zero() {
    let mut table = DistanceTable::new();
    table.insert("park", 2, vec![Some(100.0)]);
    let scores = score_cell(1, &types(&["park", "cafe"]), &table, 1200.0);
    assert_eq!(scores.accessibility, 0);
    assert_eq!(scores.diversity, 0.0);
}

#[rstest]
fn null_and_non_finite_observations_are_skipped() {
    let mut table = DistanceTable::new();
    table.insert(
        "bus",
        1,
        vec![None, Some(f64::NAN), Some(f64::INFINITY), Some(400.0)],
    );
    let scores = score_cell(1, &types(&["bus"]), &table, 1200.0);
    assert_eq!(scores.accessibility, 1);
}

#[rstest]
fn scoring_sums_across_types_and_measures_diversity() {
    let mut table = DistanceTable::new();
    table.insert("park", 1, vec![Some(100.0), Some(500.0)]);
    table.insert("cafe", 1, vec![Some(900.0), Some(1100.0)]);
    let scores = score_cell(1, &types(&["park", "cafe"]), &table, 1200.0);
    assert_eq!(scores.accessibility, 4);
    // Even two-way split: ln(2).
    assert!((scores.diversity - (2.0_f64).ln()).abs() < 1e-12);
}

#[rstest]
fn score_grid_preserves_order_and_input() {
    let grid = vec![cell(1, 10.0), cell(2, 5.0)];
    let mut table = DistanceTable::new();
    table.insert("park", 2, vec![Some(50.0)]);

    let scored_grid = score_grid(&grid, &types(&["park"]), &table, 1200.0);

    let ids: Vec<u64> = scored_grid.iter().map(|entry| entry.cell.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(scored_grid.cells()[0].scores.accessibility, 0);
    assert_eq!(scored_grid.cells()[1].scores.accessibility, 1);
    // Demand weights ride along untouched.
    assert_eq!(scored_grid.cells()[0].cell.demand, 10.0);
}

#[rstest]
fn selection_requires_strength_on_both_axes() {
    // Cell 1 leads on accessibility, cell 2 on diversity; only cell 3
    // clears the 0.5 quantile on both.
    let grid = scored(&[(1, 100, 0.1), (2, 1, 2.0), (3, 60, 1.5), (4, 2, 0.2)]);
    let selection = select_candidates(&grid, 0.5).expect("selection succeeds");
    assert_eq!(selection.candidates, vec![3]);
    assert_eq!(selection.demand_points, vec![1, 2, 3, 4]);
}

#[rstest]
fn candidates_are_a_subset_of_demand_points() {
    let grid = scored(&[(1, 3, 0.3), (2, 9, 0.9), (3, 6, 0.6)]);
    let selection = select_candidates(&grid, 0.85).expect("selection succeeds");
    for id in &selection.candidates {
        assert!(selection.demand_points.contains(id));
    }
}

#[rstest]
fn threshold_ties_are_included() {
    // All cells identical: every cell meets the quantile exactly.
    let grid = scored(&[(1, 5, 0.5), (2, 5, 0.5), (3, 5, 0.5)]);
    let selection = select_candidates(&grid, 1.0).expect("selection succeeds");
    assert_eq!(selection.candidates, vec![1, 2, 3]);
}

#[rstest]
fn uncorrelated_axes_can_yield_an_empty_candidate_set() {
    let grid = scored(&[(1, 100, 0.0), (2, 0, 2.0)]);
    let selection = select_candidates(&grid, 1.0).expect("selection succeeds");
    assert!(selection.candidates.is_empty());
    assert_eq!(selection.demand_points.len(), 2);
}

#[rstest]
#[case(-0.1)]
#[case(1.1)]
#[case(f64::NAN)]
fn out_of_range_quantile_is_rejected(#[case] quantile: f64) {
    let grid = scored(&[(1, 1, 0.1)]);
    let err = select_candidates(&grid, quantile).expect_err("invalid quantile");
    assert!(matches!(err, SelectError::QuantileOutOfRange { .. }));
}

#[rstest]
fn empty_grid_is_rejected() {
    let err = select_candidates(&ScoredGrid::default(), 0.85).expect_err("empty grid");
    assert_eq!(err, SelectError::EmptyGrid);
}

proptest! {
    #[test]
    fn raising_the_quantile_never_grows_the_candidate_set(
        scores in prop::collection::vec((0_u32..50, 0.0_f64..3.0), 1..40),
        low in 0.0_f64..=1.0,
        high in 0.0_f64..=1.0,
    ) {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let entries: Vec<(u64, u32, f64)> = scores
            .iter()
            .enumerate()
            .map(|(index, &(accessibility, diversity))| (index as u64, accessibility, diversity))
            .collect();
        let grid = scored(&entries);

        let at_low = select_candidates(&grid, low).expect("valid quantile");
        let at_high = select_candidates(&grid, high).expect("valid quantile");

        prop_assert!(at_high.candidates.len() <= at_low.candidates.len());
        for id in &at_high.candidates {
            prop_assert!(at_low.candidates.contains(id));
        }
    }
}
