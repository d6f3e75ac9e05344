//! Property-based tests for stop sequencing.
//!
//! # Invariants tested
//!
//! - **Permutation:** the order visits every node exactly once, depot first.
//! - **Determinism:** the same matrix always yields the same order.
//! - **Never worse:** 2-opt never raises the nearest-neighbor cost.

use std::collections::HashSet;

use proptest::prelude::*;
use route_planner::config::SequencingOptions;
use route_planner::model::DurationMatrix;
use route_planner::sequencing::{nearest_neighbor, sequence};

/// Square matrices of whole-second durations with 1 to 8 nodes.
fn finite_matrix() -> impl Strategy<Value = DurationMatrix> {
    (1_usize..=8).prop_flat_map(|n| {
        prop::collection::vec(prop::collection::vec(0_u32..600, n), n).prop_map(|rows| {
            let rows = rows
                .into_iter()
                .enumerate()
                .map(|(from, row)| {
                    row.into_iter()
                        .enumerate()
                        .map(|(to, secs)| if from == to { 0.0 } else { f64::from(secs) })
                        .collect()
                })
                .collect();
            DurationMatrix::from_seconds(rows).expect("square")
        })
    })
}

/// Like [`finite_matrix`] but roughly one entry in five is unreachable.
fn sparse_matrix() -> impl Strategy<Value = DurationMatrix> {
    (1_usize..=8).prop_flat_map(|n| {
        prop::collection::vec(
            prop::collection::vec(prop::option::weighted(0.8, 0_u32..600), n),
            n,
        )
        .prop_map(|rows| {
            let rows = rows
                .into_iter()
                .map(|row| row.into_iter().map(|cell| cell.map(f64::from)).collect())
                .collect();
            DurationMatrix::from_rows(rows).expect("square")
        })
    })
}

fn assert_permutation(nodes: &[usize], n: usize) -> Result<(), TestCaseError> {
    prop_assert_eq!(nodes.len(), n);
    prop_assert_eq!(nodes.first().copied(), Some(0));
    let unique: HashSet<usize> = nodes.iter().copied().collect();
    prop_assert_eq!(unique.len(), n);
    prop_assert!(nodes.iter().all(|&node| node < n));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn order_is_a_permutation_starting_at_the_depot(matrix in finite_matrix()) {
        let sequenced = sequence(&matrix, &SequencingOptions::default());
        assert_permutation(sequenced.order.nodes(), matrix.len())?;
    }

    #[test]
    fn unreachable_entries_still_yield_a_permutation(matrix in sparse_matrix()) {
        let sequenced = sequence(&matrix, &SequencingOptions::default());
        assert_permutation(sequenced.order.nodes(), matrix.len())?;
        prop_assert_eq!(
            sequenced.order.is_reachable(),
            matrix.path_cost(sequenced.order.nodes()).is_finite()
        );
    }

    #[test]
    fn sequencing_is_deterministic(matrix in sparse_matrix()) {
        let options = SequencingOptions::default();
        let first = sequence(&matrix, &options);
        let second = sequence(&matrix, &options);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn improvement_never_raises_cost(matrix in finite_matrix()) {
        let nn_cost = matrix.path_cost(&nearest_neighbor(&matrix));
        let sequenced = sequence(&matrix, &SequencingOptions::default());

        prop_assert_eq!(sequenced.nearest_neighbor_cost, nn_cost);
        prop_assert!(sequenced.order.cost() <= nn_cost);
        prop_assert_eq!(sequenced.order.cost(), matrix.path_cost(sequenced.order.nodes()));
    }

    #[test]
    fn round_limit_is_respected(matrix in finite_matrix(), max_rounds in 0_usize..4) {
        let sequenced = sequence(&matrix, &SequencingOptions { max_rounds });
        prop_assert!(sequenced.rounds <= max_rounds);
        prop_assert!(sequenced.reversals <= sequenced.rounds);
        assert_permutation(sequenced.order.nodes(), matrix.len())?;
    }
}
