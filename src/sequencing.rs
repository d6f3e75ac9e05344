//! Visiting order for a single depot-anchored open path.
//!
//! Nearest-neighbor construction from node 0, then first-improvement 2-opt.
//! Both phases are deterministic: ties go to the lowest node index and the
//! 2-opt scan always restarts from the top after an accepted move.

use tracing::debug;

use crate::config::SequencingOptions;
use crate::model::DurationMatrix;

/// Minimum cost drop for a 2-opt move to count as an improvement (seconds).
const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// An ordered open path over matrix nodes, starting at the depot (node 0).
#[derive(Debug, Clone, PartialEq)]
pub struct VisitOrder {
    nodes: Vec<usize>,
    cost: f64,
}

impl VisitOrder {
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Node indices after the depot.
    pub fn stops(&self) -> &[usize] {
        self.nodes.get(1..).unwrap_or(&[])
    }

    /// Matrix cost along the path; `f64::INFINITY` if any leg is unreachable.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn is_reachable(&self) -> bool {
        self.cost.is_finite()
    }
}

/// Outcome of sequencing, with enough detail to trace the improvement phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequenced {
    pub order: VisitOrder,
    pub nearest_neighbor_cost: f64,
    pub rounds: usize,
    pub reversals: usize,
}

/// Order every node of `matrix` starting from node 0.
pub fn sequence(matrix: &DurationMatrix, options: &SequencingOptions) -> Sequenced {
    let mut nodes = nearest_neighbor(matrix);
    let nearest_neighbor_cost = matrix.path_cost(&nodes);
    let (rounds, reversals) = two_opt(matrix, &mut nodes, options.max_rounds);
    let cost = matrix.path_cost(&nodes);

    debug!(
        nodes = nodes.len(),
        nearest_neighbor_cost,
        cost,
        rounds,
        reversals,
        "sequenced visit order"
    );

    Sequenced {
        order: VisitOrder { nodes, cost },
        nearest_neighbor_cost,
        rounds,
        reversals,
    }
}

/// Greedy construction: always move to the cheapest unvisited node.
///
/// Candidates are scanned in index order and only a strictly cheaper one
/// replaces the current pick, so ties and all-unreachable rows resolve to the
/// lowest unvisited index.
pub fn nearest_neighbor(matrix: &DurationMatrix) -> Vec<usize> {
    let n = matrix.len();
    if n == 0 {
        return Vec::new();
    }

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut current = 0;
    visited[0] = true;
    order.push(0);

    while order.len() < n {
        let mut best: Option<(usize, f64)> = None;
        for candidate in 0..n {
            if visited[candidate] {
                continue;
            }
            let cost = matrix.cost(current, candidate);
            match best {
                Some((_, best_cost)) if cost >= best_cost => {}
                _ => best = Some((candidate, cost)),
            }
        }

        // Unvisited nodes remain, so a pick always exists.
        let Some((next, _)) = best else { break };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

/// First-improvement 2-opt over an open path with a fixed first node.
///
/// Scans pairs `1 <= i < k <= len - 1` and reverses `order[i..=k]` as soon as
/// that lowers the path cost, then starts the scan again. Stops after a full
/// scan without improvement or after `max_rounds` scans.
///
/// Returns (rounds scanned, reversals applied).
pub fn two_opt(matrix: &DurationMatrix, order: &mut [usize], max_rounds: usize) -> (usize, usize) {
    let len = order.len();
    if len < 3 {
        return (0, 0);
    }

    let mut current = matrix.path_cost(order);
    let mut rounds = 0;
    let mut reversals = 0;

    while rounds < max_rounds {
        rounds += 1;
        let mut improved = false;

        'scan: for i in 1..len - 1 {
            for k in i + 1..len {
                order[i..=k].reverse();
                let candidate = matrix.path_cost(order);
                if candidate + IMPROVEMENT_EPSILON < current {
                    current = candidate;
                    reversals += 1;
                    improved = true;
                    break 'scan;
                }
                order[i..=k].reverse();
            }
        }

        if !improved {
            break;
        }
    }

    (rounds, reversals)
}
