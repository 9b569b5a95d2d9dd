//! The placement loop.
//!
//! One unit at a time, in arrival order: rank the feasible nodes and
//! place on the best. Every placement updates the node before the next
//! unit is considered. Ties between equal scores resolve by node name
//! so identical inputs always produce identical placements.

use std::collections::VecDeque;

use tracing::debug;

use fleet_core::PodUnit;

use crate::cluster::ClusterState;
use crate::scorer::score_node;

/// Attempt to place every queued unit once. Units that fit are removed
/// from the queue; the rest stay pending in order. Returns the number
/// of units placed this pass.
pub fn run_pass(cluster: &mut ClusterState, pending: &mut VecDeque<PodUnit>) -> usize {
    let mut placed = 0;
    let mut still_pending = VecDeque::with_capacity(pending.len());

    while let Some(unit) = pending.pop_front() {
        match select_node(cluster, &unit) {
            Some(index) => {
                let node = &mut cluster.nodes[index];
                node.place(&unit);
                placed += 1;
                debug!(unit = %unit.name, node = %node.name, "placed unit");
            }
            None => still_pending.push_back(unit),
        }
    }

    *pending = still_pending;
    placed
}

/// The index of the best feasible node for a unit, if any.
pub fn select_node(cluster: &ClusterState, unit: &PodUnit) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (index, node) in cluster.nodes.iter().enumerate() {
        let Some(score) = score_node(node, unit) else {
            continue;
        };
        let better = match best {
            None => true,
            Some((best_index, best_score)) => {
                score > best_score
                    || (score == best_score && node.name < cluster.nodes[best_index].name)
            }
        };
        if better {
            best = Some((index, score));
        }
    }

    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::NodeState;
    use fleet_core::{Quantity, Resources};

    fn unit(name: &str, cpu: &str, memory: &str) -> PodUnit {
        PodUnit {
            name: name.to_string(),
            requests: Resources {
                cpu: cpu.parse().unwrap(),
                memory: memory.parse().unwrap(),
                gpu: Quantity::ZERO,
            },
        }
    }

    fn node(name: &str, cpu: &str, memory: &str, max_units: u32) -> NodeState {
        NodeState::new(
            name,
            Resources {
                cpu: cpu.parse().unwrap(),
                memory: memory.parse().unwrap(),
                gpu: Quantity::ZERO,
            },
            max_units,
        )
    }

    #[test]
    fn ties_resolve_by_node_name() {
        let cluster = ClusterState {
            nodes: vec![
                node("node-1", "2", "8Gi", 10),
                node("node-0", "2", "8Gi", 10),
            ],
        };
        // Identical nodes, identical scores: node-0 wins despite sitting
        // at index 1.
        let selected = select_node(&cluster, &unit("a", "1", "1Gi")).unwrap();
        assert_eq!(cluster.nodes[selected].name, "node-0");
    }

    #[test]
    fn prefers_the_higher_scoring_node() {
        let mut busy = node("node-0", "4", "16Gi", 10);
        busy.place(&unit("warm", "2", "8Gi"));
        let cluster = ClusterState {
            nodes: vec![busy, node("node-1", "4", "16Gi", 10)],
        };
        let selected = select_node(&cluster, &unit("a", "1", "4Gi")).unwrap();
        assert_eq!(cluster.nodes[selected].name, "node-1");
    }

    #[test]
    fn run_pass_places_what_fits_and_keeps_the_rest() {
        let mut cluster = ClusterState {
            nodes: vec![node("node-0", "2", "8Gi", 10)],
        };
        let mut pending: VecDeque<_> = vec![
            unit("a", "1", "2Gi"),
            unit("b", "1", "2Gi"),
            unit("c", "1", "2Gi"),
        ]
        .into();

        let placed = run_pass(&mut cluster, &mut pending);
        assert_eq!(placed, 2);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "c");
        assert_eq!(cluster.nodes[0].placed, vec!["a", "b"]);
    }

    #[test]
    fn placements_within_a_pass_see_earlier_placements() {
        // Two nodes, each fits exactly one unit; both units place in a
        // single pass because capacity is consumed as the pass runs.
        let mut cluster = ClusterState {
            nodes: vec![
                node("node-0", "1", "1Gi", 10),
                node("node-1", "1", "1Gi", 10),
            ],
        };
        let mut pending: VecDeque<_> =
            vec![unit("a", "1", "1Gi"), unit("b", "1", "1Gi")].into();

        let placed = run_pass(&mut cluster, &mut pending);
        assert_eq!(placed, 2);
        assert!(pending.is_empty());
        assert_eq!(cluster.nodes[0].placed, vec!["a"]);
        assert_eq!(cluster.nodes[1].placed, vec!["b"]);
    }

    #[test]
    fn no_feasible_node_leaves_the_unit_pending() {
        let mut cluster = ClusterState {
            nodes: vec![node("node-0", "1", "1Gi", 10)],
        };
        let mut pending: VecDeque<_> = vec![unit("a", "2", "1Gi")].into();

        assert_eq!(run_pass(&mut cluster, &mut pending), 0);
        assert_eq!(pending.len(), 1);
    }
}
