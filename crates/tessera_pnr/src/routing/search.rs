//! Multi-source best-first search from a net's routing tree to one sink.

use crate::routing::congestion::CongestionMap;
use petgraph::graph::NodeIndex;
use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap, HashMap};
use tessera_arch::RoutingGraph;

/// A frontier entry. Ties on cost are broken by insertion order so the
/// search is reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct State {
    cost: u64,
    seq: u64,
    node: NodeIndex,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for a min-heap
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds the cheapest path from any node of `tree` to `target`.
///
/// Every tree node starts at cost 0. Entering a node costs its congestion
/// price plus the edge weight. I/O blocks outside the tree are never
/// entered unless they are the target.
///
/// Returns the path from the tree node it starts at to `target`, both
/// included, or `None` if `target` is unreachable.
pub(crate) fn shortest_path(
    graph: &RoutingGraph,
    congestion: &CongestionMap,
    tree: &BTreeSet<NodeIndex>,
    target: NodeIndex,
) -> Option<Vec<NodeIndex>> {
    let mut open = BinaryHeap::new();
    let mut best: HashMap<NodeIndex, u64> = HashMap::new();
    let mut came_from: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut seq = 0u64;

    for &node in tree {
        best.insert(node, 0);
        open.push(State { cost: 0, seq, node });
        seq += 1;
    }

    while let Some(State { cost, node, .. }) = open.pop() {
        if node == target {
            return Some(reconstruct_path(&came_from, target));
        }
        if cost > best.get(&node).copied().unwrap_or(u64::MAX) {
            continue; // stale
        }

        for (next, weight) in graph.successors(node) {
            if next != target && !tree.contains(&next) && graph.node(next).is_io_block() {
                continue;
            }
            let tentative = cost + congestion.cost(next) + u64::from(weight);
            if tentative < best.get(&next).copied().unwrap_or(u64::MAX) {
                best.insert(next, tentative);
                came_from.insert(next, node);
                open.push(State {
                    cost: tentative,
                    seq,
                    node: next,
                });
                seq += 1;
            }
        }
    }

    None
}

fn reconstruct_path(came_from: &HashMap<NodeIndex, NodeIndex>, target: NodeIndex) -> Vec<NodeIndex> {
    let mut path = vec![target];
    let mut current = target;
    while let Some(&previous) = came_from.get(&current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}
