//! Weighted connectivity graph of routing resources.

use crate::node::RoutingNode;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Directed graph of routing resources, with a lookup from resource to index.
///
/// Edge weights are the cost of driving the target from the source; lower
/// channels are cheaper so the router prefers them when it has the choice.
#[derive(Debug, Clone, Default)]
pub struct RoutingGraph {
    graph: DiGraph<RoutingNode, u32>,
    index: HashMap<RoutingNode, NodeIndex>,
}

impl RoutingGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource, returning the existing index if it is already present.
    pub fn add_node(&mut self, node: RoutingNode) -> NodeIndex {
        if let Some(&index) = self.index.get(&node) {
            return index;
        }
        let index = self.graph.add_node(node);
        self.index.insert(node, index);
        index
    }

    /// Connects two resources, adding them as needed.
    ///
    /// Connecting the same pair twice keeps one edge with the newer weight.
    pub fn add_edge(&mut self, from: RoutingNode, to: RoutingNode, weight: u32) -> EdgeIndex {
        let from = self.add_node(from);
        let to = self.add_node(to);
        self.graph.update_edge(from, to, weight)
    }

    /// Looks up a resource's index.
    pub fn node_index(&self, node: &RoutingNode) -> Option<NodeIndex> {
        self.index.get(node).copied()
    }

    /// The resource at `index`.
    pub fn node(&self, index: NodeIndex) -> RoutingNode {
        self.graph[index]
    }

    /// Resources reachable in one step from `index`, with edge weights.
    pub fn successors(&self, index: NodeIndex) -> impl Iterator<Item = (NodeIndex, u32)> + '_ {
        self.graph
            .edges(index)
            .map(|edge| (edge.target(), *edge.weight()))
    }

    /// Weight of the edge between two resources, if connected.
    pub fn edge_weight(&self, from: &RoutingNode, to: &RoutingNode) -> Option<u32> {
        let from = self.node_index(from)?;
        let to = self.node_index(to)?;
        self.graph
            .find_edge(from, to)
            .map(|edge| self.graph[edge])
    }

    /// The underlying petgraph graph.
    pub fn graph(&self) -> &DiGraph<RoutingNode, u32> {
        &self.graph
    }

    /// Number of resources.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of connections.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{IoBlockCoords, LogicCellCoords};
    use crate::direction::CardinalDirection;

    fn output(x: u32) -> RoutingNode {
        RoutingNode::CellOutput {
            cell: LogicCellCoords::new(x, 0),
        }
    }

    #[test]
    fn nodes_are_deduplicated() {
        let mut graph = RoutingGraph::new();
        let a = graph.add_node(output(0));
        let b = graph.add_node(output(0));
        assert_eq!(a, b);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn repeated_edge_keeps_latest_weight() {
        let mut graph = RoutingGraph::new();
        let io = RoutingNode::IoBlock(IoBlockCoords::new(CardinalDirection::North, 0));
        graph.add_edge(output(0), io, 5);
        graph.add_edge(output(0), io, 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_weight(&output(0), &io), Some(2));
        assert_eq!(graph.edge_weight(&io, &output(0)), None);
    }

    #[test]
    fn successors_list_targets() {
        let mut graph = RoutingGraph::new();
        graph.add_edge(output(0), output(1), 1);
        graph.add_edge(output(0), output(2), 3);
        let source = graph.node_index(&output(0)).unwrap();
        let mut next: Vec<(RoutingNode, u32)> = graph
            .successors(source)
            .map(|(n, w)| (graph.node(n), w))
            .collect();
        next.sort();
        assert_eq!(next, vec![(output(1), 1), (output(2), 3)]);
    }
}
