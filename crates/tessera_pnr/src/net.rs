//! Nets derived from the implementation graph under a placement.

use crate::error::RoutingError;
use crate::placement::Placement;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tessera_arch::{IoBlockCoords, LogicCellCoords, RoutingNode};
use tessera_impl::{ImplEdge, ImplNode, Implementation};

/// One signal to route: a source resource and every resource it must reach.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    /// Name of the driving cell or port bit.
    pub name: String,
    /// Where the signal enters the fabric.
    pub source: RoutingNode,
    /// Where the signal must arrive.
    pub sinks: BTreeSet<RoutingNode>,
}

/// Derives the nets of `implementation` under `placement`, sorted by source.
///
/// Clock edges are skipped: the clock reaches flip-flops on a dedicated
/// network, not through the switch blocks. Drivers without readers produce
/// no net.
pub fn derive_nets(
    implementation: &Implementation,
    placement: &Placement,
) -> Result<Vec<Net>, RoutingError> {
    let graph = &implementation.graph;
    let mut nets: BTreeMap<RoutingNode, Net> = BTreeMap::new();

    for edge in graph.edge_references() {
        let sink = match *edge.weight() {
            ImplEdge::Clock => continue,
            ImplEdge::LutInput(port) => RoutingNode::CellInput {
                cell: cell_site(implementation, placement, edge.target())?,
                port,
            },
            ImplEdge::PortOutput => {
                RoutingNode::IoBlock(port_site(implementation, placement, edge.target())?)
            }
        };
        let source_node = edge.source();
        let source = match &graph[source_node] {
            ImplNode::Cell(_) => RoutingNode::CellOutput {
                cell: cell_site(implementation, placement, source_node)?,
            },
            ImplNode::Port(_) => {
                RoutingNode::IoBlock(port_site(implementation, placement, source_node)?)
            }
        };
        nets.entry(source)
            .or_insert_with(|| Net {
                name: graph[source_node].name(),
                source,
                sinks: BTreeSet::new(),
            })
            .sinks
            .insert(sink);
    }

    Ok(nets.into_values().collect())
}

fn cell_site(
    implementation: &Implementation,
    placement: &Placement,
    node: NodeIndex,
) -> Result<LogicCellCoords, RoutingError> {
    placement
        .cell_site(node)
        .ok_or_else(|| RoutingError::Unplaced {
            node: implementation.graph[node].name(),
        })
}

fn port_site(
    implementation: &Implementation,
    placement: &Placement,
    node: NodeIndex,
) -> Result<IoBlockCoords, RoutingError> {
    placement
        .port_site(node)
        .ok_or_else(|| RoutingError::Unplaced {
            node: implementation.graph[node].name(),
        })
}
