//! PathFinder negotiated congestion routing.
//!
//! Every iteration rips up and re-routes all nets in source order. Resources
//! claimed by earlier nets cost more for later ones, and resources shared
//! in one iteration cost more in all the following ones, until every net
//! finds a path of its own.

use crate::error::RoutingError;
use crate::net::Net;
use crate::routing::congestion::CongestionMap;
use crate::routing::search::shortest_path;
use crate::routing::{RouteResult, RoutingStrategy};
use petgraph::graph::NodeIndex;
use std::collections::{BTreeMap, BTreeSet};
use tessera_arch::{RoutingGraph, RoutingNode};
use tessera_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};

/// Iteration cap used unless configured otherwise.
pub const DEFAULT_MAX_ITERATIONS: u32 = 50;

/// Shared resources named when routing gives up.
const SHARED_LISTED: usize = 4;

/// The negotiated congestion router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathFinder {
    /// Rip-up-and-reroute iterations allowed before giving up.
    pub max_iterations: u32,
}

impl Default for PathFinder {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl PathFinder {
    /// Creates a router with the given iteration cap.
    pub fn new(max_iterations: u32) -> Self {
        Self { max_iterations }
    }
}

impl RoutingStrategy for PathFinder {
    fn route(
        &self,
        graph: &RoutingGraph,
        nets: &[Net],
        sink: &DiagnosticSink,
    ) -> Result<RouteResult, RoutingError> {
        let mut ordered: Vec<&Net> = nets.iter().collect();
        ordered.sort_by_key(|net| net.source);
        let terminals = ordered
            .iter()
            .map(|net| resolve(graph, net))
            .collect::<Result<Vec<_>, _>>()?;

        let mut congestion = CongestionMap::new(graph.node_count());
        let mut congested = 0;
        let mut last_overused: Vec<RoutingNode> = Vec::new();

        for iteration in 1..=self.max_iterations {
            congestion.reset_present();
            let mut trees = Vec::with_capacity(ordered.len());

            for (net, (source, sinks)) in ordered.iter().zip(&terminals) {
                let tree = route_net(graph, &congestion, net, *source, sinks)?;
                for &node in &tree {
                    congestion.occupy(node);
                }
                trees.push(tree);
            }

            congestion.update_history();
            congested = congestion.overused_count();
            last_overused = congestion
                .overused()
                .take(SHARED_LISTED)
                .map(|n| graph.node(n))
                .collect();
            if congested == 0 {
                let routes = ordered
                    .iter()
                    .zip(&terminals)
                    .zip(trees)
                    .map(|((net, (_, sinks)), tree)| {
                        let nodes: BTreeSet<RoutingNode> = tree
                            .iter()
                            .chain(sinks)
                            .map(|&n| graph.node(n))
                            .collect();
                        (net.source, nodes)
                    })
                    .collect::<BTreeMap<_, _>>();
                return Ok(RouteResult {
                    routes,
                    iterations: iteration,
                    congestion,
                });
            }

            sink.emit(Diagnostic::note(
                DiagnosticCode::new(Category::Routing, 1),
                format!("iteration {iteration}: {congested} resources shared, rerouting"),
            ));
        }

        let mut warning = Diagnostic::warning(
            DiagnosticCode::new(Category::Routing, 2),
            format!(
                "routing did not converge after {} iterations ({} overused resources)",
                self.max_iterations, congested
            ),
        );
        if let Some(first) = last_overused.first() {
            warning = warning
                .with_entity(first.to_string())
                .with_note(format!("still shared: {}", join(&last_overused)));
        }
        sink.emit(warning);
        Err(RoutingError::IterationLimit {
            iterations: self.max_iterations,
            congested,
        })
    }
}

fn join(nodes: &[RoutingNode]) -> String {
    nodes
        .iter()
        .map(RoutingNode::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Looks up a net's source and sinks in the routing graph.
fn resolve(graph: &RoutingGraph, net: &Net) -> Result<(NodeIndex, Vec<NodeIndex>), RoutingError> {
    let index = |node: &RoutingNode| {
        graph
            .node_index(node)
            .ok_or_else(|| RoutingError::MissingResource {
                net: net.name.clone(),
                resource: node.to_string(),
            })
    };
    let source = index(&net.source)?;
    let sinks = net.sinks.iter().map(index).collect::<Result<_, _>>()?;
    Ok((source, sinks))
}

/// Grows one net's tree from its source until it reaches every sink.
///
/// Only the interior of each path joins the tree; sinks are terminals and
/// are added to the net's resources once routing converges.
fn route_net(
    graph: &RoutingGraph,
    congestion: &CongestionMap,
    net: &Net,
    source: NodeIndex,
    sinks: &[NodeIndex],
) -> Result<BTreeSet<NodeIndex>, RoutingError> {
    let mut tree = BTreeSet::from([source]);
    for &target in sinks {
        let path = shortest_path(graph, congestion, &tree, target).ok_or_else(|| {
            RoutingError::Unroutable {
                net: net.name.clone(),
                sink: graph.node(target).to_string(),
            }
        })?;
        let interior = path.len().saturating_sub(1);
        tree.extend(path.into_iter().take(interior));
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::EXCLUSIVE;
    use tessera_arch::{
        CardinalDirection, DeviceTopology, IoBlockCoords, LogicCellCoords, SwitchBlockCoords,
    };

    fn out(x: u32) -> RoutingNode {
        RoutingNode::CellOutput {
            cell: LogicCellCoords::new(x, 0),
        }
    }

    fn inp(x: u32) -> RoutingNode {
        RoutingNode::CellInput {
            cell: LogicCellCoords::new(x, 0),
            port: 0,
        }
    }

    fn wire(x: u32, channel: u8) -> RoutingNode {
        RoutingNode::SwitchOutput {
            block: SwitchBlockCoords::new(x, 0),
            side: CardinalDirection::East,
            channel,
        }
    }

    fn net(name: &str, source: RoutingNode, sinks: &[RoutingNode]) -> Net {
        Net {
            name: name.to_string(),
            source,
            sinks: sinks.iter().copied().collect(),
        }
    }

    #[test]
    fn disjoint_nets_need_no_rip_up() {
        let mut graph = RoutingGraph::new();
        for x in 0..3 {
            graph.add_edge(out(x), wire(x, 0), 1);
            graph.add_edge(wire(x, 0), inp(x), 1);
        }
        let nets: Vec<Net> = (0..3)
            .map(|x| net(&format!("n{x}"), out(x), &[inp(x)]))
            .collect();
        let sink = DiagnosticSink::new();

        let result = PathFinder::default().route(&graph, &nets, &sink).unwrap();
        assert_eq!(result.iterations, 1);
        assert_eq!(result.rip_up_iterations(), 0);
        for x in 0..3 {
            assert_eq!(
                result.routes[&out(x)],
                BTreeSet::from([out(x), wire(x, 0), inp(x)])
            );
        }
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn contended_resource_forces_rip_up() {
        // net 1 can take the shared wire or a slightly longer private one;
        // net 2 has only the shared wire
        let mut graph = RoutingGraph::new();
        let shared = wire(0, 0);
        let private = wire(0, 1);
        graph.add_edge(out(0), shared, 1);
        graph.add_edge(shared, inp(0), 1);
        graph.add_edge(out(0), private, 2);
        graph.add_edge(private, inp(0), 1);
        graph.add_edge(out(1), shared, 1);
        graph.add_edge(shared, inp(1), 1);
        let nets = vec![
            net("n1", out(0), &[inp(0)]),
            net("n2", out(1), &[inp(1)]),
        ];
        let sink = DiagnosticSink::new();

        let result = PathFinder::default().route(&graph, &nets, &sink).unwrap();
        assert_eq!(result.iterations, 2);
        assert!(result.rip_up_iterations() >= 1);
        assert_eq!(
            result.routes[&out(0)],
            BTreeSet::from([out(0), private, inp(0)])
        );
        assert_eq!(
            result.routes[&out(1)],
            BTreeSet::from([out(1), shared, inp(1)])
        );

        let shared_index = graph.node_index(&shared).unwrap();
        assert!(result.congestion.history(shared_index) > 0);
        for node in graph.graph().node_indices() {
            assert!(result.congestion.present(node) <= 2);
        }
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn single_channel_fabric_negotiates_the_shared_wire() {
        // on a 1x1 device with one channel, W0 -> E0 and N0 -> N1 both want
        // the wire from sb(0,0) east to sb(1,0); the other way round is the
        // loop through the south row
        let topology = DeviceTopology::with_channels(1, 1, 1).unwrap();
        let graph = topology.build_network();
        let io = |side, index| RoutingNode::IoBlock(IoBlockCoords::new(side, index));
        let nets = vec![
            net(
                "across",
                io(CardinalDirection::West, 0),
                &[io(CardinalDirection::East, 0)],
            ),
            net(
                "along",
                io(CardinalDirection::North, 0),
                &[io(CardinalDirection::North, 1)],
            ),
        ];
        let sink = DiagnosticSink::new();

        let result = PathFinder::default().route(&graph, &nets, &sink).unwrap();
        assert!(result.rip_up_iterations() >= 1);
        assert!(sink
            .diagnostics()
            .iter()
            .any(|d| d.code.to_string() == "R001"));

        let shared_out = wire(0, 0);
        let shared_in = RoutingNode::SwitchInput {
            block: SwitchBlockCoords::new(1, 0),
            side: CardinalDirection::West,
            channel: 0,
        };
        let detour = RoutingNode::SwitchInput {
            block: SwitchBlockCoords::new(0, 1),
            side: CardinalDirection::North,
            channel: 0,
        };
        let owners = |node: &RoutingNode| {
            result
                .routes
                .values()
                .filter(|route| route.contains(node))
                .count()
        };
        assert_eq!(owners(&shared_out), 1);
        assert_eq!(owners(&shared_in), 1);
        assert_eq!(owners(&detour), 1);

        let index = |node: &RoutingNode| graph.node_index(node).unwrap();
        assert!(result.congestion.history(index(&shared_out)) > 0);
        assert!(
            result.congestion.history(index(&shared_out))
                > result.congestion.history(index(&detour))
        );
        for node in graph.graph().node_indices() {
            assert!(result.congestion.present(node) <= EXCLUSIVE);
        }

        let mut sizes: Vec<usize> = result.routes.values().map(BTreeSet::len).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![6, 10]);
    }

    #[test]
    fn rip_up_never_shrinks_a_route() {
        let topology = DeviceTopology::with_channels(1, 1, 1).unwrap();
        let graph = topology.build_network();
        let io = |side, index| RoutingNode::IoBlock(IoBlockCoords::new(side, index));
        let nets = vec![
            net(
                "across",
                io(CardinalDirection::West, 0),
                &[io(CardinalDirection::East, 0)],
            ),
            net(
                "along",
                io(CardinalDirection::North, 0),
                &[io(CardinalDirection::North, 1)],
            ),
        ];
        let router = PathFinder::default();

        let together = router.route(&graph, &nets, &DiagnosticSink::new()).unwrap();
        assert!(together.rip_up_iterations() >= 1);
        for net in &nets {
            // alone, a net takes its shortest route in the first iteration
            let alone = router
                .route(&graph, std::slice::from_ref(net), &DiagnosticSink::new())
                .unwrap();
            assert_eq!(alone.iterations, 1);
            let first = alone.routes[&net.source].len();
            let last = together.routes[&net.source].len();
            assert!(last >= first, "{}: {last} < {first}", net.name);
        }
    }

    #[test]
    fn fanout_shares_its_own_tree() {
        let mut graph = RoutingGraph::new();
        graph.add_edge(out(0), wire(0, 0), 1);
        graph.add_edge(wire(0, 0), inp(1), 1);
        graph.add_edge(wire(0, 0), inp(2), 1);
        let nets = vec![net("n", out(0), &[inp(1), inp(2)])];

        let result = PathFinder::default()
            .route(&graph, &nets, &DiagnosticSink::new())
            .unwrap();
        assert_eq!(result.iterations, 1);
        assert_eq!(result.routes[&out(0)].len(), 4);
    }

    #[test]
    fn unreachable_sink_names_the_net() {
        let mut graph = RoutingGraph::new();
        graph.add_node(out(0));
        graph.add_node(inp(0));
        let nets = vec![net("lonely", out(0), &[inp(0)])];
        let err = PathFinder::default()
            .route(&graph, &nets, &DiagnosticSink::new())
            .unwrap_err();
        assert_eq!(
            err,
            RoutingError::Unroutable {
                net: "lonely".to_string(),
                sink: "lc(0,0).in[0]".to_string(),
            }
        );
    }

    #[test]
    fn missing_terminal_is_reported() {
        let graph = RoutingGraph::new();
        let io = RoutingNode::IoBlock(IoBlockCoords::new(CardinalDirection::South, 7));
        let nets = vec![net("a[0]", io, &[inp(0)])];
        let err = PathFinder::default()
            .route(&graph, &nets, &DiagnosticSink::new())
            .unwrap_err();
        assert!(matches!(err, RoutingError::MissingResource { .. }));
    }

    #[test]
    fn unresolvable_congestion_hits_the_cap() {
        // two nets with one possible path each, through the same wire
        let mut graph = RoutingGraph::new();
        let shared = wire(0, 0);
        graph.add_edge(out(0), shared, 1);
        graph.add_edge(out(1), shared, 1);
        graph.add_edge(shared, inp(0), 1);
        graph.add_edge(shared, inp(1), 1);
        let nets = vec![
            net("n1", out(0), &[inp(0)]),
            net("n2", out(1), &[inp(1)]),
        ];
        let sink = DiagnosticSink::new();

        let err = PathFinder::new(4).route(&graph, &nets, &sink).unwrap_err();
        assert_eq!(
            err,
            RoutingError::IterationLimit {
                iterations: 4,
                congested: 1
            }
        );
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 5);
        let warning = &diagnostics[4];
        assert_eq!(warning.code.to_string(), "R002");
        assert_eq!(warning.entity, Some(shared.to_string()));
        assert_eq!(warning.notes, vec![format!("still shared: {shared}")]);
    }
}
