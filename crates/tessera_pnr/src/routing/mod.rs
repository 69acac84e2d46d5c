//! Routing of nets through the device's routing network.
//!
//! [`RoutingStrategy`] is the seam between the rest of the flow and a
//! router. [`PathFinder`] is the negotiated congestion router used by
//! default.

mod congestion;
mod pathfinder;
mod search;

pub use congestion::{CongestionMap, BASE_COST, EXCLUSIVE, UNUSED};
pub use pathfinder::{PathFinder, DEFAULT_MAX_ITERATIONS};

use crate::error::RoutingError;
use crate::net::Net;
use std::collections::{BTreeMap, BTreeSet};
use tessera_arch::{RoutingGraph, RoutingNode};
use tessera_diagnostics::DiagnosticSink;

/// A way of routing a set of nets through a routing graph.
///
/// Implementations must be deterministic: the same graph and nets always
/// give the same result.
pub trait RoutingStrategy {
    /// Routes every net so no resource is used by two nets.
    fn route(
        &self,
        graph: &RoutingGraph,
        nets: &[Net],
        sink: &DiagnosticSink,
    ) -> Result<RouteResult, RoutingError>;
}

/// The resources claimed by each net once routing converges.
#[derive(Debug, Clone)]
pub struct RouteResult {
    /// Every resource of each net, source and sinks included, keyed by source.
    pub routes: BTreeMap<RoutingNode, BTreeSet<RoutingNode>>,
    /// Iterations run, counting the final, uncongested one.
    pub iterations: u32,
    /// Congestion state after the final iteration.
    pub congestion: CongestionMap,
}

impl RouteResult {
    /// Iterations that found congestion and had to rip up.
    pub fn rip_up_iterations(&self) -> u32 {
        self.iterations.saturating_sub(1)
    }

    /// Total resources used across all nets.
    pub fn resource_count(&self) -> usize {
        self.routes.values().map(BTreeSet::len).sum()
    }

    /// Resources of the net driven from `source`.
    pub fn route_of(&self, source: &RoutingNode) -> Option<&BTreeSet<RoutingNode>> {
        self.routes.get(source)
    }
}
