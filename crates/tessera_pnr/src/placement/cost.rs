//! Placement cost, measured on the routed result rather than estimated.

use crate::error::RoutingError;
use crate::net::derive_nets;
use crate::placement::Placement;
use crate::routing::{RouteResult, RoutingStrategy};
use tessera_arch::RoutingGraph;
use tessera_diagnostics::DiagnosticSink;
use tessera_impl::Implementation;

/// Median number of resources per routed net, or 0 with no nets.
///
/// With an even number of nets this is the mean of the two middle sizes.
pub fn median_tree_size(result: &RouteResult) -> f64 {
    let mut sizes: Vec<usize> = result.routes.values().map(|r| r.len()).collect();
    if sizes.is_empty() {
        return 0.0;
    }
    sizes.sort_unstable();
    let mid = sizes.len() / 2;
    if sizes.len() % 2 == 0 {
        (sizes[mid - 1] + sizes[mid]) as f64 / 2.0
    } else {
        sizes[mid] as f64
    }
}

/// Routes `placement` and scores it by [`median_tree_size`]; lower is better.
///
/// Routing notes go to a scratch sink; only the outcome matters here.
pub fn placement_cost(
    implementation: &Implementation,
    placement: &Placement,
    graph: &RoutingGraph,
    router: &dyn RoutingStrategy,
) -> Result<f64, RoutingError> {
    let nets = derive_nets(implementation, placement)?;
    let result = router.route(graph, &nets, &DiagnosticSink::new())?;
    Ok(median_tree_size(&result))
}
