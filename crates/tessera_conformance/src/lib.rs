//! Conformance test helpers for the Tessera FPGA flow.
//!
//! Provides shared pipeline functions that take a synthesized netlist
//! through implementation, place-and-route and simulation and return
//! structured results, plus checkers for the properties every routed
//! design must satisfy.

#![warn(missing_docs)]

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use tessera_arch::{DeviceTopology, RoutingGraph, RoutingNode};
use tessera_config::FlowConfig;
use tessera_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use tessera_impl::Implementation;
use tessera_netlist::Design;
use tessera_pnr::{place_and_route, AnnealSchedule, PathFinder, PnrOptions, PnrOutcome};
use tessera_sim::Simulator;

/// Result of running the implement → place → route pipeline.
pub struct PipelineResult {
    /// The packed design.
    pub implementation: Implementation,
    /// The device it was placed on.
    pub topology: DeviceTopology,
    /// Placement, nets, routes and record.
    pub outcome: PnrOutcome,
    /// All diagnostics emitted during the pipeline.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

/// Path of a sample netlist under `tests/designs`.
pub fn design_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("designs")
        .join(format!("{name}.json"))
}

/// Loads and packs a sample netlist from `tests/designs`.
pub fn implement_sample(name: &str) -> Implementation {
    let design = Design::load(&design_path(name)).unwrap();
    Implementation::build(&design).unwrap()
}

/// Packs netlist JSON text.
pub fn implement_str(json: &str) -> Implementation {
    Implementation::build(&Design::from_json(json).unwrap()).unwrap()
}

/// Turns a flow configuration into place-and-route options.
pub fn options_from_config(config: &FlowConfig) -> PnrOptions {
    let placement = &config.placement;
    PnrOptions {
        topology: DeviceTopology::with_channels(
            config.device.width,
            config.device.height,
            config.device.channels,
        )
        .unwrap(),
        router: PathFinder::new(config.router.max_iterations),
        schedule: placement.enabled.then(|| AnnealSchedule {
            initial_temperature: placement.initial_temperature,
            cooling_rate: placement.cooling_rate,
            min_temperature: placement.min_temperature,
            moves_per_temperature: placement.moves_per_temperature,
        }),
        seed: placement.seed,
    }
}

/// A short annealing schedule that keeps tests fast.
pub fn quick_schedule() -> AnnealSchedule {
    AnnealSchedule {
        initial_temperature: 2.0,
        cooling_rate: 0.5,
        min_temperature: 0.1,
        moves_per_temperature: 6,
    }
}

/// Runs the full pipeline on `implementation` with the given options.
///
/// Panics if placement or routing fails; use
/// [`place_and_route`] directly to test failures.
pub fn full_pipeline(implementation: Implementation, options: &PnrOptions) -> PipelineResult {
    let sink = DiagnosticSink::new();
    let outcome = place_and_route(&implementation, options, &AtomicBool::new(false), &sink)
        .unwrap_or_else(|e| panic!("place and route failed: {e}"));
    let diagnostics = sink.take_all();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    PipelineResult {
        implementation,
        topology: options.topology,
        outcome,
        diagnostics,
        warning_count,
    }
}

/// Runs the full pipeline on a sample netlist on a `width` x `height` device.
pub fn full_pipeline_sample(name: &str, width: u32, height: u32) -> PipelineResult {
    let options = PnrOptions {
        schedule: Some(quick_schedule()),
        ..PnrOptions::new(DeviceTopology::new(width, height).unwrap())
    };
    full_pipeline(implement_sample(name), &options)
}

/// Creates a simulator for a sample netlist.
pub fn simulate_sample(name: &str) -> Simulator {
    Simulator::new(&implement_sample(name)).unwrap()
}

/// Checks that no device resource is used by two nets.
pub fn check_exclusive(outcome: &PnrOutcome) -> Result<(), String> {
    let mut owner: HashMap<RoutingNode, &str> = HashMap::new();
    for net in &outcome.nets {
        let resources = outcome
            .routes
            .route_of(&net.source)
            .ok_or_else(|| format!("net {} has no route", net.name))?;
        for node in resources {
            if let Some(other) = owner.insert(*node, &net.name) {
                return Err(format!("{node} used by {other} and {}", net.name));
            }
        }
    }
    Ok(())
}

/// Checks that every sink of every net is reachable from its source
/// through the net's own resources.
pub fn check_connected(outcome: &PnrOutcome, graph: &RoutingGraph) -> Result<(), String> {
    for net in &outcome.nets {
        let resources = outcome
            .routes
            .route_of(&net.source)
            .ok_or_else(|| format!("net {} has no route", net.name))?;
        let reached = reachable_within(graph, net.source, resources);
        for sink in &net.sinks {
            if !reached.contains(sink) {
                return Err(format!("net {} does not reach {sink}", net.name));
            }
        }
    }
    Ok(())
}

fn reachable_within(
    graph: &RoutingGraph,
    source: RoutingNode,
    resources: &BTreeSet<RoutingNode>,
) -> BTreeSet<RoutingNode> {
    let mut reached = BTreeSet::from([source]);
    let mut queue = VecDeque::from([source]);
    while let Some(node) = queue.pop_front() {
        let Some(index) = graph.node_index(&node) else {
            continue;
        };
        for (next, _) in graph.successors(index) {
            let next = graph.node(next);
            if resources.contains(&next) && reached.insert(next) {
                queue.push_back(next);
            }
        }
    }
    reached
}
