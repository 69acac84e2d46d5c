//! Place and route for the Tessera programmable device.
//!
//! Takes an [`Implementation`] and assigns each logic cell and port bit to a
//! device site (placement), then connects every net through the switch
//! blocks (routing). The result is summarized as a [`RoutingRecord`] for
//! bitstream generation.
//!
//! # Pipeline
//!
//! 1. **Place**: random initial placement, optionally refined by simulated
//!    annealing scored on the routed result
//! 2. **Derive nets**: one net per driver, clock excluded
//! 3. **Route**: PathFinder negotiated congestion routing
//! 4. **Record**: label every device resource with its net
//!
//! # Usage
//!
//! ```ignore
//! use tessera_pnr::{place_and_route, PnrOptions};
//!
//! let options = PnrOptions::new(DeviceTopology::new(4, 4)?);
//! let outcome = place_and_route(&implementation, &options, &AtomicBool::new(false), &sink)?;
//! println!("{}", outcome.record.to_json()?);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod net;
pub mod placement;
pub mod route_record;
pub mod routing;

pub use error::RoutingError;
pub use net::{derive_nets, Net};
pub use placement::{anneal, AnnealReport, AnnealSchedule, Placement};
pub use route_record::{IoFunction, RoutingRecord};
pub use routing::{CongestionMap, PathFinder, RouteResult, RoutingStrategy};

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::AtomicBool;
use tessera_arch::DeviceTopology;
use tessera_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use tessera_impl::Implementation;

/// Seed of the placement random number generator unless configured otherwise.
pub const DEFAULT_SEED: u64 = 3;

/// Settings of one place-and-route run.
///
/// The router defaults to [`PathFinder`]; [`PnrOptions::with_router`] swaps
/// in any other [`RoutingStrategy`], which then serves both the annealing
/// cost and the final route.
#[derive(Debug, Clone)]
pub struct PnrOptions<R = PathFinder> {
    /// The target device.
    pub topology: DeviceTopology,
    /// The router.
    pub router: R,
    /// Annealing schedule, or `None` to keep the random placement.
    pub schedule: Option<AnnealSchedule>,
    /// Placement seed.
    pub seed: u64,
}

impl PnrOptions {
    /// Default settings for `topology`.
    pub fn new(topology: DeviceTopology) -> Self {
        Self {
            topology,
            router: PathFinder::default(),
            schedule: Some(AnnealSchedule::default()),
            seed: DEFAULT_SEED,
        }
    }
}

impl<R> PnrOptions<R> {
    /// The same settings routed by `router`.
    pub fn with_router<S: RoutingStrategy>(self, router: S) -> PnrOptions<S> {
        PnrOptions {
            topology: self.topology,
            router,
            schedule: self.schedule,
            seed: self.seed,
        }
    }
}

/// A placed and routed design.
#[derive(Debug, Clone)]
pub struct PnrOutcome {
    /// Where everything went.
    pub placement: Placement,
    /// The routed nets.
    pub nets: Vec<Net>,
    /// Resources of each net.
    pub routes: RouteResult,
    /// The hand-off record.
    pub record: RoutingRecord,
    /// Annealing statistics, if annealing ran.
    pub anneal: Option<AnnealReport>,
}

/// Places and routes `implementation` on `options.topology`.
///
/// The same options always give the same result. Setting `abort` stops
/// annealing early; the best placement found so far is still routed.
pub fn place_and_route<R: RoutingStrategy>(
    implementation: &Implementation,
    options: &PnrOptions<R>,
    abort: &AtomicBool,
    sink: &DiagnosticSink,
) -> Result<PnrOutcome, RoutingError> {
    let topology = &options.topology;
    let graph = topology.build_network();
    let mut rng = StdRng::seed_from_u64(options.seed);

    let initial = Placement::random(implementation, topology, &mut rng)?;
    let (placement, report) = match &options.schedule {
        Some(schedule) => {
            let report = anneal(
                implementation,
                topology,
                &graph,
                &options.router,
                initial,
                schedule,
                &mut rng,
                abort,
                sink,
            )?;
            sink.emit(Diagnostic::note(
                DiagnosticCode::new(Category::Placement, 3),
                format!(
                    "annealing accepted {} of {} moves, median route size {} -> {}",
                    report.accepted, report.moves, report.initial_cost, report.cost
                ),
            ));
            (report.placement.clone(), Some(report))
        }
        None => (initial, None),
    };

    let nets = derive_nets(implementation, &placement)?;
    let routes = options.router.route(&graph, &nets, sink)?;
    sink.emit(Diagnostic::note(
        DiagnosticCode::new(Category::Routing, 3),
        format!(
            "routed {} nets over {} resources in {} iterations",
            nets.len(),
            routes.resource_count(),
            routes.iterations
        ),
    ));

    let record = RoutingRecord::new(topology, implementation, &placement, &nets, &routes);
    Ok(PnrOutcome {
        placement,
        nets,
        routes,
        record,
        anneal: report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashSet;
    use tessera_arch::RoutingNode;
    use tessera_netlist::Design;

    const AND_FF: &str = r#"{ "modules": { "and_ff": {
        "attributes": { "top": 1 },
        "ports": {
            "A": { "direction": "input", "bits": [2] },
            "B": { "direction": "input", "bits": [3] },
            "clock": { "direction": "input", "bits": [4] },
            "Q": { "direction": "output", "bits": [5] }
        },
        "cells": {
            "$abc$1$lut$7": { "type": "$lut", "parameters": { "LUT": "1000" },
                "connections": { "A": [2, 3], "Y": [6] } },
            "$auto$dff$8": { "type": "$_DFF_P_",
                "connections": { "C": [4], "D": [6], "Q": [5] } }
        }
    } } }"#;

    fn implementation() -> Implementation {
        Implementation::build(&Design::from_json(AND_FF).unwrap()).unwrap()
    }

    fn options(schedule: Option<AnnealSchedule>) -> PnrOptions {
        PnrOptions {
            schedule,
            ..PnrOptions::new(DeviceTopology::new(2, 2).unwrap())
        }
    }

    #[test]
    fn routes_without_annealing() {
        let sink = DiagnosticSink::new();
        let outcome =
            place_and_route(&implementation(), &options(None), &AtomicBool::new(false), &sink)
                .unwrap();
        assert_eq!(outcome.nets.len(), 3);
        assert_eq!(outcome.routes.routes.len(), 3);
        assert!(outcome.anneal.is_none());
        assert!(!sink.has_errors());
    }

    #[test]
    fn nets_never_share_resources() {
        let schedule = AnnealSchedule {
            initial_temperature: 1.0,
            cooling_rate: 0.5,
            min_temperature: 0.1,
            moves_per_temperature: 4,
        };
        let outcome = place_and_route(
            &implementation(),
            &options(Some(schedule)),
            &AtomicBool::new(false),
            &DiagnosticSink::new(),
        )
        .unwrap();
        let mut seen: HashSet<RoutingNode> = HashSet::new();
        for resources in outcome.routes.routes.values() {
            for node in resources {
                assert!(seen.insert(*node), "{node} used by two nets");
            }
        }
        assert!(outcome.anneal.is_some());
    }

    /// Delegates to PathFinder and counts the calls.
    struct CountingRouter {
        calls: Cell<usize>,
    }

    impl RoutingStrategy for CountingRouter {
        fn route(
            &self,
            graph: &tessera_arch::RoutingGraph,
            nets: &[Net],
            sink: &DiagnosticSink,
        ) -> Result<RouteResult, RoutingError> {
            self.calls.set(self.calls.get() + 1);
            PathFinder::default().route(graph, nets, sink)
        }
    }

    #[test]
    fn custom_router_routes_the_design() {
        let options = options(None).with_router(CountingRouter {
            calls: Cell::new(0),
        });
        let outcome = place_and_route(
            &implementation(),
            &options,
            &AtomicBool::new(false),
            &DiagnosticSink::new(),
        )
        .unwrap();
        assert_eq!(outcome.nets.len(), 3);
        assert_eq!(options.router.calls.get(), 1);
        assert_eq!(options.seed, DEFAULT_SEED);
    }

    #[test]
    fn same_seed_same_record() {
        let run = || {
            place_and_route(
                &implementation(),
                &options(None),
                &AtomicBool::new(false),
                &DiagnosticSink::new(),
            )
            .unwrap()
            .record
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn device_too_small() {
        let options = PnrOptions {
            schedule: None,
            ..PnrOptions::new(DeviceTopology::new(1, 1).unwrap())
        };
        let design = AND_FF.replace(
            r#""Q": { "direction": "output", "bits": [5] }"#,
            r#""Q": { "direction": "output", "bits": [5] }, "N": { "direction": "output", "bits": [6] }"#,
        );
        // the LUT output now also drives N, so the pair no longer merges
        let implementation = Implementation::build(&Design::from_json(&design).unwrap()).unwrap();
        let err = place_and_route(
            &implementation,
            &options,
            &AtomicBool::new(false),
            &DiagnosticSink::new(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            RoutingError::NotEnoughLogicCells {
                required: 2,
                available: 1
            }
        );
    }
}
