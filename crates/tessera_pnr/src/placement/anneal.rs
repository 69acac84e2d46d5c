//! Simulated annealing placement refinement.
//!
//! Starting from an initial placement, repeatedly moves one logic cell or
//! port bit to a random site of its kind and accepts or rejects the move
//! using the Metropolis criterion on the routed cost. The temperature
//! decreases geometrically, so cost-increasing moves become rarer over time.

use crate::error::RoutingError;
use crate::placement::cost::placement_cost;
use crate::placement::Placement;
use crate::routing::RoutingStrategy;
use petgraph::graph::NodeIndex;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use tessera_arch::{DeviceTopology, IoBlockCoords, LogicCellCoords, RoutingGraph};
use tessera_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use tessera_impl::Implementation;

/// Below this acceptance rate at one temperature the search stops early.
const MIN_ACCEPTANCE_RATE: f64 = 0.001;

/// Temperature schedule of the annealing search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealSchedule {
    /// Starting temperature.
    pub initial_temperature: f64,
    /// Factor applied to the temperature after each step, in `(0, 1)`.
    pub cooling_rate: f64,
    /// The search stops once the temperature drops to this.
    pub min_temperature: f64,
    /// Moves tried at each temperature.
    pub moves_per_temperature: u32,
}

impl Default for AnnealSchedule {
    fn default() -> Self {
        Self {
            initial_temperature: 10.0,
            cooling_rate: 0.95,
            min_temperature: 0.01,
            moves_per_temperature: 10,
        }
    }
}

/// Outcome of an annealing run.
#[derive(Debug, Clone)]
pub struct AnnealReport {
    /// The cheapest placement seen.
    pub placement: Placement,
    /// Cost of `placement`.
    pub cost: f64,
    /// Cost of the starting placement.
    pub initial_cost: f64,
    /// Moves tried.
    pub moves: usize,
    /// Moves accepted.
    pub accepted: usize,
    /// Moves rejected because the moved placement could not be routed.
    pub unroutable: usize,
    /// Whether the abort flag stopped the search.
    pub aborted: bool,
}

/// Refines `initial` by simulated annealing against the routed cost.
///
/// The starting placement must route; its error is returned otherwise.
/// Setting `abort` stops the search after the current move and returns the
/// best placement found so far.
#[allow(clippy::too_many_arguments)]
pub fn anneal(
    implementation: &Implementation,
    topology: &DeviceTopology,
    graph: &RoutingGraph,
    router: &dyn RoutingStrategy,
    initial: Placement,
    schedule: &AnnealSchedule,
    rng: &mut impl Rng,
    abort: &AtomicBool,
    sink: &DiagnosticSink,
) -> Result<AnnealReport, RoutingError> {
    let initial_cost = placement_cost(implementation, &initial, graph, router)?;

    let cells: Vec<NodeIndex> = initial.cells().map(|(n, _)| n).collect();
    let ports: Vec<NodeIndex> = initial.ports().map(|(n, _)| n).collect();
    let cell_sites: Vec<LogicCellCoords> = topology.logic_cell_coords().collect();
    let io_sites: Vec<IoBlockCoords> = topology.io_block_coords().collect();
    let movable = cells.len() + ports.len();

    let mut report = AnnealReport {
        placement: initial.clone(),
        cost: initial_cost,
        initial_cost,
        moves: 0,
        accepted: 0,
        unroutable: 0,
        aborted: false,
    };
    if movable == 0 || schedule.moves_per_temperature == 0 {
        return Ok(report);
    }

    let mut current = initial;
    let mut current_cost = initial_cost;
    let mut temperature = schedule.initial_temperature;

    'search: while temperature > schedule.min_temperature {
        let mut accepted = 0;

        for _ in 0..schedule.moves_per_temperature {
            if abort.load(Ordering::Relaxed) {
                report.aborted = true;
                break 'search;
            }

            // cells and ports are picked in proportion to their counts
            let mut candidate = current.clone();
            let pick = rng.gen_range(0..movable);
            if pick < cells.len() {
                let site = cell_sites[rng.gen_range(0..cell_sites.len())];
                candidate.move_cell(cells[pick], site);
            } else {
                let site = io_sites[rng.gen_range(0..io_sites.len())];
                candidate.move_port(ports[pick - cells.len()], site);
            }
            report.moves += 1;

            let Ok(cost) = placement_cost(implementation, &candidate, graph, router) else {
                report.unroutable += 1;
                continue;
            };

            // Metropolis criterion
            let delta = cost - current_cost;
            if delta < 0.0 || rng.gen::<f64>() < (-delta / temperature).exp() {
                current = candidate;
                current_cost = cost;
                accepted += 1;
                if current_cost < report.cost {
                    report.placement = current.clone();
                    report.cost = current_cost;
                }
            }
        }

        report.accepted += accepted;
        temperature *= schedule.cooling_rate;

        let acceptance_rate = accepted as f64 / f64::from(schedule.moves_per_temperature);
        if acceptance_rate < MIN_ACCEPTANCE_RATE {
            break;
        }
    }

    if report.unroutable > 0 {
        sink.emit(
            Diagnostic::warning(
                DiagnosticCode::new(Category::Placement, 1),
                format!(
                    "{} of {} placement moves could not be routed and were rejected",
                    report.unroutable, report.moves
                ),
            )
            .with_help("a larger device or more routing channels leaves the placer more room"),
        );
    }
    if report.aborted {
        sink.emit(Diagnostic::note(
            DiagnosticCode::new(Category::Placement, 2),
            format!("placement stopped early after {} moves", report.moves),
        ));
    }

    Ok(report)
}
