//! `tessera pnr`: place and route a netlist and write the routing record.
//!
//! Device geometry, router budget and annealing schedule come from
//! `tessera.toml`; command-line flags override them. The record is written
//! as JSON to `--output` or stdout.

use std::sync::atomic::AtomicBool;

use tessera_arch::DeviceTopology;
use tessera_config::FlowConfig;
use tessera_diagnostics::DiagnosticSink;
use tessera_pnr::{place_and_route, AnnealSchedule, PathFinder, PnrOptions};

use crate::pipeline::{load_flow_config, load_implementation, render_diagnostics};
use crate::{GlobalArgs, PnrArgs};

/// Runs the `tessera pnr` command.
///
/// Returns exit code 0 once the record is written. Packing, placement and
/// routing failures are shown with the collected diagnostics and exit with 1.
pub fn run(args: &PnrArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_flow_config(global)?;
    let options = pnr_options(&config, args)?;
    let sink = DiagnosticSink::new();
    let Some(implementation) = load_implementation(&args.netlist, &sink) else {
        render_diagnostics(&sink, global);
        return Ok(1);
    };

    if !global.quiet {
        eprintln!(
            "   Placing {} on a {}x{} device ({} channels)",
            args.netlist,
            options.topology.width(),
            options.topology.height(),
            options.topology.channels()
        );
    }

    let outcome = place_and_route(&implementation, &options, &AtomicBool::new(false), &sink);
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(err) => {
            sink.emit(err.diagnostic());
            render_diagnostics(&sink, global);
            return Ok(1);
        }
    };
    render_diagnostics(&sink, global);

    let json = outcome.record.to_json()?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)?;
            if !global.quiet {
                eprintln!("   Routing record: {path}");
            }
        }
        None => println!("{json}"),
    }

    if !global.quiet {
        eprintln!(
            "   Routed {} nets over {} resources in {} iterations",
            outcome.nets.len(),
            outcome.routes.resource_count(),
            outcome.routes.iterations
        );
    }
    Ok(0)
}

/// Merges the configuration with command-line overrides.
fn pnr_options(
    config: &FlowConfig,
    args: &PnrArgs,
) -> Result<PnrOptions, Box<dyn std::error::Error>> {
    let topology = DeviceTopology::with_channels(
        args.width.unwrap_or(config.device.width),
        args.height.unwrap_or(config.device.height),
        args.channels.unwrap_or(config.device.channels),
    )?;
    let placement = &config.placement;
    let schedule = (placement.enabled && !args.no_anneal).then(|| AnnealSchedule {
        initial_temperature: placement.initial_temperature,
        cooling_rate: placement.cooling_rate,
        min_temperature: placement.min_temperature,
        moves_per_temperature: placement.moves_per_temperature,
    });
    Ok(PnrOptions {
        topology,
        router: PathFinder::new(config.router.max_iterations),
        schedule,
        seed: args.seed.unwrap_or(placement.seed),
    })
}
