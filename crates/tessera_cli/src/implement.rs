//! `tessera implement`: pack a netlist and summarize the logic cells.

use serde_json::json;
use tessera_diagnostics::DiagnosticSink;
use tessera_impl::{Implementation, ImplementationStats};

use crate::pipeline::{load_implementation, render_diagnostics};
use crate::{GlobalArgs, ImplementArgs, ReportFormat};

/// Runs the `tessera implement` command.
///
/// Packing errors are rendered as diagnostics and exit with 1; a packed
/// design always exits with 0.
pub fn run(args: &ImplementArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    if !global.quiet {
        eprintln!("   Implementing {}", args.netlist);
    }
    let sink = DiagnosticSink::new();
    let Some(implementation) = load_implementation(&args.netlist, &sink) else {
        render_diagnostics(&sink, global);
        return Ok(1);
    };

    match args.format {
        ReportFormat::Text => print!("{}", text_summary(&implementation, global.verbose)),
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json_summary(&implementation))?)
        }
    }
    Ok(0)
}

fn text_summary(implementation: &Implementation, verbose: bool) -> String {
    let ImplementationStats {
        logic_cells,
        packed,
        passthrough,
        combinational,
        ports,
    } = implementation.stats();
    let clock = implementation
        .clock_port()
        .map_or_else(|| "none".to_string(), |port| port.to_string());

    let mut out = format!(
        "logic cells: {logic_cells} ({packed} packed, {passthrough} passthrough, {combinational} combinational)\n\
         port bits:   {ports}\n\
         clock:       {clock}\n"
    );
    if verbose {
        for (_, cell) in implementation.logic_cells() {
            let ff = match &cell.ff {
                Some(ff) if ff.rising_edge_trigger => " -> dff (rising)",
                Some(_) => " -> dff (falling)",
                None => "",
            };
            out.push_str(&format!(
                "  {} lut {:#06x}{ff}\n",
                cell.name(),
                cell.lut.config.expanded()
            ));
        }
    }
    out
}

fn json_summary(implementation: &Implementation) -> serde_json::Value {
    let stats = implementation.stats();
    let cells: Vec<_> = implementation
        .logic_cells()
        .map(|(_, cell)| {
            json!({
                "name": cell.name(),
                "lut_config": cell.lut.config.expanded(),
                "rising_edge_trigger": cell.ff.as_ref().map(|ff| ff.rising_edge_trigger),
            })
        })
        .collect();
    json!({
        "logic_cells": stats.logic_cells,
        "packed": stats.packed,
        "passthrough": stats.passthrough,
        "combinational": stats.combinational,
        "ports": stats.ports,
        "clock": implementation.clock_port().map(|port| port.to_string()),
        "cells": cells,
    })
}
