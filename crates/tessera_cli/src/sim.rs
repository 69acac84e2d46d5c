//! `tessera sim`: clock a packed netlist and print its outputs.
//!
//! Inputs given with `--set` are applied once, then the design is clocked
//! `--ticks` times. After the initial evaluation and after every cycle one
//! line with the watched outputs is printed to stdout.

use tessera_diagnostics::DiagnosticSink;
use tessera_impl::Implementation;
use tessera_sim::{SimError, Simulator};

use crate::pipeline::{load_implementation, parse_assignment, render_diagnostics};
use crate::{GlobalArgs, SimArgs};

/// Runs the `tessera sim` command.
///
/// A design without a clock is evaluated once regardless of `--ticks`.
/// Packing and simulation errors are rendered as diagnostics and exit with 1.
pub fn run(args: &SimArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let assignments = args
        .set
        .iter()
        .map(|assignment| parse_assignment(assignment))
        .collect::<Result<Vec<_>, _>>()?;

    let sink = DiagnosticSink::new();
    let Some(implementation) = load_implementation(&args.netlist, &sink) else {
        render_diagnostics(&sink, global);
        return Ok(1);
    };
    if let Err(err) = simulate(&implementation, &assignments, args, global) {
        sink.emit(err.diagnostic());
        render_diagnostics(&sink, global);
        return Ok(1);
    }
    Ok(0)
}

fn simulate(
    implementation: &Implementation,
    assignments: &[(String, u64)],
    args: &SimArgs,
    global: &GlobalArgs,
) -> Result<(), SimError> {
    let mut simulator = Simulator::new(implementation)?;
    let watched = watched_outputs(&simulator, &args.watch);
    for (name, value) in assignments {
        simulator.set_input(name, *value)?;
    }

    simulator.eval();
    println!("{}", format_cycle(&simulator, &watched)?);

    let ticks = if implementation.clock_port.is_some() {
        args.ticks
    } else {
        if args.ticks > 0 && !global.quiet {
            eprintln!("   Design has no clock; evaluated once");
        }
        0
    };
    for _ in 0..ticks {
        simulator.tick()?;
        println!("{}", format_cycle(&simulator, &watched)?);
    }

    if !global.quiet {
        eprintln!("   Simulated {} cycles", simulator.cycle());
    }
    Ok(())
}

/// The outputs to print: the `--watch` list, or every output when empty.
fn watched_outputs(simulator: &Simulator, watch: &[String]) -> Vec<String> {
    if watch.is_empty() {
        simulator.output_names().map(str::to_string).collect()
    } else {
        watch.to_vec()
    }
}

/// Formats one line such as `cycle 3: count=3 carry=0`.
fn format_cycle(simulator: &Simulator, watched: &[String]) -> Result<String, SimError> {
    let mut line = format!("cycle {}:", simulator.cycle());
    for name in watched {
        line.push_str(&format!(" {name}={}", simulator.get_output(name)?));
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_netlist::Design;

    const COUNTER: &str = r#"{ "modules": { "counter": {
        "attributes": { "top": 1 },
        "ports": {
            "clk": { "direction": "input", "bits": [2] },
            "count": { "direction": "output", "bits": [3, 4] }
        },
        "cells": {
            "$abc$1$lut$10": { "type": "$lut", "parameters": { "LUT": "01" },
                "connections": { "A": [3], "Y": [5] } },
            "$abc$1$lut$11": { "type": "$lut", "parameters": { "LUT": "0110" },
                "connections": { "A": [3, 4], "Y": [6] } },
            "$auto$dff$12": { "type": "$_DFF_P_",
                "connections": { "C": [2], "D": [5], "Q": [3] } },
            "$auto$dff$13": { "type": "$_DFF_P_",
                "connections": { "C": [2], "D": [6], "Q": [4] } }
        }
    } } }"#;

    fn simulator() -> Simulator {
        let implementation = Implementation::build(&Design::from_json(COUNTER).unwrap()).unwrap();
        Simulator::new(&implementation).unwrap()
    }

    #[test]
    fn watches_every_output_by_default() {
        assert_eq!(watched_outputs(&simulator(), &[]), vec!["count"]);
        assert_eq!(
            watched_outputs(&simulator(), &["count".to_string()]),
            vec!["count"]
        );
    }

    #[test]
    fn cycle_lines_follow_the_counter() {
        let mut simulator = simulator();
        let watched = watched_outputs(&simulator, &[]);
        simulator.eval();
        assert_eq!(format_cycle(&simulator, &watched).unwrap(), "cycle 0: count=0");
        simulator.tick().unwrap();
        simulator.tick().unwrap();
        assert_eq!(format_cycle(&simulator, &watched).unwrap(), "cycle 2: count=2");
    }

    #[test]
    fn unknown_watch_name_is_an_error() {
        let simulator = simulator();
        let err = format_cycle(&simulator, &["missing".to_string()]).unwrap_err();
        assert_eq!(err, SimError::UnknownOutput("missing".to_string()));
        assert_eq!(err.diagnostic().entity.as_deref(), Some("missing"));
    }
}
