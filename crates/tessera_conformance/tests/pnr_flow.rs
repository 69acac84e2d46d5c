//! End-to-end place-and-route tests over the sample netlists.
//!
//! Each test packs a netlist from `tests/designs`, places and routes it and
//! checks the routed result and its record.

use std::sync::atomic::AtomicBool;

use tessera_arch::{DeviceTopology, RoutingNode};
use tessera_conformance::{
    check_connected, check_exclusive, full_pipeline, full_pipeline_sample, implement_sample,
    quick_schedule,
};
use tessera_diagnostics::{DiagnosticSink, Severity};
use tessera_pnr::{place_and_route, IoFunction, PnrOptions, RoutingRecord};

fn check_routes(result: &tessera_conformance::PipelineResult) {
    let graph = result.topology.build_network();
    check_exclusive(&result.outcome).unwrap();
    check_connected(&result.outcome, &graph).unwrap();
}

#[test]
fn counter_routes_on_small_device() {
    let result = full_pipeline_sample("counter2", 2, 2);
    check_routes(&result);

    // two feedback nets: count[0] feeds both cells, count[1] its own cell
    assert_eq!(result.outcome.nets.len(), 2);
    let fanouts: Vec<usize> = result.outcome.nets.iter().map(|n| n.sinks.len()).collect();
    assert!(fanouts.contains(&3));
    assert!(fanouts.contains(&2));
}

#[test]
fn clock_is_placed_but_not_routed() {
    let result = full_pipeline_sample("counter2", 2, 2);
    let record = &result.outcome.record;
    let clock = record
        .io_blocks
        .iter()
        .find(|io| io.port.as_deref() == Some("clk[0]"))
        .expect("clock port placed");
    assert_eq!(clock.function, IoFunction::Input);
    assert_eq!(clock.net, None);
    assert!(result.outcome.nets.iter().all(|n| n.name != "clk[0]"));
}

#[test]
fn full_adder_shares_inputs() {
    let result = full_pipeline_sample("full_adder", 2, 2);
    check_routes(&result);

    // each input bit reaches both LUTs
    let inputs: Vec<_> = result
        .outcome
        .nets
        .iter()
        .filter(|n| matches!(n.source, RoutingNode::IoBlock(_)))
        .collect();
    assert_eq!(inputs.len(), 3);
    assert!(inputs.iter().all(|n| n.sinks.len() == 2));

    let placed: Vec<_> = result
        .outcome
        .record
        .logic_cells
        .iter()
        .filter(|c| c.name.is_some())
        .collect();
    assert_eq!(placed.len(), 2);
    assert!(placed.iter().any(|c| c.lut_config == 0x9696));
    assert!(placed.iter().any(|c| c.lut_config == 0xe8e8));
}

#[test]
fn shift_register_uses_passthrough_cells() {
    let result = full_pipeline_sample("shift3", 3, 3);
    check_routes(&result);
    assert_eq!(result.implementation.stats().passthrough, 3);

    let placed: Vec<_> = result
        .outcome
        .record
        .logic_cells
        .iter()
        .filter(|c| c.name.is_some())
        .collect();
    assert_eq!(placed.len(), 3);
    for cell in placed {
        assert_eq!(cell.lut_config, 0xaaaa);
        assert!(cell.flip_flop.unwrap().rising_edge_trigger);
        assert!(cell.inputs[0].is_some());
        assert!(cell.inputs[1..].iter().all(Option::is_none));
    }
}

#[test]
fn falling_edge_flip_flop_recorded() {
    let result = full_pipeline_sample("negedge_toggle", 2, 2);
    check_routes(&result);
    let cell = result
        .outcome
        .record
        .logic_cells
        .iter()
        .find(|c| c.name.as_deref() == Some("$dff_n$9"))
        .expect("toggle cell placed");
    assert!(!cell.flip_flop.unwrap().rising_edge_trigger);
    // q_n also reads the inverter, so it stays a separate cell
    assert_eq!(cell.lut_config, 0xaaaa);
    let inverter = result
        .outcome
        .record
        .logic_cells
        .iter()
        .find(|c| c.name.as_deref() == Some("$lut$8"))
        .expect("inverter placed");
    assert_eq!(inverter.lut_config, 0x5555);
    assert_eq!(inverter.flip_flop, None);
}

#[test]
fn port_to_port_wires_route_without_cells() {
    let result = full_pipeline_sample("bus_buffer", 1, 1);
    check_routes(&result);
    assert_eq!(result.outcome.nets.len(), 3);
    let record = &result.outcome.record;
    assert!(record.logic_cells.iter().all(|c| c.name.is_none()));
    let used = record
        .io_blocks
        .iter()
        .filter(|io| io.function != IoFunction::Unused)
        .count();
    assert_eq!(used, 6);
    for io in &record.io_blocks {
        assert_eq!(io.net.is_some(), io.function != IoFunction::Unused);
    }
}

#[test]
fn annealing_never_worsens_cost() {
    let result = full_pipeline_sample("full_adder", 3, 3);
    let report = result.outcome.anneal.as_ref().expect("annealing ran");
    assert!(report.cost <= report.initial_cost);
    assert!(report.moves > 0);
}

#[test]
fn same_seed_same_record() {
    let run = || full_pipeline_sample("counter2", 3, 2).outcome.record.to_json().unwrap();
    assert_eq!(run(), run());
}

#[test]
fn record_json_reads_back() {
    let record = full_pipeline_sample("counter2", 2, 2).outcome.record;
    let json = record.to_json().unwrap();
    let back: RoutingRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
    assert_eq!(back.device.width, 2);
    assert_eq!(back.switch_blocks.len(), 9);
    assert_eq!(back.io_blocks.len(), 12);
}

#[test]
fn narrow_channels_still_route() {
    let options = PnrOptions {
        schedule: Some(quick_schedule()),
        ..PnrOptions::new(DeviceTopology::with_channels(3, 3, 2).unwrap())
    };
    let result = full_pipeline(implement_sample("counter2"), &options);
    check_routes(&result);
    assert_eq!(result.outcome.record.device.channels, 2);
    assert!(result
        .outcome
        .record
        .switch_blocks
        .iter()
        .all(|b| b.sides.iter().all(|s| s.inputs.len() == 2)));
}

#[test]
fn notes_report_progress() {
    let result = full_pipeline_sample("counter2", 2, 2);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Note && d.code.to_string() == "R003"));
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Note && d.code.to_string() == "P003"));
    assert!(result.diagnostics.iter().all(|d| !d.severity.is_error()));
}

#[test]
fn abort_still_routes_a_placement() {
    let options = PnrOptions::new(DeviceTopology::new(2, 2).unwrap());
    let sink = DiagnosticSink::new();
    let outcome = place_and_route(
        &implement_sample("full_adder"),
        &options,
        &AtomicBool::new(true),
        &sink,
    )
    .unwrap();
    let report = outcome.anneal.unwrap();
    assert!(report.aborted);
    assert_eq!(report.moves, 0);
    assert_eq!(outcome.nets.len(), 5);
}
