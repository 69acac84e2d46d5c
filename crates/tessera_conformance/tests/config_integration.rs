//! `tessera.toml` driving the flow from an on-disk project layout.

use std::fs;

use tempfile::TempDir;
use tessera_config::{load_config, ConfigError};
use tessera_conformance::{
    check_connected, check_exclusive, design_path, full_pipeline, implement_sample,
    options_from_config,
};
use tessera_impl::Implementation;
use tessera_netlist::Design;

#[test]
fn project_config_sets_device_and_schedule() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("tessera.toml"),
        r#"
[device]
width = 3
height = 2
channels = 3

[router]
max_iterations = 20

[placement]
seed = 8
initial_temperature = 1.0
cooling_rate = 0.5
min_temperature = 0.2
moves_per_temperature = 4
"#,
    )
    .unwrap();

    let config = load_config(tmp.path()).unwrap();
    let options = options_from_config(&config);
    assert_eq!(options.router.max_iterations, 20);
    assert_eq!(options.seed, 8);

    let result = full_pipeline(implement_sample("counter2"), &options);
    let device = result.outcome.record.device;
    assert_eq!((device.width, device.height, device.channels), (3, 2, 3));
    check_exclusive(&result.outcome).unwrap();
    check_connected(&result.outcome, &result.topology.build_network()).unwrap();
    assert!(result.outcome.anneal.is_some());
}

#[test]
fn disabled_placement_keeps_random_start() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("tessera.toml"),
        "[placement]\nenabled = false\n",
    )
    .unwrap();
    let options = options_from_config(&load_config(tmp.path()).unwrap());
    let result = full_pipeline(implement_sample("full_adder"), &options);
    assert!(result.outcome.anneal.is_none());
    assert_eq!(result.outcome.record.device.width, 4);
}

#[test]
fn netlist_copied_into_project_loads() {
    let tmp = TempDir::new().unwrap();
    let netlist = tmp.path().join("build").join("counter2.json");
    fs::create_dir_all(netlist.parent().unwrap()).unwrap();
    fs::copy(design_path("counter2"), &netlist).unwrap();

    let design = Design::load(&netlist).unwrap();
    assert_eq!(design.name, "counter2");
    let implementation = Implementation::build(&design).unwrap();
    assert_eq!(implementation.stats().packed, 2);
}

#[test]
fn missing_project_config_is_io_error() {
    let tmp = TempDir::new().unwrap();
    assert!(matches!(
        load_config(tmp.path()),
        Err(ConfigError::IoError(_))
    ));
}

#[test]
fn out_of_range_channels_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("tessera.toml"), "[device]\nchannels = 5\n").unwrap();
    assert!(matches!(
        load_config(tmp.path()),
        Err(ConfigError::ValidationError(_))
    ));
}
