//! Configuration types deserialized from `tessera.toml`.

use serde::Deserialize;

/// The top-level flow configuration parsed from `tessera.toml`.
///
/// Every section is optional; a missing file section falls back to the
/// defaults of a small 4x4 device with four routing channels.
#[derive(Debug, Default, Deserialize)]
pub struct FlowConfig {
    /// Target device geometry.
    #[serde(default)]
    pub device: DeviceConfig,
    /// PathFinder router settings.
    #[serde(default)]
    pub router: RouterConfig,
    /// Simulated-annealing placement settings.
    #[serde(default)]
    pub placement: PlacementConfig,
}

/// Device geometry, in logic cells.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Number of logic cell columns.
    #[serde(default = "default_dimension")]
    pub width: u32,
    /// Number of logic cell rows.
    #[serde(default = "default_dimension")]
    pub height: u32,
    /// Parallel wires per switch block side.
    #[serde(default = "default_channels")]
    pub channels: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            width: default_dimension(),
            height: default_dimension(),
            channels: default_channels(),
        }
    }
}

/// Negotiated-congestion router settings.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct RouterConfig {
    /// Rip-up-and-reroute iterations allowed before routing fails.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
        }
    }
}

/// Simulated-annealing placement schedule.
#[derive(Debug, Deserialize, PartialEq)]
pub struct PlacementConfig {
    /// Whether to refine the random initial placement at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seed for the placement random number generator.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Starting temperature.
    #[serde(default = "default_initial_temperature")]
    pub initial_temperature: f64,
    /// Geometric cooling factor applied after each temperature step.
    #[serde(default = "default_cooling_rate")]
    pub cooling_rate: f64,
    /// The search stops once the temperature drops below this value.
    #[serde(default = "default_min_temperature")]
    pub min_temperature: f64,
    /// Proposed moves per temperature step.
    #[serde(default = "default_moves_per_temperature")]
    pub moves_per_temperature: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            seed: default_seed(),
            initial_temperature: default_initial_temperature(),
            cooling_rate: default_cooling_rate(),
            min_temperature: default_min_temperature(),
            moves_per_temperature: default_moves_per_temperature(),
        }
    }
}

fn default_dimension() -> u32 {
    4
}

fn default_channels() -> u32 {
    tessera_arch::DEFAULT_CHANNELS
}

fn default_max_iterations() -> u32 {
    50
}

fn default_true() -> bool {
    true
}

fn default_seed() -> u64 {
    3
}

fn default_initial_temperature() -> f64 {
    10.0
}

fn default_cooling_rate() -> f64 {
    0.95
}

fn default_min_temperature() -> f64 {
    0.01
}

fn default_moves_per_temperature() -> u32 {
    10
}
