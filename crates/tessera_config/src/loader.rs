//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::FlowConfig;
use std::path::Path;
use tessera_arch::DeviceTopology;

/// File name looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "tessera.toml";

/// Loads and validates a `tessera.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<FlowConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `tessera.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<FlowConfig, ConfigError> {
    let config: FlowConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks value ranges that serde cannot express.
fn validate_config(config: &FlowConfig) -> Result<(), ConfigError> {
    let device = &config.device;
    DeviceTopology::with_channels(device.width, device.height, device.channels)
        .map_err(|e| ConfigError::ValidationError(format!("[device] {e}")))?;
    if config.router.max_iterations == 0 {
        return Err(ConfigError::ValidationError(
            "router.max_iterations must be at least 1".to_string(),
        ));
    }

    let placement = &config.placement;
    if !(placement.cooling_rate > 0.0 && placement.cooling_rate < 1.0) {
        return Err(ConfigError::ValidationError(format!(
            "placement.cooling_rate must be in (0, 1), got {}",
            placement.cooling_rate
        )));
    }
    if placement.min_temperature <= 0.0 {
        return Err(ConfigError::ValidationError(
            "placement.min_temperature must be positive".to_string(),
        ));
    }
    if placement.initial_temperature < placement.min_temperature {
        return Err(ConfigError::ValidationError(format!(
            "placement.initial_temperature ({}) is below min_temperature ({})",
            placement.initial_temperature, placement.min_temperature
        )));
    }
    Ok(())
}
