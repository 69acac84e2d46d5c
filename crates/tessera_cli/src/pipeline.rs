//! Shared pipeline helpers for CLI commands.
//!
//! Contains the pieces every subcommand needs: configuration lookup,
//! netlist loading and packing, diagnostic rendering, and parsing of
//! `name=value` input assignments.

use std::path::{Path, PathBuf};

use tessera_config::{FlowConfig, CONFIG_FILE_NAME};
use tessera_diagnostics::{DiagnosticRenderer, DiagnosticSink, Severity, TerminalRenderer};
use tessera_impl::{Implementation, ImplementationError};
use tessera_netlist::Design;

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `tessera.toml`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Loads the flow configuration selected by the global CLI args.
///
/// `--config` may name the file itself or its directory. Without it the
/// nearest `tessera.toml` above the current directory is used, and the
/// built-in defaults when there is none.
pub fn load_flow_config(global: &GlobalArgs) -> Result<FlowConfig, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let path = PathBuf::from(config_path);
        let config = if path.is_dir() {
            tessera_config::load_config(&path)?
        } else {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            tessera_config::load_config_from_str(&content)?
        };
        return Ok(config);
    }
    match find_project_root(&std::env::current_dir()?) {
        Some(root) => Ok(tessera_config::load_config(&root)?),
        None => Ok(FlowConfig::default()),
    }
}

/// Reads a synthesized netlist and packs it into logic cells.
///
/// A failure is reported to `sink` as an error diagnostic. Errors that name
/// no cell or port point at the netlist file instead.
pub fn load_implementation(path: &str, sink: &DiagnosticSink) -> Option<Implementation> {
    let built = Design::load(Path::new(path))
        .map_err(ImplementationError::from)
        .and_then(|design| Implementation::build(&design));
    match built {
        Ok(implementation) => Some(implementation),
        Err(err) => {
            let diag = err.diagnostic();
            let diag = if diag.entity.is_none() {
                diag.with_entity(path)
            } else {
                diag
            };
            sink.emit(diag);
            None
        }
    }
}

/// Renders the diagnostics of a sink to stderr, filtered by verbosity,
/// followed by an error count when any were emitted.
///
/// Returns the number of diagnostics rendered.
pub fn render_diagnostics(sink: &DiagnosticSink, global: &GlobalArgs) -> usize {
    let diagnostics = sink.at_least(Severity::threshold(global.quiet, global.verbose));
    let renderer = TerminalRenderer::new(global.color, 80);
    for diag in &diagnostics {
        eprintln!("{}", renderer.render(diag));
    }
    if sink.has_errors() && !global.quiet {
        eprintln!("   Result: {} error(s)", sink.error_count());
    }
    diagnostics.len()
}

/// Parses a `name=value` input assignment.
pub fn parse_assignment(s: &str) -> Result<(String, u64), Box<dyn std::error::Error>> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid assignment '{s}' (expected NAME=VALUE)"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing input name in '{s}'").into());
    }
    Ok((name.to_string(), parse_value(value)?))
}

/// Parses a decimal, `0x` hexadecimal, or `0b` binary number.
pub fn parse_value(s: &str) -> Result<u64, Box<dyn std::error::Error>> {
    let s = s.trim().replace('_', "");
    let parsed = if let Some(hex) = s.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)
    } else if let Some(bin) = s.strip_prefix("0b") {
        u64::from_str_radix(bin, 2)
    } else {
        s.parse()
    };
    parsed.map_err(|_| format!("invalid value '{s}'").into())
}
