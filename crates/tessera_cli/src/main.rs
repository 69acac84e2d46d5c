//! Tessera CLI, the command-line front end of the Tessera FPGA flow.
//!
//! Provides `tessera implement` for packing a synthesized netlist into logic
//! cells, `tessera pnr` for placing and routing it onto a device, and
//! `tessera sim` for clocking the packed design cycle by cycle.

#![warn(missing_docs)]

mod implement;
mod pipeline;
mod pnr;
mod sim;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Tessera, an FPGA implementation and place-and-route flow.
#[derive(Parser, Debug)]
#[command(name = "tessera", version, about = "Tessera FPGA Flow")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show notes such as router iteration summaries.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `tessera.toml` file or the directory holding it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pack a netlist into logic cells and print a summary.
    Implement(ImplementArgs),
    /// Place and route a netlist and write the routing record.
    Pnr(PnrArgs),
    /// Simulate a netlist clock cycle by clock cycle.
    Sim(SimArgs),
}

/// Arguments for the `tessera implement` subcommand.
#[derive(Parser, Debug)]
pub struct ImplementArgs {
    /// Synthesized netlist (JSON).
    pub netlist: String,

    /// Output format of the summary.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `tessera pnr` subcommand.
#[derive(Parser, Debug)]
pub struct PnrArgs {
    /// Synthesized netlist (JSON).
    pub netlist: String,

    /// Where to write the routing record (default: stdout).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Device width in logic cells (overrides `tessera.toml`).
    #[arg(long)]
    pub width: Option<u32>,

    /// Device height in logic cells (overrides `tessera.toml`).
    #[arg(long)]
    pub height: Option<u32>,

    /// Routing channels per switch block side (overrides `tessera.toml`).
    #[arg(long)]
    pub channels: Option<u32>,

    /// Keep the random initial placement.
    #[arg(long)]
    pub no_anneal: bool,

    /// Placement seed (overrides `tessera.toml`).
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for the `tessera sim` subcommand.
#[derive(Parser, Debug)]
pub struct SimArgs {
    /// Synthesized netlist (JSON).
    pub netlist: String,

    /// Input values applied before the first cycle (e.g., `--set a=3`).
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Number of clock cycles to run.
    #[arg(short, long, default_value_t = 1)]
    pub ticks: u64,

    /// Outputs to print after each cycle (default: all of them).
    #[arg(short, long)]
    pub watch: Vec<String>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Summary output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to show notes.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => atty_is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Implement(ref args) => implement::run(args, &global),
        Command::Pnr(ref args) => pnr::run(args, &global),
        Command::Sim(ref args) => sim::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Rough terminal detection from the `TERM` environment variable.
fn atty_is_terminal() -> bool {
    std::env::var("TERM").is_ok()
}
