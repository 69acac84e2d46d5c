//! Design model for technology-mapped netlists.
//!
//! Loads the JSON netlist written by the synthesis front-end, keeps the
//! lookup tables and flip-flops it contains keyed by name, and builds the
//! per-bit connectivity graph consumed by implementation.
//!
//! ```ignore
//! use tessera_netlist::Design;
//!
//! let design = Design::load(Path::new("blinky.json"))?;
//! let graph = design.build_graph()?;
//! ```

#![warn(missing_docs)]

pub mod design;
pub mod error;
pub mod graph;
pub mod ids;
pub mod lut;
mod raw;

pub use design::{Design, FlipFlopDef, LookUpTableDef};
pub use error::NetlistError;
pub use graph::{DesignEdge, DesignGraph, DesignNode, FlipFlop, LookUpTable, ModulePort, PortDirection};
pub use ids::BitId;
pub use lut::{LutConfig, LutConfigError, MAX_LUT_INPUTS};
