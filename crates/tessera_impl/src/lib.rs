//! Packing of lookup tables and flip-flops into uniform logic cells.
//!
//! [`Implementation::build`] turns a [`Design`](tessera_netlist::Design) into a
//! graph of [`LogicCell`]s and module ports, checking on the way that every
//! flip-flop shares one clock driven by a module input.

#![warn(missing_docs)]

pub mod cell;
pub mod error;
pub mod implementation;

pub use cell::{ImplEdge, ImplGraph, ImplNode, LogicCell};
pub use error::ImplementationError;
pub use implementation::{Implementation, ImplementationStats};
