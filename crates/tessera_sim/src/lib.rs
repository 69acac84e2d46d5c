//! Cycle-accurate simulation of an implemented design.
//!
//! The [`Simulator`] evaluates the logic cells of an
//! [`Implementation`](tessera_impl::Implementation) directly, before any
//! placement or routing, so a design can be checked against its expected
//! behaviour clock cycle by clock cycle.
//!
//! ```ignore
//! use tessera_sim::Simulator;
//!
//! let mut sim = Simulator::new(&implementation)?;
//! sim.set_input("A", 1)?;
//! sim.set_input("B", 1)?;
//! sim.tick()?;
//! assert_eq!(sim.get_output("Q")?, 1);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod simulator;

pub use error::SimError;
pub use simulator::Simulator;
