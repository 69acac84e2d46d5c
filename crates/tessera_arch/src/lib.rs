//! Fabric model of the Tessera programmable device.
//!
//! The device is a `width x height` grid of logic cells. Switch blocks sit
//! at the cell corners, forming a `(width + 1) x (height + 1)` grid, and I/O
//! blocks line all four edges. [`DeviceTopology::build_network`] turns this
//! into a weighted [`RoutingGraph`] of routable resource nodes.
//!
//! ```
//! use tessera_arch::DeviceTopology;
//!
//! let topology = DeviceTopology::new(2, 2).unwrap();
//! let network = topology.build_network();
//! assert_eq!(topology.switch_block_coords().count(), 9);
//! assert!(network.node_count() > 0);
//! ```

#![warn(missing_docs)]

pub mod coords;
pub mod direction;
pub mod error;
pub mod graph;
pub mod node;
pub mod topology;

pub use coords::{IoBlockCoords, LogicCellCoords, SwitchBlockCoords};
pub use direction::{CardinalDirection, IntercardinalDirection};
pub use error::TopologyError;
pub use graph::RoutingGraph;
pub use node::RoutingNode;
pub use topology::{DeviceTopology, DEFAULT_CHANNELS, LOGIC_CELL_INPUTS, MAX_CHANNELS};
