//! Diagnostic codes grouped by the toolchain stage that raises them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The toolchain stage a diagnostic code belongs to, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Netlist loading and validation, prefixed with `N`.
    Netlist,
    /// Logic cell packing and clock checks, prefixed with `I`.
    Implementation,
    /// Placement search, prefixed with `P`.
    Placement,
    /// Negotiated-congestion routing, prefixed with `R`.
    Routing,
    /// Cycle simulation, prefixed with `S`.
    Simulation,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Netlist => 'N',
            Category::Implementation => 'I',
            Category::Placement => 'P',
            Category::Routing => 'R',
            Category::Simulation => 'S',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric identifier.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number,
/// e.g. `R001` or `P010`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The stage that raised this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
