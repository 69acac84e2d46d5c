//! Lookup table truth-table words.

use serde::{Deserialize, Serialize};

/// Widest lookup table the fabric provides.
pub const MAX_LUT_INPUTS: usize = 4;

/// Why a truth table was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LutConfigError {
    /// More inputs than the fabric's lookup tables have.
    #[error("a LUT must have {MAX_LUT_INPUTS} or fewer inputs, found {inputs}")]
    TooManyInputs {
        /// The number of inputs requested.
        inputs: usize,
    },

    /// The truth table has bits set beyond its `2^k` entries.
    #[error("for a {inputs}-input LUT the configuration value must be at most {max:#x}")]
    OutOfRange {
        /// The number of inputs.
        inputs: usize,
        /// The largest valid configuration value.
        max: u64,
    },
}

/// A validated truth table for a lookup table with `width` inputs.
///
/// Entry `i` of the table (bit `i` of `value`) is the output when the inputs,
/// read as a binary number with input 0 as the least significant bit, equal `i`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct LutConfig {
    value: u16,
    width: u8,
}

impl LutConfig {
    /// Identity function over a single input, used to pass a flip-flop's data
    /// input through an otherwise empty logic cell.
    pub const PASSTHROUGH: LutConfig = LutConfig {
        value: 0b10,
        width: 1,
    };

    /// Validates a truth table for a lookup table with `width` inputs.
    pub fn new(value: u64, width: usize) -> Result<Self, LutConfigError> {
        if width > MAX_LUT_INPUTS {
            return Err(LutConfigError::TooManyInputs { inputs: width });
        }
        let max = (1u64 << (1u32 << width)) - 1;
        if value > max {
            return Err(LutConfigError::OutOfRange {
                inputs: width,
                max,
            });
        }
        Ok(Self {
            value: value as u16,
            width: width as u8,
        })
    }

    /// The raw truth-table word.
    pub fn value(self) -> u16 {
        self.value
    }

    /// Number of inputs.
    pub fn width(self) -> usize {
        self.width as usize
    }

    /// Number of truth-table entries, `2^width`.
    pub fn entries(self) -> usize {
        1 << self.width
    }

    /// Reads the truth table at `index`.
    ///
    /// Indices past the table wrap, so inputs beyond `width` are don't-cares.
    pub fn lookup(self, index: usize) -> bool {
        self.value & (1 << (index % self.entries())) != 0
    }

    /// The truth table replicated over all 16 entries of a 4-input LUT.
    ///
    /// `0b10` over one input becomes `0xaaaa`; `0b1100` over two becomes `0xcccc`.
    pub fn expanded(self) -> u16 {
        (0..16).fold(0u16, |word, i| {
            if self.lookup(i) {
                word | (1 << i)
            } else {
                word
            }
        })
    }
}
