//! Serde mirror of the synthesis front-end's JSON netlist.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub(crate) struct RawNetlist {
    pub modules: BTreeMap<String, RawModule>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawModule {
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
    #[serde(default)]
    pub ports: BTreeMap<String, RawPort>,
    #[serde(default)]
    pub cells: BTreeMap<String, RawCell>,
}

impl RawModule {
    /// Whether the `top` attribute is set.
    ///
    /// The front-end writes attributes as zero-padded binary strings, so
    /// `"00000000000000000000000000000001"` is set and all-zero is not.
    pub fn is_top(&self) -> bool {
        match self.attributes.get("top") {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_u64().is_some_and(|n| n != 0),
            Some(Value::String(s)) => s.chars().any(|c| c != '0'),
            _ => false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPort {
    pub direction: String,
    pub bits: Vec<RawBit>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCell {
    #[serde(rename = "type")]
    pub cell_type: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
    #[serde(default)]
    pub connections: BTreeMap<String, Vec<RawBit>>,
}

/// A wire number, or a constant such as `"0"`, `"1"`, `"x"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawBit {
    Wire(u32),
    Constant(String),
}

/// Parses a parameter the front-end wrote either as a binary string or a number.
pub(crate) fn parameter_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => {
            let digits = s.trim_start_matches('0');
            if digits.is_empty() {
                return s.chars().all(|c| c == '0').then_some(0);
            }
            if digits.len() > 64 {
                return None;
            }
            u64::from_str_radix(digits, 2).ok()
        }
        _ => None,
    }
}
