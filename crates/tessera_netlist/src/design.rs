//! The loaded design: ports, lookup tables, and flip-flops keyed by name.

use crate::error::NetlistError;
use crate::ids::BitId;
use crate::lut::LutConfig;
use crate::raw::{parameter_value, RawBit, RawCell, RawNetlist};
use std::collections::BTreeMap;
use std::path::Path;

/// A lookup table instance: its truth table and the bits it reads and drives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookUpTableDef {
    /// The validated truth table.
    pub config: LutConfig,
    /// Input bits, input 0 first.
    pub input_bits: Vec<BitId>,
    /// The bit the table drives.
    pub output_bit: BitId,
}

/// A D flip-flop instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlipFlopDef {
    /// `true` for rising-edge triggering, `false` for falling-edge.
    pub rising_edge_trigger: bool,
    /// The clock bit.
    pub clock_bit: BitId,
    /// The data input bit.
    pub data_bit: BitId,
    /// The bit the flip-flop drives.
    pub output_bit: BitId,
}

/// The top module of a technology-mapped netlist.
#[derive(Clone, Debug, Default)]
pub struct Design {
    /// Name of the top module.
    pub name: String,
    /// Input ports and their bits, least significant first.
    pub inputs: BTreeMap<String, Vec<BitId>>,
    /// Output ports and their bits, least significant first.
    pub outputs: BTreeMap<String, Vec<BitId>>,
    /// Lookup tables keyed by derived name (`$lut$<suffix>`).
    pub lookup_tables: BTreeMap<String, LookUpTableDef>,
    /// Flip-flops keyed by derived name (`$dff_p$<suffix>` or `$dff_n$<suffix>`).
    pub flip_flops: BTreeMap<String, FlipFlopDef>,
}

impl Design {
    /// Reads a netlist from a JSON file.
    pub fn load(path: &Path) -> Result<Self, NetlistError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a netlist from JSON text.
    pub fn from_json(content: &str) -> Result<Self, NetlistError> {
        let raw: RawNetlist =
            serde_json::from_str(content).map_err(|e| NetlistError::Parse(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawNetlist) -> Result<Self, NetlistError> {
        let mut tops = raw.modules.into_iter().filter(|(_, module)| module.is_top());
        let (name, module) = tops.next().ok_or(NetlistError::NoTopModule)?;
        if let Some((second, _)) = tops.next() {
            return Err(NetlistError::MultipleTopModules {
                first: name,
                second,
            });
        }

        let mut design = Design {
            name,
            ..Design::default()
        };

        for (port_name, port) in module.ports {
            let bits = wires(&port_name, &port.bits)?;
            match port.direction.as_str() {
                "input" => design.inputs.insert(port_name, bits),
                "output" => design.outputs.insert(port_name, bits),
                other => {
                    return Err(NetlistError::UnsupportedPort {
                        port: port_name,
                        direction: other.to_string(),
                    })
                }
            };
        }

        for (raw_name, cell) in &module.cells {
            let suffix = raw_name.rsplit('$').next().unwrap_or(raw_name);
            match cell.cell_type.as_str() {
                "$lut" => {
                    let name = format!("$lut${suffix}");
                    let lut = read_lut(&name, cell)?;
                    if design.lookup_tables.insert(name.clone(), lut).is_some() {
                        return Err(NetlistError::DuplicateCell(name));
                    }
                }
                "$_DFF_P_" | "$_DFF_N_" => {
                    let rising = cell.cell_type == "$_DFF_P_";
                    let prefix = if rising { "dff_p" } else { "dff_n" };
                    let name = format!("${prefix}${suffix}");
                    let ff = FlipFlopDef {
                        rising_edge_trigger: rising,
                        clock_bit: single_wire(&name, cell, "C")?,
                        data_bit: single_wire(&name, cell, "D")?,
                        output_bit: single_wire(&name, cell, "Q")?,
                    };
                    if design.flip_flops.insert(name.clone(), ff).is_some() {
                        return Err(NetlistError::DuplicateCell(name));
                    }
                }
                other => {
                    return Err(NetlistError::UnsupportedCell {
                        cell: raw_name.clone(),
                        cell_type: other.to_string(),
                    })
                }
            }
        }

        Ok(design)
    }
}

fn read_lut(name: &str, cell: &RawCell) -> Result<LookUpTableDef, NetlistError> {
    let input_bits = wires(name, connection(name, cell, "A")?)?;
    let value = cell
        .parameters
        .get("LUT")
        .and_then(parameter_value)
        .ok_or_else(|| NetlistError::MalformedParameter {
            cell: name.to_string(),
            parameter: "LUT".to_string(),
        })?;
    let config =
        LutConfig::new(value, input_bits.len()).map_err(|source| NetlistError::InvalidLut {
            lut: name.to_string(),
            source,
        })?;
    Ok(LookUpTableDef {
        config,
        input_bits,
        output_bit: single_wire(name, cell, "Y")?,
    })
}

fn connection<'a>(name: &str, cell: &'a RawCell, pin: &str) -> Result<&'a [RawBit], NetlistError> {
    cell.connections
        .get(pin)
        .map(Vec::as_slice)
        .ok_or_else(|| NetlistError::MissingConnection {
            cell: name.to_string(),
            pin: pin.to_string(),
        })
}

fn single_wire(name: &str, cell: &RawCell, pin: &str) -> Result<BitId, NetlistError> {
    let bits = wires(name, connection(name, cell, pin)?)?;
    bits.first()
        .copied()
        .ok_or_else(|| NetlistError::MissingConnection {
            cell: name.to_string(),
            pin: pin.to_string(),
        })
}

fn wires(entity: &str, bits: &[RawBit]) -> Result<Vec<BitId>, NetlistError> {
    bits.iter()
        .map(|bit| match bit {
            RawBit::Wire(id) => Ok(BitId::from_raw(*id)),
            RawBit::Constant(value) => Err(NetlistError::ConstantBit {
                entity: entity.to_string(),
                value: value.clone(),
            }),
        })
        .collect()
}
