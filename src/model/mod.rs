// Mon Aug 24 2026 - Alex

pub mod constant;

pub use constant::{Constant, ConstantKind, Table, TableEntry, TableValue};

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid dump model: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parsed in-memory representation of a compiled LuaJIT script, as produced
/// by an external bytecode parser. The listing engine only ever borrows it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DumpInfo {
    pub version: u32,
    pub header: DumpHeader,
    pub protos: Vec<Proto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DumpHeader {
    pub flags: u32,
    #[serde(default)]
    pub debug_name: String,
}

impl DumpInfo {
    pub fn from_json_file(path: &Path) -> Result<Self, DumpError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn proto_count(&self) -> usize {
        self.protos.len()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Proto {
    pub flags: u8,
    pub numparams: u8,
    pub framesize: u8,
    pub firstline: u32,
    pub numline: u32,
    pub instructions: Vec<Instruction>,
    pub upvalues: Vec<u16>,
    pub kgc: Vec<Constant>,
    pub knum: Vec<f64>,
    #[serde(default)]
    pub lineinfo: Vec<u32>,
    #[serde(default)]
    pub uv_names: Vec<String>,
    #[serde(default)]
    pub varnames: Vec<VarName>,
}

/// One 32-bit instruction word. The b/c operand pair aliases the same
/// storage as the wide d operand: d = b << 8 | c.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: u8,
    pub a: u8,
    pub d: u16,
}

impl Instruction {
    pub fn abc(opcode: u8, a: u8, b: u8, c: u8) -> Self {
        Self {
            opcode,
            a,
            d: (u16::from(b) << 8) | u16::from(c),
        }
    }

    pub fn ad(opcode: u8, a: u8, d: u16) -> Self {
        Self { opcode, a, d }
    }

    pub fn b(&self) -> u8 {
        (self.d >> 8) as u8
    }

    pub fn c(&self) -> u8 {
        (self.d & 0xFF) as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    ForIndex,
    ForStop,
    ForStep,
    ForGen,
    ForState,
    ForCtl,
    Named,
}

/// Debug record for a local variable's live range. Named variables carry
/// their source name; the rest are compiler-internal loop slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarName {
    pub kind: VarKind,
    #[serde(default)]
    pub name: String,
    pub start: u32,
    pub end: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_field_aliasing() {
        let ins = Instruction::abc(0x20, 1, 2, 3);
        assert_eq!(ins.b(), 2);
        assert_eq!(ins.c(), 3);
        assert_eq!(ins.d, 0x0203);

        let ins = Instruction::ad(0x54, 0, 0x8004);
        assert_eq!(ins.b(), 0x80);
        assert_eq!(ins.c(), 0x04);
    }

    #[test]
    fn test_dump_info_roundtrip() {
        let mut info = DumpInfo {
            version: 2,
            ..Default::default()
        };
        info.protos.push(Proto {
            numparams: 1,
            framesize: 2,
            instructions: vec![Instruction::ad(0, 0, 1)],
            knum: vec![3.14],
            ..Default::default()
        });

        let json = serde_json::to_string(&info).unwrap();
        let back: DumpInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back.version, 2);
        assert_eq!(back.protos[0].knum, vec![3.14]);
    }
}
