// Tue Aug 25 2026 - Alex

use crate::lj::size::{
    constant_size, debug_section_size, numeric_constant_size, proto_size, uleb128_size,
};
use crate::lj::{
    has_b_field, is_jump, is_stripped, kind_a, kind_b, kind_cd, proto_flag_names, OpcodeTable,
    OperandKind, JUMP_BIAS,
};
use crate::listing::doc::Div;
use crate::listing::text::{escape_string, table_literal};
use crate::model::{Constant, ConstantKind, DumpInfo, Proto};
use std::collections::HashMap;

const INVALID: &str = "invalid";

/// Pools a resolved operand can point into; used to key the provisional
/// reference map until the definition lines are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PoolKind {
    Uv,
    Knum,
    Kgc,
}

pub(crate) struct ProtoOutput {
    pub div: Div,
    pub cursor: usize,
    /// (definition offset, referencing instruction offset), final.
    pub refs: Vec<(usize, usize)>,
    /// (referenced prototype index, referencing line offset); resolved by
    /// the orchestrator once every prototype's start offset is known.
    pub deferred: Vec<(usize, usize)>,
}

/// Renders one prototype into a Div block while advancing the running byte
/// cursor through the predicted binary layout.
pub(crate) struct ProtoRenderer<'a> {
    info: &'a DumpInfo,
    proto: &'a Proto,
    id: usize,
    table: OpcodeTable,
    max_length: usize,
    cursor: usize,
    pending: HashMap<(PoolKind, usize), Vec<usize>>,
    refs: Vec<(usize, usize)>,
    deferred: Vec<(usize, usize)>,
}

impl<'a> ProtoRenderer<'a> {
    pub fn new(
        info: &'a DumpInfo,
        id: usize,
        table: OpcodeTable,
        max_length: usize,
        cursor: usize,
    ) -> Self {
        Self {
            info,
            proto: &info.protos[id],
            id,
            table,
            max_length,
            cursor,
            pending: HashMap::new(),
            refs: Vec::new(),
            deferred: Vec::new(),
        }
    }

    fn debug_info(&self) -> bool {
        !is_stripped(self.info.header.flags)
    }

    fn line(&mut self, div: &mut Div, size: usize, text: impl Into<String>) {
        div.new_line(self.cursor, size, text);
        self.cursor += size;
    }

    fn keyed_line(
        &mut self,
        div: &mut Div,
        size: usize,
        text: impl Into<String>,
        key: impl Into<String>,
    ) {
        div.new_keyed_line(self.cursor, size, text, key);
        self.cursor += size;
    }

    /// Drain accumulated instruction references for a pool entry now that
    /// its definition line's offset is known.
    fn promote(&mut self, kind: PoolKind, index: usize, def_offset: usize) {
        if let Some(uses) = self.pending.remove(&(kind, index)) {
            for use_offset in uses {
                self.refs.push((def_offset, use_offset));
            }
        }
    }

    fn uv_ref(&mut self, idx: i64) -> String {
        if idx < 0 || idx as usize >= self.proto.upvalues.len() {
            return INVALID.into();
        }
        let idx = idx as usize;
        self.pending
            .entry((PoolKind::Uv, idx))
            .or_default()
            .push(self.cursor);
        format!("uv_{}_{}", self.id, idx)
    }

    fn knum_ref(&mut self, idx: i64) -> String {
        if idx < 0 || idx as usize >= self.proto.knum.len() {
            return INVALID.into();
        }
        let idx = idx as usize;
        self.pending
            .entry((PoolKind::Knum, idx))
            .or_default()
            .push(self.cursor);
        format!("knum_{}_{}", self.id, idx)
    }

    /// kgc operands count from the end of the pool; the entry must also
    /// carry the constant kind the opcode expects.
    fn kgc_ref(&mut self, raw: i64, expected: ConstantKind) -> String {
        let len = self.proto.kgc.len() as i64;
        let idx = len - 1 - raw;
        if idx < 0 || idx >= len {
            return INVALID.into();
        }
        let idx = idx as usize;
        if self.proto.kgc[idx].kind() != expected {
            return INVALID.into();
        }
        self.pending
            .entry((PoolKind::Kgc, idx))
            .or_default()
            .push(self.cursor);
        format!("kgc_{}_{}", self.id, idx)
    }

    fn label_name(&self, target: i64) -> String {
        if target < 0 || target as usize >= self.proto.instructions.len() {
            return INVALID.into();
        }
        format!("label_{}_{}", self.id, target)
    }

    fn pri_name(&self, value: i64) -> String {
        match value {
            0 => "nil".into(),
            1 => "false".into(),
            2 => "true".into(),
            _ => INVALID.into(),
        }
    }

    /// Resolve one operand field into `symbol (value)` form, or the bare
    /// number when the field kind carries no pool reference.
    fn fill_field(&mut self, i: usize, nfield: usize) -> String {
        let ins = self.proto.instructions[i];
        let mode = self.table.mode(ins.opcode);
        let (kind, value) = match nfield {
            0 => (kind_a(mode), i64::from(ins.a)),
            1 => (kind_b(mode), i64::from(ins.b())),
            2 => (kind_cd(mode), i64::from(ins.c())),
            _ => (kind_cd(mode), i64::from(ins.d)),
        };

        let mut display = value;
        let sym = match kind {
            OperandKind::Uv => self.uv_ref(value),
            OperandKind::Pri => self.pri_name(value),
            OperandKind::Num => self.knum_ref(value),
            OperandKind::Str => self.kgc_ref(value, ConstantKind::Str),
            OperandKind::Tab => self.kgc_ref(value, ConstantKind::Tab),
            OperandKind::Func => self.kgc_ref(value, ConstantKind::Child),
            OperandKind::Jump => {
                display = value - JUMP_BIAS;
                self.label_name(value + 1 + i as i64 - JUMP_BIAS)
            }
            _ => String::new(),
        };

        if sym.is_empty() {
            display.to_string()
        } else {
            format!("{sym} ({display})")
        }
    }

    fn ins_block(&mut self) -> Div {
        let mut res = Div::default();
        if self.proto.instructions.is_empty() {
            return res;
        }
        res.header = ".ins".into();
        let start = self.cursor;

        // Collect every jump target first so labels land before their
        // instruction.
        let mut jumps = Vec::new();
        for (j, ins) in self.proto.instructions.iter().enumerate() {
            if is_jump(self.table.mode(ins.opcode)) {
                jumps.push(i64::from(ins.d) + 1 + j as i64 - JUMP_BIAS);
            }
        }

        let mut prev_line = 0u32;
        for i in 0..self.proto.instructions.len() {
            let ins = self.proto.instructions[i];
            if jumps.contains(&(i as i64)) {
                if !res.lines.is_empty() {
                    res.empty_line_at(start + i * 4 - 4);
                }
                let label = self.label_name(i as i64);
                self.keyed_line(&mut res, 0, format!("{label}:"), label);
            }

            let mut comment = String::new();
            if self.debug_info() {
                if let Some(&line) = self.proto.lineinfo.get(i) {
                    if line != prev_line {
                        prev_line = line;
                        comment = format!(" -- Line in source code: {line}");
                    }
                }
            }

            let mode = self.table.mode(ins.opcode);
            let mut fields = self.fill_field(i, 0);
            fields.push(',');
            if has_b_field(mode) {
                fields.push_str(&self.fill_field(i, 1));
                fields.push(',');
                fields.push_str(&self.fill_field(i, 2));
            } else {
                fields.push_str(&self.fill_field(i, 3));
            }

            let text = format!(
                "({:02X} {:02X} {:02X} {:02X}) {}\t{}{}",
                ins.opcode,
                ins.a,
                ins.c(),
                ins.b(),
                self.table.name(ins.opcode),
                fields,
                comment
            );
            self.line(&mut res, 4, text);
        }
        res.empty_line();
        res
    }

    fn uv_block(&mut self) -> Div {
        let mut res = Div::default();
        if self.proto.upvalues.is_empty() {
            return res;
        }
        res.header = ".uvdata".into();

        for i in 0..self.proto.upvalues.len() {
            let uv = self.proto.upvalues[i];
            let name = format!("uv_{}_{}", self.id, i);
            let def_offset = self.cursor;
            self.keyed_line(&mut res, 2, format!("{name} = 0x{uv:04X}"), name);
            self.promote(PoolKind::Uv, i, def_offset);
        }
        res.empty_line();
        res
    }

    fn kgc_block(&mut self) -> Div {
        let mut res = Div::default();
        if self.proto.kgc.is_empty() {
            return res;
        }
        res.header = ".kgc".into();

        for i in 0..self.proto.kgc.len() {
            let kgc = self.proto.kgc[i].clone();
            let value = match &kgc {
                Constant::Proto(id) => format!("proto{id}"),
                Constant::Table(t) => table_literal(t, self.max_length),
                Constant::I64(v) => v.to_string(),
                Constant::U64(v) => v.to_string(),
                Constant::Complex { re, im } => format!("({re}+{im}i)"),
                Constant::Str(s) => escape_string(s, self.max_length),
            };

            let name = format!("kgc_{}_{}", self.id, i);
            let def_offset = self.cursor;
            self.keyed_line(&mut res, constant_size(&kgc), format!("{name} = {value}"), name);
            self.promote(PoolKind::Kgc, i, def_offset);
            if let Constant::Proto(id) = kgc {
                self.deferred.push((id, def_offset));
            }
        }
        res.empty_line();
        res
    }

    fn knum_block(&mut self) -> Div {
        let mut res = Div::default();
        if self.proto.knum.is_empty() {
            return res;
        }
        res.header = ".knum".into();

        for i in 0..self.proto.knum.len() {
            let num = self.proto.knum[i];
            let name = format!("knum_{}_{}", self.id, i);
            let def_offset = self.cursor;
            self.keyed_line(&mut res, numeric_constant_size(num), format!("{name} = {num}"), name);
            self.promote(PoolKind::Knum, i, def_offset);
        }
        res.empty_line();
        res
    }

    fn info_block(&mut self) -> Div {
        let mut res = Div::with_header(".info");
        let debug = self.debug_info();
        let p = self.proto;

        let psize = proto_size(p, debug);
        self.line(&mut res, uleb128_size(psize as u64), format!("size = {psize:08X}"));

        if p.flags != 0 {
            let names = proto_flag_names(p.flags);
            let flags = p.flags;
            self.line(&mut res, 1, format!("flags = 0b{flags:08b} -- {names}"));
        } else {
            self.line(&mut res, 1, "flags = 0");
        }

        let numparams = p.numparams;
        let framesize = p.framesize;
        let sizeuv = p.upvalues.len();
        let sizekgc = p.kgc.len();
        let sizekn = p.knum.len();
        let sizebc = p.instructions.len();
        self.line(&mut res, 1, format!("numparams = {numparams}"));
        self.line(&mut res, 1, format!("framesize = {framesize}"));
        self.line(&mut res, 1, format!("sizeuv = {sizeuv}"));
        self.line(&mut res, uleb128_size(sizekgc as u64), format!("sizekgc = {sizekgc}"));
        self.line(&mut res, uleb128_size(sizekn as u64), format!("sizekn = {sizekn}"));
        self.line(&mut res, uleb128_size(sizebc as u64), format!("sizebc = {sizebc}"));

        if debug {
            let dbg = debug_section_size(p);
            let firstline = p.firstline;
            let numline = p.numline;
            self.line(&mut res, uleb128_size(dbg as u64), format!("sizedbg = {dbg}"));
            self.line(&mut res, uleb128_size(u64::from(firstline)), format!("firstline = {firstline}"));
            self.line(&mut res, uleb128_size(u64::from(numline)), format!("numline = {numline}"));
        }
        res.empty_line();
        res
    }

    pub fn render(mut self) -> ProtoOutput {
        let mut res = Div {
            key: Some(format!("proto{}", self.id)),
            tab: 1,
            header: format!("proto{} do", self.id),
            footer: "end\n".into(),
            ..Default::default()
        };

        let debug_bytes = if self.debug_info() {
            debug_section_size(self.proto)
        } else {
            0
        };

        let info = self.info_block();
        res.add_div(info);
        let ins = self.ins_block();
        res.add_div(ins);
        let uv = self.uv_block();
        res.add_div(uv);
        let kgc = self.kgc_block();
        res.add_div(kgc);
        let knum = self.knum_block();
        res.add_div(knum);

        // Drop the last section's trailing separator; the block footer
        // already breaks up the listing.
        if let Some(last) = res.additional.last_mut() {
            last.lines.pop();
        }

        // The debug payload (lineinfo/uvnames/varnames) is sized but not
        // listed; skipping it keeps every following prototype's offsets
        // aligned with the binary.
        self.cursor += debug_bytes;

        ProtoOutput {
            div: res,
            cursor: self.cursor,
            refs: self.refs,
            deferred: self.deferred,
        }
    }
}
