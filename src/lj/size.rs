// Tue Aug 25 2026 - Alex

use crate::model::{Constant, Proto, Table, TableValue, VarKind};

/// Tag offset folded into the length prefix of a table string value.
pub const KTAB_STR: u64 = 5;
/// Tag offset folded into the length prefix of a kgc string constant.
pub const KGC_STR: u64 = 5;

/// Encoded length of an unsigned variable-length integer: 7 payload bits
/// per byte, high bit is the continuation flag.
pub fn uleb128_size(value: u64) -> usize {
    let mut v = value;
    let mut res = 1;
    while v >= 0x80 {
        v >>= 7;
        res += 1;
    }
    res
}

/// Encoded length under the packed scheme used for small numeric
/// constants: the stored magnitude is `1 + 2 * value`.
pub fn uleb128_33_size(value: u32) -> usize {
    uleb128_size(1 + 2 * u64::from(value))
}

/// A 64-bit value is written as two variable-length 32-bit words.
pub fn uleb128_sizes(bits: u64) -> usize {
    uleb128_size(bits & 0xFFFF_FFFF) + uleb128_size(bits >> 32)
}

/// Serialized size of one table key or value, tag byte included.
pub fn table_value_size(v: &TableValue) -> usize {
    match v {
        TableValue::Nil | TableValue::Bool(_) => 1,
        TableValue::Int(i) => 1 + uleb128_size(u64::from(*i as u32)),
        TableValue::Num(n) => 1 + uleb128_sizes(n.to_bits()),
        TableValue::Str(s) => uleb128_size(KTAB_STR + s.len() as u64) + s.len(),
    }
}

/// Serialized size of a table constant: array-part values, hash-part
/// key/value pairs, plus the two leading part counts.
pub fn table_size(t: &Table) -> usize {
    let narray = t.array_len();
    let mut res = 0;
    for i in 0..narray {
        if let Some(v) = t.get_int(i as i32 + 1) {
            res += table_value_size(v);
        }
    }

    let mut nhash = 0u64;
    for e in t.hash_entries() {
        res += table_value_size(&e.key) + table_value_size(&e.value);
        nhash += 1;
    }

    res + uleb128_size(narray as u64) + uleb128_size(nhash)
}

/// Serialized size of a kgc constant, tag byte included. A string's tag is
/// folded into its length prefix, so one of the two counted tag bytes is
/// subtracted back out.
pub fn constant_size(c: &Constant) -> usize {
    1 + match c {
        Constant::Proto(_) => 0,
        Constant::Table(t) => table_size(t),
        Constant::I64(v) => uleb128_sizes(*v as u64),
        Constant::U64(v) => uleb128_sizes(*v),
        Constant::Complex { re, im } => uleb128_sizes(im.to_bits()) + uleb128_sizes(re.to_bits()),
        Constant::Str(s) => uleb128_size(KGC_STR + s.len() as u64) - 1 + s.len(),
    }
}

/// Serialized size of a knum constant: packed when the double survives a
/// round-trip through i32, otherwise a packed low word plus a plain high
/// word.
pub fn numeric_constant_size(value: f64) -> usize {
    let int = value as i32;
    if f64::from(int) == value {
        uleb128_33_size(int as u32)
    } else {
        let bits = value.to_bits();
        uleb128_33_size(bits as u32) + uleb128_size(bits >> 32)
    }
}

pub fn ins_section_size(p: &Proto) -> usize {
    p.instructions.len() * 4
}

pub fn uv_section_size(p: &Proto) -> usize {
    p.upvalues.len() * 2
}

pub fn kgc_section_size(p: &Proto) -> usize {
    p.kgc.iter().map(constant_size).sum()
}

pub fn knum_section_size(p: &Proto) -> usize {
    p.knum.iter().copied().map(numeric_constant_size).sum()
}

/// Per-instruction line entries widen with the prototype's line span.
pub fn lineinfo_size(p: &Proto) -> usize {
    let width = if p.numline >= 1 << 16 {
        4
    } else if p.numline >= 1 << 8 {
        2
    } else {
        1
    };
    p.lineinfo.len() * width
}

pub fn uvname_size(p: &Proto) -> usize {
    p.uv_names.iter().map(|n| n.len() + 1).sum()
}

/// Variable-name records: a kind byte (plus the name for named variables)
/// and two delta-encoded range ends, with a terminating byte.
pub fn varname_size(p: &Proto) -> usize {
    let mut last = 0u32;
    let mut res = 0;
    for vn in &p.varnames {
        res += 1;
        if vn.kind == VarKind::Named {
            res += vn.name.len();
        }
        res += uleb128_size(u64::from(vn.start.wrapping_sub(last)));
        last = vn.start;
        res += uleb128_size(u64::from(vn.end.wrapping_sub(vn.start)));
    }
    res + 1
}

pub fn debug_section_size(p: &Proto) -> usize {
    lineinfo_size(p) + uvname_size(p) + varname_size(p)
}

/// Fixed header fields plus the section counts; with debug info, the debug
/// size and (when nonzero) the line range.
pub fn proto_header_size(p: &Proto, debug: bool) -> usize {
    let mut res = 4
        + uleb128_size(p.kgc.len() as u64)
        + uleb128_size(p.knum.len() as u64)
        + uleb128_size(p.instructions.len() as u64);

    if debug {
        let dbg = debug_section_size(p);
        res += uleb128_size(dbg as u64);
        if dbg != 0 {
            res += uleb128_size(u64::from(p.firstline)) + uleb128_size(u64::from(p.numline));
        }
    }
    res
}

/// Total payload size of one prototype, the value of its length prefix.
pub fn proto_size(p: &Proto, debug: bool) -> usize {
    let mut res = proto_header_size(p, debug)
        + ins_section_size(p)
        + uv_section_size(p)
        + kgc_section_size(p)
        + knum_section_size(p);
    if debug {
        res += debug_section_size(p);
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Instruction;

    // Byte-by-byte simulation of the encoder loop.
    fn uleb128_size_ref(value: u64) -> usize {
        let mut v = value;
        let mut bytes = 0;
        loop {
            bytes += 1;
            v >>= 7;
            if v == 0 {
                break;
            }
        }
        bytes
    }

    #[test]
    fn test_uleb128_boundaries() {
        for v in [0u64, 1, 127, 128, 16383, 16384, 0xFFFF_FFFF, u64::MAX] {
            assert_eq!(uleb128_size(v), uleb128_size_ref(v), "value {v}");
        }
        assert_eq!(uleb128_size(0), 1);
        assert_eq!(uleb128_size(127), 1);
        assert_eq!(uleb128_size(128), 2);
        assert_eq!(uleb128_size(16383), 2);
        assert_eq!(uleb128_size(16384), 3);
        assert_eq!(uleb128_size(u64::MAX), 10);
    }

    #[test]
    fn test_uleb128_33() {
        assert_eq!(uleb128_33_size(0), 1);
        // 1 + 2*63 = 127 still fits one byte, 1 + 2*64 does not.
        assert_eq!(uleb128_33_size(63), 1);
        assert_eq!(uleb128_33_size(64), 2);
        assert_eq!(uleb128_33_size(u32::MAX), 5);
    }

    #[test]
    fn test_word_split_sizes() {
        assert_eq!(uleb128_sizes(0), 2);
        assert_eq!(uleb128_sizes(0x80), 3);
        assert_eq!(uleb128_sizes(0x80 << 32), 3);
        assert_eq!(uleb128_sizes(u64::MAX), 10);
    }

    #[test]
    fn test_numeric_constant_size() {
        // Integral doubles use the packed scheme.
        for v in [-5i32, 0, 1, 63, 64, 100000] {
            assert_eq!(
                numeric_constant_size(f64::from(v)),
                uleb128_33_size(v as u32),
                "value {v}"
            );
        }
        // Non-integral doubles split into a packed low word and plain high word.
        let bits = 3.14f64.to_bits();
        assert_eq!(
            numeric_constant_size(3.14),
            uleb128_33_size(bits as u32) + uleb128_size(bits >> 32)
        );
    }

    #[test]
    fn test_table_value_sizes() {
        assert_eq!(table_value_size(&TableValue::Nil), 1);
        assert_eq!(table_value_size(&TableValue::Bool(true)), 1);
        assert_eq!(table_value_size(&TableValue::Int(5)), 2);
        assert_eq!(table_value_size(&TableValue::Int(200)), 3);
        // Tag 5 + length 2 = 7: one prefix byte plus the payload.
        assert_eq!(table_value_size(&TableValue::Str("ab".into())), 3);
        let bits = 2.5f64.to_bits();
        assert_eq!(
            table_value_size(&TableValue::Num(2.5)),
            1 + uleb128_size(bits & 0xFFFF_FFFF) + uleb128_size(bits >> 32)
        );
    }

    #[test]
    fn test_table_size() {
        let mut t = Table::new();
        t.insert(TableValue::Int(1), TableValue::Str("a".into()));
        t.insert(TableValue::Int(2), TableValue::Str("b".into()));
        t.insert(TableValue::Int(10), TableValue::Str("x".into()));

        // Two counts (1 byte each), two array strings (2 bytes each), one
        // hash pair: int key 10 (2 bytes) + string value (2 bytes).
        assert_eq!(table_size(&t), 1 + 1 + 2 + 2 + 2 + 2);
        assert_eq!(table_size(&Table::new()), 2);
    }

    #[test]
    fn test_constant_sizes() {
        assert_eq!(constant_size(&Constant::Proto(0)), 1);
        // Tag byte + tag-folded length prefix (already counted once) + payload.
        assert_eq!(constant_size(&Constant::Str("abc".into())), 1 + 3);
        assert_eq!(constant_size(&Constant::I64(0)), 1 + 2);
        assert_eq!(constant_size(&Constant::U64(u64::MAX)), 1 + 10);
        assert_eq!(
            constant_size(&Constant::Complex { re: 0.0, im: 0.0 }),
            1 + 4
        );
    }

    #[test]
    fn test_proto_sizes() {
        let p = Proto {
            instructions: vec![Instruction::ad(0, 0, 1); 3],
            upvalues: vec![0x8000],
            knum: vec![1.0],
            ..Default::default()
        };
        assert_eq!(ins_section_size(&p), 12);
        assert_eq!(uv_section_size(&p), 2);
        assert_eq!(knum_section_size(&p), 1);
        // Stripped: 4 fixed bytes + three 1-byte counts.
        assert_eq!(proto_header_size(&p, false), 7);
        assert_eq!(proto_size(&p, false), 7 + 12 + 2 + 1);
    }

    #[test]
    fn test_debug_sizes() {
        let p = Proto {
            instructions: vec![Instruction::ad(0, 0, 1); 2],
            lineinfo: vec![1, 2],
            numline: 300,
            uv_names: vec!["x".into()],
            ..Default::default()
        };
        assert_eq!(lineinfo_size(&p), 4);
        assert_eq!(uvname_size(&p), 2);
        assert_eq!(varname_size(&p), 1);
        assert_eq!(debug_section_size(&p), 7);
    }
}
