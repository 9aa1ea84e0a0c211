// Tue Aug 25 2026 - Alex

use crate::model::{Table, TableValue};

fn needs_break(len: usize, max_length: usize) -> bool {
    max_length != 0 && len > max_length
}

/// Quote and escape a string the way the listing displays it: named
/// escapes for control characters, `\xHH` for everything else outside
/// printable ASCII. Long strings break into concatenated quoted segments.
pub fn escape_string(s: &str, max_length: usize) -> String {
    let mut res = String::from("\"");
    let mut newline = 0;

    for b in s.bytes() {
        if needs_break(res.len() - newline, max_length) {
            res.push_str("\"\n.. \"");
            newline = res.len();
        }

        match b {
            0x07 => res.push_str("\\a"),
            0x08 => res.push_str("\\b"),
            0x0C => res.push_str("\\f"),
            b'\n' => res.push_str("\\n"),
            b'\r' => res.push_str("\\r"),
            b'\t' => res.push_str("\\t"),
            0x0B => res.push_str("\\v"),
            b'"' => res.push_str("\\\""),
            b'\\' => res.push_str("\\\\"),
            0x20..=0x7E => res.push(b as char),
            _ => res.push_str(&format!("\\x{b:02x}")),
        }
    }
    res.push('"');
    res
}

pub fn table_value(v: &TableValue, max_length: usize) -> String {
    match v {
        TableValue::Nil => "nil".to_string(),
        TableValue::Bool(b) => b.to_string(),
        TableValue::Int(i) => i.to_string(),
        TableValue::Num(n) => n.to_string(),
        TableValue::Str(s) => escape_string(s, max_length),
    }
}

/// Render a table constant as a Lua literal: array part first in key
/// order, then `[key] = value` hash pairs. Nil-valued hash entries mean
/// absence and are skipped. A soft line break is inserted whenever the
/// current line exceeds `max_length`.
pub fn table_literal(t: &Table, max_length: usize) -> String {
    let mut res = String::new();
    let mut newline = 0;

    for i in 0..t.array_len() {
        if let Some(v) = t.get_int(i as i32 + 1) {
            if needs_break(res.len() - newline, max_length) {
                res.push('\n');
                newline = res.len();
            }
            res.push_str(&table_value(v, max_length));
            res.push_str(", ");
        }
    }

    for e in t.hash_entries() {
        if matches!(e.value, TableValue::Nil) {
            continue;
        }
        if needs_break(res.len() - newline, max_length) {
            res.push('\n');
            newline = res.len();
        }
        res.push_str(&format!(
            "[{}] = {}, ",
            table_value(&e.key, max_length),
            table_value(&e.value, max_length)
        ));
    }

    if !res.is_empty() {
        res.truncate(res.len() - 2);
    }
    format!("{{{res}}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_control_chars() {
        assert_eq!(escape_string("a\nb\tc", 0), "\"a\\nb\\tc\"");
        assert_eq!(escape_string("q\"w\\e", 0), "\"q\\\"w\\\\e\"");
        assert_eq!(escape_string("\x01\u{80}", 0), "\"\\x01\\xc2\\x80\"");
        assert_eq!(escape_string("", 0), "\"\"");
    }

    #[test]
    fn test_escape_soft_break() {
        let long = "a".repeat(12);
        let res = escape_string(&long, 8);
        assert!(res.contains("\"\n.. \""));
        // No literal control bytes survive.
        assert!(!res.contains('\t'));
    }

    #[test]
    fn test_table_array_then_hash() {
        let mut t = Table::new();
        t.insert(TableValue::Int(1), TableValue::Str("a".into()));
        t.insert(TableValue::Int(2), TableValue::Str("b".into()));
        t.insert(TableValue::Int(10), TableValue::Str("x".into()));
        assert_eq!(table_literal(&t, 0), "{\"a\", \"b\", [10] = \"x\"}");
    }

    #[test]
    fn test_table_skips_nil_values() {
        let mut t = Table::new();
        t.insert(TableValue::Str("gone".into()), TableValue::Nil);
        t.insert(TableValue::Str("kept".into()), TableValue::Int(7));
        assert_eq!(table_literal(&t, 0), "{[\"kept\"] = 7}");
        assert_eq!(table_literal(&Table::new(), 0), "{}");
    }

    #[test]
    fn test_table_soft_break() {
        let mut t = Table::new();
        for i in 1..=6 {
            t.insert(TableValue::Int(i), TableValue::Int(1000 + i));
        }
        let res = table_literal(&t, 10);
        assert!(res.contains('\n'));
    }
}
