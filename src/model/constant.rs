// Mon Aug 24 2026 - Alex

use serde::{Deserialize, Serialize};

/// A garbage-collected constant from a prototype's kgc pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Constant {
    /// Index of another prototype in `DumpInfo::protos`.
    Proto(usize),
    Table(Table),
    I64(i64),
    U64(u64),
    Complex { re: f64, im: f64 },
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantKind {
    Child,
    Tab,
    I64,
    U64,
    Complex,
    Str,
}

impl Constant {
    pub fn kind(&self) -> ConstantKind {
        match self {
            Constant::Proto(_) => ConstantKind::Child,
            Constant::Table(_) => ConstantKind::Tab,
            Constant::I64(_) => ConstantKind::I64,
            Constant::U64(_) => ConstantKind::U64,
            Constant::Complex { .. } => ConstantKind::Complex,
            Constant::Str(_) => ConstantKind::Str,
        }
    }
}

/// A table constant. Entries keep the parser's order; the array part is
/// the run of integer keys 1, 2, 3, ... wherever they sit in the list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    pub entries: Vec<TableEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableEntry {
    pub key: TableValue,
    pub value: TableValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TableValue {
    Nil,
    Bool(bool),
    Int(i32),
    Num(f64),
    Str(String),
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: TableValue, value: TableValue) {
        self.entries.push(TableEntry { key, value });
    }

    pub fn get_int(&self, key: i32) -> Option<&TableValue> {
        self.entries.iter().find_map(|e| match e.key {
            TableValue::Int(k) if k == key => Some(&e.value),
            _ => None,
        })
    }

    /// Number of entries in the array part: the maximal run of keys
    /// starting at 1, stopping at the first missing integer key.
    pub fn array_len(&self) -> usize {
        let mut n = 0usize;
        while self.get_int(n as i32 + 1).is_some() {
            n += 1;
        }
        n
    }

    /// Entries that are not part of the array run, in stored order.
    pub fn hash_entries(&self) -> impl Iterator<Item = &TableEntry> {
        let narray = self.array_len() as i32;
        self.entries.iter().filter(move |e| match e.key {
            TableValue::Int(k) => k < 1 || k > narray,
            _ => true,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new();
        t.insert(TableValue::Int(1), TableValue::Str("a".into()));
        t.insert(TableValue::Int(2), TableValue::Str("b".into()));
        t.insert(TableValue::Int(10), TableValue::Str("x".into()));
        t.insert(TableValue::Str("k".into()), TableValue::Bool(true));
        t
    }

    #[test]
    fn test_array_run_stops_at_gap() {
        let t = sample();
        assert_eq!(t.array_len(), 2);
        let hash: Vec<_> = t.hash_entries().collect();
        assert_eq!(hash.len(), 2);
        assert!(matches!(hash[0].key, TableValue::Int(10)));
    }

    #[test]
    fn test_array_run_ignores_key_zero() {
        let mut t = Table::new();
        t.insert(TableValue::Int(0), TableValue::Bool(false));
        t.insert(TableValue::Int(1), TableValue::Bool(true));
        assert_eq!(t.array_len(), 1);
        assert_eq!(t.hash_entries().count(), 1);
    }

    #[test]
    fn test_constant_kind() {
        assert_eq!(Constant::Proto(3).kind(), ConstantKind::Child);
        assert_eq!(Constant::Str(String::new()).kind(), ConstantKind::Str);
        assert_eq!(Constant::Complex { re: 0.0, im: 1.0 }.kind(), ConstantKind::Complex);
    }
}
