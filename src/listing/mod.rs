// Tue Aug 25 2026 - Alex

pub mod doc;
pub mod index;
pub mod proto;
pub mod text;

pub use doc::{Div, Line};
pub use index::line_by_addr;

use crate::lj::size::uleb128_size;
use crate::lj::{header_flag_names, is_stripped, OpcodeTable, MAGIC_SIZE};
use crate::model::DumpInfo;
use crate::listing::proto::ProtoRenderer;
use log::debug;
use std::collections::BTreeMap;

/// Definition line offset -> offsets of every referencing instruction.
pub type ReferenceTable = BTreeMap<usize, Vec<usize>>;

#[derive(Debug, Clone)]
pub struct ListingOptions {
    /// Soft line-length limit for table literals and long strings;
    /// 0 disables wrapping.
    pub max_length: usize,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self { max_length: 50 }
    }
}

/// The listing engine: renders a borrowed `DumpInfo` into an offset
/// annotated document tree plus a cross-reference table. `update()`
/// rebuilds everything from scratch; the engine owns its outputs.
pub struct BytecodeListing<'a> {
    info: &'a DumpInfo,
    options: ListingOptions,
    root: Div,
    lines: Vec<Line>,
    refs: ReferenceTable,
}

impl<'a> BytecodeListing<'a> {
    pub fn new(info: &'a DumpInfo) -> Self {
        Self::with_options(info, ListingOptions::default())
    }

    pub fn with_options(info: &'a DumpInfo, options: ListingOptions) -> Self {
        Self {
            info,
            options,
            root: Div::default(),
            lines: Vec::new(),
            refs: ReferenceTable::new(),
        }
    }

    pub fn options(&self) -> &ListingOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ListingOptions) {
        self.options = options;
    }

    /// Rebuild the whole document: preamble, every prototype in
    /// declaration order, then a post-pass resolving prototype-reference
    /// constants against the completed table of block start offsets.
    pub fn update(&mut self) {
        self.root = Div::default();
        self.lines.clear();
        self.refs.clear();

        let mut cursor = 0usize;
        let table = OpcodeTable::for_version(self.info.version);
        let debug_info = !is_stripped(self.info.header.flags);

        let mut compiler = Div::default();
        compiler.empty_line_at(0);
        compiler.new_line(cursor, MAGIC_SIZE, "-- Compiler: LuaJIT");
        cursor += MAGIC_SIZE;
        compiler.new_line(cursor, 1, format!("-- Version: {}", self.info.version));
        cursor += 1;
        compiler.empty_line();
        self.root.add_div(compiler);

        let mut header = Div::with_header(".header");
        let flags = self.info.header.flags;
        if flags != 0 {
            let size = uleb128_size(u64::from(flags));
            let names = header_flag_names(flags, self.info.version);
            header.new_line(cursor, size, format!("flags = 0b{flags:08b} -- {names}"));
            cursor += size;
        } else {
            header.new_line(cursor, 1, "flags = 0");
            cursor += 1;
        }
        if debug_info {
            let name = &self.info.header.debug_name;
            let size = uleb128_size(name.len() as u64) + name.len();
            header.new_line(cursor, size, format!("debug_name = \"{name}\""));
            cursor += size;
        }
        header.empty_line();
        self.root.add_div(header);

        let mut proto_starts = Vec::with_capacity(self.info.protos.len());
        let mut deferred = Vec::new();
        for id in 0..self.info.protos.len() {
            let out =
                ProtoRenderer::new(self.info, id, table, self.options.max_length, cursor).render();
            cursor = out.cursor;
            proto_starts.push(out.div.start());
            for (def, use_at) in out.refs {
                self.refs.entry(def).or_default().push(use_at);
            }
            deferred.extend(out.deferred);
            self.root.add_div(out.div);
        }

        for (pid, use_at) in deferred {
            if let Some(Some(start)) = proto_starts.get(pid) {
                self.refs.entry(*start).or_default().push(use_at);
            }
        }

        self.lines = self.root.flatten().lines;
        debug!(
            "listing rebuilt: {} protos, {} lines, {} referenced symbols",
            self.info.protos.len(),
            self.lines.len(),
            self.refs.len()
        );
    }

    pub fn document(&self) -> &Div {
        &self.root
    }

    pub fn references(&self) -> &ReferenceTable {
        &self.refs
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn full(&self) -> String {
        self.root.to_text(false)
    }

    pub fn to_text(&self, show_offsets: bool) -> String {
        self.root.to_text(show_offsets)
    }

    pub fn line_by_addr(&self, addr: usize, prefer_last: bool) -> Option<usize> {
        line_by_addr(&self.lines, addr, prefer_last)
    }
}
