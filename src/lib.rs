// Mon Aug 24 2026 - Alex

#![allow(dead_code)]

pub mod lj;
pub mod listing;
pub mod model;

pub use listing::{line_by_addr, BytecodeListing, Div, Line, ListingOptions, ReferenceTable};
pub use model::{Constant, DumpInfo, Instruction, Proto};
