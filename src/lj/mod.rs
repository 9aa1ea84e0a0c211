// Mon Aug 24 2026 - Alex

pub mod flags;
pub mod opcodes;
pub mod size;

pub use flags::{header_flag_names, is_stripped, proto_flag_names, DumpFlags, ProtoFlags};
pub use opcodes::{has_b_field, is_jump, kind_a, kind_b, kind_cd, Opcode, OpcodeTable, OperandKind};

/// Fixed offset added to a signed branch displacement so it can be stored
/// in the unsigned d field.
pub const JUMP_BIAS: i64 = 0x8000;

/// Size in bytes of the dump magic prefix (ESC 'L' 'J').
pub const MAGIC_SIZE: usize = 3;
