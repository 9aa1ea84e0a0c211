// Mon Aug 24 2026 - Alex

use bitflags::bitflags;
use itertools::Itertools;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DumpFlags: u32 {
        const BE = 0x01;
        const STRIP = 0x02;
        const FFI = 0x04;
        const FR2 = 0x08;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ProtoFlags: u8 {
        const CHILD = 0x01;
        const VARARG = 0x02;
        const FFI = 0x04;
        const NOJIT = 0x08;
        const ILOOP = 0x10;
    }
}

/// Decompose a dump header flag word into `BCDUMP_F_*` names. Bits without
/// a name are appended as a bare number; FR2 only exists in version 2.
pub fn header_flag_names(flags: u32, version: u32) -> String {
    let mut named = [
        (DumpFlags::BE, "BCDUMP_F_BE"),
        (DumpFlags::STRIP, "BCDUMP_F_STRIP"),
        (DumpFlags::FFI, "BCDUMP_F_FFI"),
        (DumpFlags::FR2, "BCDUMP_F_FR2"),
    ]
    .to_vec();
    if version != 2 {
        named.pop();
    }

    let mut rest = flags;
    let mut parts = Vec::new();
    for (flag, name) in named {
        if rest & flag.bits() != 0 {
            parts.push(name.to_string());
            rest &= !flag.bits();
        }
    }
    if rest != 0 {
        parts.push(rest.to_string());
    }
    parts.into_iter().join(" | ")
}

/// Decompose a prototype flag byte into `PROTO_*` names.
pub fn proto_flag_names(flags: u8) -> String {
    let named = [
        (ProtoFlags::CHILD, "PROTO_CHILD"),
        (ProtoFlags::VARARG, "PROTO_VARARG"),
        (ProtoFlags::FFI, "PROTO_FFI"),
        (ProtoFlags::NOJIT, "PROTO_NOJIT"),
        (ProtoFlags::ILOOP, "PROTO_ILOOP"),
    ];

    let mut rest = flags;
    let mut parts = Vec::new();
    for (flag, name) in named {
        if rest & flag.bits() != 0 {
            parts.push(name.to_string());
            rest &= !flag.bits();
        }
    }
    if rest != 0 {
        parts.push(rest.to_string());
    }
    parts.into_iter().join(" | ")
}

pub fn is_stripped(flags: u32) -> bool {
    flags & DumpFlags::STRIP.bits() != 0
}
