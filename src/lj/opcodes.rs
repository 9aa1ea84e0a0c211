// Mon Aug 24 2026 - Alex

/// Semantic kind of one operand field, as packed into an opcode's mode word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum OperandKind {
    None = 0,
    Dst,
    Base,
    Var,
    Rbase,
    Uv,
    Lit,
    Lits,
    Pri,
    Num,
    Str,
    Tab,
    Func,
    Jump,
    Cdata,
}

impl OperandKind {
    pub fn from_bits(bits: u32) -> Self {
        match bits {
            1 => OperandKind::Dst,
            2 => OperandKind::Base,
            3 => OperandKind::Var,
            4 => OperandKind::Rbase,
            5 => OperandKind::Uv,
            6 => OperandKind::Lit,
            7 => OperandKind::Lits,
            8 => OperandKind::Pri,
            9 => OperandKind::Num,
            10 => OperandKind::Str,
            11 => OperandKind::Tab,
            12 => OperandKind::Func,
            13 => OperandKind::Jump,
            14 => OperandKind::Cdata,
            _ => OperandKind::None,
        }
    }
}

// Mode word layout: a-kind in bits 0-2, b-kind in bits 3-6, c/d-kind in
// bits 7-10. The c and d fields share the decode slot.
const fn mode_word(a: OperandKind, b: OperandKind, cd: OperandKind) -> u32 {
    a as u32 | (b as u32) << 3 | (cd as u32) << 7
}

pub fn kind_a(mode: u32) -> OperandKind {
    OperandKind::from_bits(mode & 0x7)
}

pub fn kind_b(mode: u32) -> OperandKind {
    OperandKind::from_bits((mode >> 3) & 0xF)
}

pub fn kind_cd(mode: u32) -> OperandKind {
    OperandKind::from_bits((mode >> 7) & 0xF)
}

/// Three-operand (a, b, c) form rather than the wide (a, d) form.
pub fn has_b_field(mode: u32) -> bool {
    kind_b(mode) != OperandKind::None
}

pub fn is_jump(mode: u32) -> bool {
    kind_cd(mode) == OperandKind::Jump
}

#[derive(Debug, Clone, Copy)]
pub struct Opcode {
    pub name: &'static str,
    pub mode: u32,
}

macro_rules! ops {
    ($($name:ident($a:ident, $b:ident, $cd:ident),)*) => {
        &[$(Opcode {
            name: stringify!($name),
            mode: mode_word(OperandKind::$a, OperandKind::$b, OperandKind::$cd),
        },)*]
    };
}

/// LuaJIT 2.0 opcode list (dump format version 1).
static OPCODES_V1: &[Opcode] = ops![
    ISLT(Var, None, Var),
    ISGE(Var, None, Var),
    ISLE(Var, None, Var),
    ISGT(Var, None, Var),
    ISEQV(Var, None, Var),
    ISNEV(Var, None, Var),
    ISEQS(Var, None, Str),
    ISNES(Var, None, Str),
    ISEQN(Var, None, Num),
    ISNEN(Var, None, Num),
    ISEQP(Var, None, Pri),
    ISNEP(Var, None, Pri),
    ISTC(Dst, None, Var),
    ISFC(Dst, None, Var),
    IST(None, None, Var),
    ISF(None, None, Var),
    MOV(Dst, None, Var),
    NOT(Dst, None, Var),
    UNM(Dst, None, Var),
    LEN(Dst, None, Var),
    ADDVN(Dst, Var, Num),
    SUBVN(Dst, Var, Num),
    MULVN(Dst, Var, Num),
    DIVVN(Dst, Var, Num),
    MODVN(Dst, Var, Num),
    ADDNV(Dst, Var, Num),
    SUBNV(Dst, Var, Num),
    MULNV(Dst, Var, Num),
    DIVNV(Dst, Var, Num),
    MODNV(Dst, Var, Num),
    ADDVV(Dst, Var, Var),
    SUBVV(Dst, Var, Var),
    MULVV(Dst, Var, Var),
    DIVVV(Dst, Var, Var),
    MODVV(Dst, Var, Var),
    POW(Dst, Var, Var),
    CAT(Dst, Rbase, Rbase),
    KSTR(Dst, None, Str),
    KCDATA(Dst, None, Cdata),
    KSHORT(Dst, None, Lits),
    KNUM(Dst, None, Num),
    KPRI(Dst, None, Pri),
    KNIL(Base, None, Base),
    UGET(Dst, None, Uv),
    USETV(Uv, None, Var),
    USETS(Uv, None, Str),
    USETN(Uv, None, Num),
    USETP(Uv, None, Pri),
    UCLO(Rbase, None, Jump),
    FNEW(Dst, None, Func),
    TNEW(Dst, None, Lit),
    TDUP(Dst, None, Tab),
    GGET(Dst, None, Str),
    GSET(Var, None, Str),
    TGETV(Dst, Var, Var),
    TGETS(Dst, Var, Str),
    TGETB(Dst, Var, Lit),
    TSETV(Var, Var, Var),
    TSETS(Var, Var, Str),
    TSETB(Var, Var, Lit),
    TSETM(Base, None, Num),
    CALLM(Base, Lit, Lit),
    CALL(Base, Lit, Lit),
    CALLMT(Base, None, Lit),
    CALLT(Base, None, Lit),
    ITERC(Base, Lit, Lit),
    ITERN(Base, Lit, Lit),
    VARG(Base, Lit, Lit),
    ISNEXT(Base, None, Jump),
    RETM(Base, None, Lit),
    RET(Rbase, None, Lit),
    RET0(Rbase, None, Lit),
    RET1(Rbase, None, Lit),
    FORI(Base, None, Jump),
    JFORI(Base, None, Jump),
    FORL(Base, None, Jump),
    IFORL(Base, None, Jump),
    JFORL(Base, None, Lit),
    ITERL(Base, None, Jump),
    IITERL(Base, None, Jump),
    JITERL(Base, None, Lit),
    LOOP(Rbase, None, Jump),
    ILOOP(Rbase, None, Jump),
    JLOOP(Rbase, None, Lit),
    JMP(Rbase, None, Jump),
    FUNCF(Rbase, None, None),
    IFUNCF(Rbase, None, None),
    JFUNCF(Rbase, None, Lit),
    FUNCV(Rbase, None, None),
    IFUNCV(Rbase, None, None),
    JFUNCV(Rbase, None, Lit),
    FUNCC(Rbase, None, None),
    FUNCCW(Rbase, None, None),
];

/// LuaJIT 2.1 opcode list (dump format version 2). Adds ISTYPE/ISNUM and
/// the raw table access ops TGETR/TSETR.
static OPCODES_V2: &[Opcode] = ops![
    ISLT(Var, None, Var),
    ISGE(Var, None, Var),
    ISLE(Var, None, Var),
    ISGT(Var, None, Var),
    ISEQV(Var, None, Var),
    ISNEV(Var, None, Var),
    ISEQS(Var, None, Str),
    ISNES(Var, None, Str),
    ISEQN(Var, None, Num),
    ISNEN(Var, None, Num),
    ISEQP(Var, None, Pri),
    ISNEP(Var, None, Pri),
    ISTC(Dst, None, Var),
    ISFC(Dst, None, Var),
    IST(None, None, Var),
    ISF(None, None, Var),
    ISTYPE(Var, None, Lit),
    ISNUM(Var, None, Lit),
    MOV(Dst, None, Var),
    NOT(Dst, None, Var),
    UNM(Dst, None, Var),
    LEN(Dst, None, Var),
    ADDVN(Dst, Var, Num),
    SUBVN(Dst, Var, Num),
    MULVN(Dst, Var, Num),
    DIVVN(Dst, Var, Num),
    MODVN(Dst, Var, Num),
    ADDNV(Dst, Var, Num),
    SUBNV(Dst, Var, Num),
    MULNV(Dst, Var, Num),
    DIVNV(Dst, Var, Num),
    MODNV(Dst, Var, Num),
    ADDVV(Dst, Var, Var),
    SUBVV(Dst, Var, Var),
    MULVV(Dst, Var, Var),
    DIVVV(Dst, Var, Var),
    MODVV(Dst, Var, Var),
    POW(Dst, Var, Var),
    CAT(Dst, Rbase, Rbase),
    KSTR(Dst, None, Str),
    KCDATA(Dst, None, Cdata),
    KSHORT(Dst, None, Lits),
    KNUM(Dst, None, Num),
    KPRI(Dst, None, Pri),
    KNIL(Base, None, Base),
    UGET(Dst, None, Uv),
    USETV(Uv, None, Var),
    USETS(Uv, None, Str),
    USETN(Uv, None, Num),
    USETP(Uv, None, Pri),
    UCLO(Rbase, None, Jump),
    FNEW(Dst, None, Func),
    TNEW(Dst, None, Lit),
    TDUP(Dst, None, Tab),
    GGET(Dst, None, Str),
    GSET(Var, None, Str),
    TGETV(Dst, Var, Var),
    TGETS(Dst, Var, Str),
    TGETB(Dst, Var, Lit),
    TGETR(Dst, Var, Var),
    TSETV(Var, Var, Var),
    TSETS(Var, Var, Str),
    TSETB(Var, Var, Lit),
    TSETM(Base, None, Num),
    TSETR(Var, Var, Var),
    CALLM(Base, Lit, Lit),
    CALL(Base, Lit, Lit),
    CALLMT(Base, None, Lit),
    CALLT(Base, None, Lit),
    ITERC(Base, Lit, Lit),
    ITERN(Base, Lit, Lit),
    VARG(Base, Lit, Lit),
    ISNEXT(Base, None, Jump),
    RETM(Base, None, Lit),
    RET(Rbase, None, Lit),
    RET0(Rbase, None, Lit),
    RET1(Rbase, None, Lit),
    FORI(Base, None, Jump),
    JFORI(Base, None, Jump),
    FORL(Base, None, Jump),
    IFORL(Base, None, Jump),
    JFORL(Base, None, Lit),
    ITERL(Base, None, Jump),
    IITERL(Base, None, Jump),
    JITERL(Base, None, Lit),
    LOOP(Rbase, None, Jump),
    ILOOP(Rbase, None, Jump),
    JLOOP(Rbase, None, Lit),
    JMP(Rbase, None, Jump),
    FUNCF(Rbase, None, None),
    IFUNCF(Rbase, None, None),
    JFUNCF(Rbase, None, Lit),
    FUNCV(Rbase, None, None),
    IFUNCV(Rbase, None, None),
    JFUNCV(Rbase, None, Lit),
    FUNCC(Rbase, None, None),
    FUNCCW(Rbase, None, None),
];

#[derive(Debug, Clone, Copy)]
pub struct OpcodeTable {
    ops: &'static [Opcode],
}

impl OpcodeTable {
    /// Dump format versions 1 and 2 are known; anything else decodes with
    /// the newest table rather than failing.
    pub fn for_version(version: u32) -> Self {
        let ops = if version == 1 { OPCODES_V1 } else { OPCODES_V2 };
        Self { ops }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn get(&self, opcode: u8) -> Option<&Opcode> {
        self.ops.get(usize::from(opcode))
    }

    pub fn name(&self, opcode: u8) -> &'static str {
        self.get(opcode).map_or("UNK", |op| op.name)
    }

    /// Mode word for an opcode; unknown opcodes decode as all-None.
    pub fn mode(&self, opcode: u8) -> u32 {
        self.get(opcode).map_or(0, |op| op.mode)
    }

    pub fn position(&self, name: &str) -> Option<u8> {
        self.ops.iter().position(|op| op.name == name).map(|i| i as u8)
    }
}
