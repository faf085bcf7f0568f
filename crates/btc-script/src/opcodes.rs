//! Bitcoin script opcode table.
//!
//! Every assigned opcode byte is available both as a `u8` constant (`OP_DUP`)
//! for byte-level work and as a variant of the closed [`Opcode`] enum used by
//! the interpreter's dispatch. Direct pushes of 1 to 75 bytes share the single
//! [`Opcode::PushBytes`] variant carrying the push length, and the unassigned
//! bytes `0xba..=0xfe` map to [`Opcode::Unassigned`], so every byte decodes.

use std::borrow::Cow;
use std::fmt;

macro_rules! opcodes {
    ($( $variant:ident => $constant:ident = $value:literal ),* $(,)?) => {
        $( pub const $constant: u8 = $value; )*

        /// A script opcode.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Opcode {
            /// Direct push of 1..=75 bytes; the value is the push length.
            PushBytes(u8),
            $( $variant, )*
            /// A byte with no assigned meaning; fails only when executed.
            Unassigned(u8),
        }

        impl Opcode {
            /// The opcode for a byte.
            pub fn from_u8(b: u8) -> Self {
                match b {
                    OP_DATA_1..=OP_DATA_75 => Opcode::PushBytes(b),
                    $( $value => Opcode::$variant, )*
                    _ => Opcode::Unassigned(b),
                }
            }

            /// The byte value of this opcode.
            pub fn to_u8(self) -> u8 {
                match self {
                    Opcode::PushBytes(n) | Opcode::Unassigned(n) => n,
                    $( Opcode::$variant => $value, )*
                }
            }

            /// Canonical `OP_*` name.
            pub fn name(self) -> Cow<'static, str> {
                match self {
                    Opcode::PushBytes(n) => Cow::Owned(format!("OP_DATA_{}", n)),
                    $( Opcode::$variant => Cow::Borrowed(stringify!($constant)), )*
                    Opcode::Unassigned(n) => Cow::Owned(format!("OP_UNKNOWN{}", n)),
                }
            }

            fn from_canonical_name(name: &str) -> Option<Self> {
                match name {
                    $( stringify!($constant) => Some(Opcode::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

pub const OP_DATA_1: u8 = 0x01;
pub const OP_DATA_20: u8 = 0x14;
pub const OP_DATA_32: u8 = 0x20;
pub const OP_DATA_33: u8 = 0x21;
pub const OP_DATA_65: u8 = 0x41;
pub const OP_DATA_75: u8 = 0x4b;

opcodes! {
    Op0 => OP_0 = 0x00,
    PushData1 => OP_PUSHDATA1 = 0x4c,
    PushData2 => OP_PUSHDATA2 = 0x4d,
    PushData4 => OP_PUSHDATA4 = 0x4e,
    Op1Negate => OP_1NEGATE = 0x4f,
    Reserved => OP_RESERVED = 0x50,
    Op1 => OP_1 = 0x51,
    Op2 => OP_2 = 0x52,
    Op3 => OP_3 = 0x53,
    Op4 => OP_4 = 0x54,
    Op5 => OP_5 = 0x55,
    Op6 => OP_6 = 0x56,
    Op7 => OP_7 = 0x57,
    Op8 => OP_8 = 0x58,
    Op9 => OP_9 = 0x59,
    Op10 => OP_10 = 0x5a,
    Op11 => OP_11 = 0x5b,
    Op12 => OP_12 = 0x5c,
    Op13 => OP_13 = 0x5d,
    Op14 => OP_14 = 0x5e,
    Op15 => OP_15 = 0x5f,
    Op16 => OP_16 = 0x60,

    // flow control
    Nop => OP_NOP = 0x61,
    Ver => OP_VER = 0x62,
    If => OP_IF = 0x63,
    NotIf => OP_NOTIF = 0x64,
    VerIf => OP_VERIF = 0x65,
    VerNotIf => OP_VERNOTIF = 0x66,
    Else => OP_ELSE = 0x67,
    EndIf => OP_ENDIF = 0x68,
    Verify => OP_VERIFY = 0x69,
    Return => OP_RETURN = 0x6a,

    // stack
    ToAltStack => OP_TOALTSTACK = 0x6b,
    FromAltStack => OP_FROMALTSTACK = 0x6c,
    TwoDrop => OP_2DROP = 0x6d,
    TwoDup => OP_2DUP = 0x6e,
    ThreeDup => OP_3DUP = 0x6f,
    TwoOver => OP_2OVER = 0x70,
    TwoRot => OP_2ROT = 0x71,
    TwoSwap => OP_2SWAP = 0x72,
    IfDup => OP_IFDUP = 0x73,
    Depth => OP_DEPTH = 0x74,
    Drop => OP_DROP = 0x75,
    Dup => OP_DUP = 0x76,
    Nip => OP_NIP = 0x77,
    Over => OP_OVER = 0x78,
    Pick => OP_PICK = 0x79,
    Roll => OP_ROLL = 0x7a,
    Rot => OP_ROT = 0x7b,
    Swap => OP_SWAP = 0x7c,
    Tuck => OP_TUCK = 0x7d,

    // splice
    Cat => OP_CAT = 0x7e,
    Substr => OP_SUBSTR = 0x7f,
    Left => OP_LEFT = 0x80,
    Right => OP_RIGHT = 0x81,
    Size => OP_SIZE = 0x82,

    // bit logic
    Invert => OP_INVERT = 0x83,
    And => OP_AND = 0x84,
    Or => OP_OR = 0x85,
    Xor => OP_XOR = 0x86,
    Equal => OP_EQUAL = 0x87,
    EqualVerify => OP_EQUALVERIFY = 0x88,
    Reserved1 => OP_RESERVED1 = 0x89,
    Reserved2 => OP_RESERVED2 = 0x8a,

    // numeric
    OneAdd => OP_1ADD = 0x8b,
    OneSub => OP_1SUB = 0x8c,
    TwoMul => OP_2MUL = 0x8d,
    TwoDiv => OP_2DIV = 0x8e,
    Negate => OP_NEGATE = 0x8f,
    Abs => OP_ABS = 0x90,
    Not => OP_NOT = 0x91,
    ZeroNotEqual => OP_0NOTEQUAL = 0x92,
    Add => OP_ADD = 0x93,
    Sub => OP_SUB = 0x94,
    Mul => OP_MUL = 0x95,
    Div => OP_DIV = 0x96,
    Mod => OP_MOD = 0x97,
    LShift => OP_LSHIFT = 0x98,
    RShift => OP_RSHIFT = 0x99,
    BoolAnd => OP_BOOLAND = 0x9a,
    BoolOr => OP_BOOLOR = 0x9b,
    NumEqual => OP_NUMEQUAL = 0x9c,
    NumEqualVerify => OP_NUMEQUALVERIFY = 0x9d,
    NumNotEqual => OP_NUMNOTEQUAL = 0x9e,
    LessThan => OP_LESSTHAN = 0x9f,
    GreaterThan => OP_GREATERTHAN = 0xa0,
    LessThanOrEqual => OP_LESSTHANOREQUAL = 0xa1,
    GreaterThanOrEqual => OP_GREATERTHANOREQUAL = 0xa2,
    Min => OP_MIN = 0xa3,
    Max => OP_MAX = 0xa4,
    Within => OP_WITHIN = 0xa5,

    // crypto
    Ripemd160 => OP_RIPEMD160 = 0xa6,
    Sha1 => OP_SHA1 = 0xa7,
    Sha256 => OP_SHA256 = 0xa8,
    Hash160 => OP_HASH160 = 0xa9,
    Hash256 => OP_HASH256 = 0xaa,
    CodeSeparator => OP_CODESEPARATOR = 0xab,
    CheckSig => OP_CHECKSIG = 0xac,
    CheckSigVerify => OP_CHECKSIGVERIFY = 0xad,
    CheckMultiSig => OP_CHECKMULTISIG = 0xae,
    CheckMultiSigVerify => OP_CHECKMULTISIGVERIFY = 0xaf,

    // expansion
    Nop1 => OP_NOP1 = 0xb0,
    Nop2 => OP_NOP2 = 0xb1,
    Nop3 => OP_NOP3 = 0xb2,
    Nop4 => OP_NOP4 = 0xb3,
    Nop5 => OP_NOP5 = 0xb4,
    Nop6 => OP_NOP6 = 0xb5,
    Nop7 => OP_NOP7 = 0xb6,
    Nop8 => OP_NOP8 = 0xb7,
    Nop9 => OP_NOP9 = 0xb8,
    Nop10 => OP_NOP10 = 0xb9,

    InvalidOpcode => OP_INVALIDOPCODE = 0xff,
}

pub const OP_FALSE: u8 = OP_0;
pub const OP_TRUE: u8 = OP_1;
pub const OP_CHECKLOCKTIMEVERIFY: u8 = OP_NOP2;
pub const OP_CHECKSEQUENCEVERIFY: u8 = OP_NOP3;

impl Opcode {
    /// Resolve an `OP_*` name, including the `OP_FALSE`/`OP_TRUE` and
    /// locktime aliases and the `OP_UNKNOWN<n>` rendering of unassigned bytes.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "OP_FALSE" => return Some(Opcode::Op0),
            "OP_TRUE" => return Some(Opcode::Op1),
            "OP_CHECKLOCKTIMEVERIFY" => return Some(Opcode::Nop2),
            "OP_CHECKSEQUENCEVERIFY" => return Some(Opcode::Nop3),
            _ => {}
        }
        if let Some(n) = name.strip_prefix("OP_DATA_") {
            return match n.parse::<u8>() {
                Ok(n) if (OP_DATA_1..=OP_DATA_75).contains(&n) => Some(Opcode::PushBytes(n)),
                _ => None,
            };
        }
        if let Some(n) = name.strip_prefix("OP_UNKNOWN") {
            return match n.parse::<u8>().map(Opcode::from_u8) {
                Ok(op @ Opcode::Unassigned(_)) => Some(op),
                _ => None,
            };
        }
        Self::from_canonical_name(name)
    }

    /// Opcodes that fail unconditionally wherever they appear in a script.
    pub fn is_disabled(self) -> bool {
        matches!(
            self,
            Opcode::Cat
                | Opcode::Substr
                | Opcode::Left
                | Opcode::Right
                | Opcode::Invert
                | Opcode::And
                | Opcode::Or
                | Opcode::Xor
                | Opcode::TwoMul
                | Opcode::TwoDiv
                | Opcode::Mul
                | Opcode::Div
                | Opcode::Mod
                | Opcode::LShift
                | Opcode::RShift
        )
    }

    /// The `OP_IF..=OP_ENDIF` range, which is processed even inside an
    /// unexecuted branch.
    pub fn is_conditional(self) -> bool {
        (OP_IF..=OP_ENDIF).contains(&self.to_u8())
    }

    /// `OP_0` or `OP_1..=OP_16`.
    pub fn is_small_int(self) -> bool {
        self == Opcode::Op0 || (OP_1..=OP_16).contains(&self.to_u8())
    }

    /// The integer pushed by a small-int opcode.
    pub fn small_int_value(self) -> Option<u8> {
        match self {
            Opcode::Op0 => Some(0),
            op if op.is_small_int() => Some(op.to_u8() - (OP_1 - 1)),
            _ => None,
        }
    }

    /// Counts as a push for push-only checks: any opcode up to `OP_16`.
    pub fn is_push(self) -> bool {
        self.to_u8() <= OP_16
    }

    /// Carries pushed data: `OP_0`, direct pushes and `OP_PUSHDATA1/2/4`.
    pub fn is_push_data(self) -> bool {
        self.to_u8() <= OP_PUSHDATA4
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Render an opcode byte by name; unassigned bytes render as `OP_UNKNOWN<n>`.
pub fn opcode_to_string(op: u8) -> String {
    Opcode::from_u8(op).name().into_owned()
}

/// Parse an ASM opcode token into its byte, or `None` if it is not an opcode.
pub fn string_to_opcode(s: &str) -> Option<u8> {
    Opcode::from_name(s).map(Opcode::to_u8)
}

/// Return true for `OP_0` and `OP_1..=OP_16`.
pub fn is_small_int_op(op: u8) -> bool {
    op == OP_0 || (OP_1..=OP_16).contains(&op)
}
