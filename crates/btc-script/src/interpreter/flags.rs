//! Script verification flags (bitmask).

use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Script verification flags controlling interpreter behavior.
///
/// Bit positions are fixed so that flag sets can be exchanged with other
/// implementations as a plain `u32`. Unknown bits are carried but ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ScriptFlags(u32);

impl ScriptFlags {
    pub const NONE: ScriptFlags = ScriptFlags(0);
    /// Evaluate pay-to-script-hash redeem scripts.
    pub const P2SH: ScriptFlags = ScriptFlags(1 << 0);
    /// Require strict signature hashtypes and public key encodings.
    pub const STRICTENC: ScriptFlags = ScriptFlags(1 << 1);
    /// Require strict DER signatures.
    pub const DERSIG: ScriptFlags = ScriptFlags(1 << 2);
    /// Require S to be in the lower half of the curve order.
    pub const LOW_S: ScriptFlags = ScriptFlags(1 << 3);
    /// Require the CHECKMULTISIG dummy element to be empty.
    pub const NULLDUMMY: ScriptFlags = ScriptFlags(1 << 4);
    pub const SIGPUSHONLY: ScriptFlags = ScriptFlags(1 << 5);
    /// Require the shortest encoding for pushes and numeric operands.
    pub const MINIMALDATA: ScriptFlags = ScriptFlags(1 << 6);
    pub const DISCOURAGE_UPGRADABLE_NOPS: ScriptFlags = ScriptFlags(1 << 7);

    pub const fn from_bits(bits: u32) -> Self {
        ScriptFlags(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn has_flag(self, flag: ScriptFlags) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub fn has_any(self, flags: &[ScriptFlags]) -> bool {
        flags.iter().any(|f| self.has_flag(*f))
    }

    pub fn add_flag(&mut self, flag: ScriptFlags) {
        self.0 |= flag.0;
    }
}

impl BitOr for ScriptFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        ScriptFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for ScriptFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ScriptFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        ScriptFlags(self.0 & rhs.0)
    }
}
