//! Script number arithmetic with Bitcoin consensus rules.
//!
//! All numbers on the Bitcoin script stack are encoded as little-endian
//! byte arrays with a sign bit in the most significant bit of the last byte.
//! Numeric opcodes read operands of at most 4 bytes, but results may overflow
//! that range and remain valid as long as they are not reinterpreted as
//! numbers.

use std::ops::{Add, Neg, Sub};

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use super::error::ScriptError;

/// A script number using big integer arithmetic for overflow safety.
///
/// Values are immutable: every arithmetic operation yields a new number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ScriptNumber {
    val: BigInt,
}

impl ScriptNumber {
    /// Decode a stack element with no length limit.
    ///
    /// With `require_minimal`, a buffer carrying a redundant trailing byte
    /// (including negative zero) fails with [`ScriptError::MinimalData`].
    pub fn from_buffer(buf: &[u8], require_minimal: bool) -> Result<Self, ScriptError> {
        if require_minimal {
            check_minimal_data_encoding(buf)?;
        }

        if buf.is_empty() {
            return Ok(ScriptNumber::default());
        }

        // Decode from little endian with sign bit
        let last = buf.len() - 1;
        let mut magnitude = buf.to_vec();
        let negative = magnitude[last] & 0x80 != 0;
        magnitude[last] &= 0x7f;
        let v = BigInt::from_bytes_le(num_bigint::Sign::Plus, &magnitude);

        Ok(ScriptNumber {
            val: if negative { -v } else { v },
        })
    }

    /// Decode a numeric operand of at most `max_len` bytes.
    pub fn from_bytes(buf: &[u8], max_len: usize, require_minimal: bool) -> Result<Self, ScriptError> {
        if buf.len() > max_len {
            return Err(ScriptError::unknown(format!(
                "script number overflow: {} bytes exceeds the max allowed of {}",
                buf.len(),
                max_len
            )));
        }
        Self::from_buffer(buf, require_minimal)
    }

    /// Serialize the number to its minimal little-endian sign-magnitude form.
    ///
    /// Zero encodes as the empty buffer.
    pub fn to_buffer(&self) -> Vec<u8> {
        if self.val.is_zero() {
            return vec![];
        }

        let is_negative = self.val.is_negative();
        let (_, mut result) = self.val.abs().to_bytes_le();

        // Handle sign bit
        let last = result.len() - 1;
        if result[last] & 0x80 != 0 {
            // Need an extra byte for the sign
            result.push(if is_negative { 0x80 } else { 0x00 });
        } else if is_negative {
            result[last] |= 0x80;
        }

        result
    }

    pub fn abs(&self) -> Self {
        ScriptNumber { val: self.val.abs() }
    }

    pub fn is_zero(&self) -> bool {
        self.val.is_zero()
    }

    /// Convert to i32, clamping to [i32::MIN, i32::MAX] on overflow.
    pub fn to_i32(&self) -> i32 {
        match self.val.to_i32() {
            Some(v) => v,
            None if self.val.is_positive() => i32::MAX,
            None => i32::MIN,
        }
    }
}

impl From<i64> for ScriptNumber {
    fn from(v: i64) -> Self {
        ScriptNumber { val: BigInt::from(v) }
    }
}

impl From<bool> for ScriptNumber {
    fn from(v: bool) -> Self {
        ScriptNumber::from(v as i64)
    }
}

impl Add for ScriptNumber {
    type Output = ScriptNumber;
    fn add(self, rhs: ScriptNumber) -> ScriptNumber {
        ScriptNumber { val: self.val + rhs.val }
    }
}

impl Sub for ScriptNumber {
    type Output = ScriptNumber;
    fn sub(self, rhs: ScriptNumber) -> ScriptNumber {
        ScriptNumber { val: self.val - rhs.val }
    }
}

impl Neg for ScriptNumber {
    type Output = ScriptNumber;
    fn neg(self) -> ScriptNumber {
        ScriptNumber { val: -self.val }
    }
}

/// Check that a byte array uses minimal data encoding.
///
/// The last byte, ignoring the sign bit, must be nonzero unless the byte
/// before it has its high bit set.
pub fn check_minimal_data_encoding(v: &[u8]) -> Result<(), ScriptError> {
    if let Some(&last) = v.last() {
        if last & 0x7f == 0 && (v.len() == 1 || v[v.len() - 2] & 0x80 == 0) {
            return Err(ScriptError::MinimalData);
        }
    }
    Ok(())
}
