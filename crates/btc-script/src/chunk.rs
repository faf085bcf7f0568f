//! Script chunk parsing and encoding.
//!
//! A script chunk is either an opcode or a data push with its associated bytes.
//! This module handles decoding raw script bytes into structured chunks and
//! encoding push data with the correct OP_PUSHDATA prefix.
//!
//! Decoding is total: a push whose declared length runs past the end of the
//! script is kept as a malformed chunk holding whatever bytes were present,
//! so that re-serializing reproduces the input exactly. The interpreter
//! rejects such a chunk when it executes it.

use crate::opcodes::*;
use crate::ParseError;

/// A single parsed element of a Bitcoin script.
///
/// Each chunk is either a standalone opcode (like OP_DUP) or a data push
/// that carries the opcode byte and the pushed data bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// The opcode byte. For direct pushes (1-75 bytes), this is the length.
    pub op: u8,
    /// The data payload, if this chunk is a push operation.
    pub data: Option<Vec<u8>>,
    /// The push length announced by the script bytes. `None` when the length
    /// prefix itself was cut short; `data` then holds the partial prefix.
    pub declared_len: Option<usize>,
}

impl ScriptChunk {
    /// A chunk for a bare opcode.
    pub fn opcode(op: u8) -> Self {
        ScriptChunk {
            op,
            data: None,
            declared_len: None,
        }
    }

    /// A push of `data` using the shortest prefix for its length.
    ///
    /// Empty data is pushed as `OP_0`.
    pub fn push(data: &[u8]) -> Result<Self, ParseError> {
        let op = match data.len() {
            0 => return Ok(ScriptChunk::opcode(OP_0)),
            len if len <= OP_DATA_75 as usize => len as u8,
            len if len <= 0xff => OP_PUSHDATA1,
            len if len <= 0xffff => OP_PUSHDATA2,
            len if len <= 0xffff_ffff => OP_PUSHDATA4,
            _ => return Err(ParseError::DataTooBig),
        };
        Ok(ScriptChunk {
            op,
            data: Some(data.to_vec()),
            declared_len: Some(data.len()),
        })
    }

    /// Return true unless this is a push whose data does not match its
    /// declared length.
    pub fn is_well_formed(&self) -> bool {
        match (&self.data, self.declared_len) {
            (Some(data), Some(len)) => data.len() == len,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }

    /// Return true if this chunk pushes its data with the smallest possible
    /// opcode. Non-push chunks are trivially minimal.
    pub fn is_minimal_push(&self) -> bool {
        let data = match &self.data {
            Some(data) => data,
            None => return true,
        };
        let len = data.len();
        if len == 0 {
            return self.op == OP_0;
        }
        if len == 1 && (1..=16).contains(&data[0]) {
            return self.op == OP_1 + data[0] - 1;
        }
        if len == 1 && data[0] == 0x81 {
            return self.op == OP_1NEGATE;
        }
        if len <= OP_DATA_75 as usize {
            return self.op as usize == len;
        }
        if len <= 0xff {
            return self.op == OP_PUSHDATA1;
        }
        if len <= 0xffff {
            return self.op == OP_PUSHDATA2;
        }
        true
    }

    /// Number of bytes this chunk occupies when serialized.
    pub fn serialized_len(&self) -> usize {
        let prefix = match (self.op, self.declared_len) {
            (OP_PUSHDATA1, Some(_)) => 1,
            (OP_PUSHDATA2, Some(_)) => 2,
            (OP_PUSHDATA4, Some(_)) => 4,
            _ => 0,
        };
        1 + prefix + self.data.as_ref().map_or(0, Vec::len)
    }

    /// Append the serialized form of this chunk to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(self.op);
        if let Some(ref data) = self.data {
            match (self.op, self.declared_len) {
                (OP_PUSHDATA1, Some(len)) => out.push(len as u8),
                (OP_PUSHDATA2, Some(len)) => out.extend_from_slice(&(len as u16).to_le_bytes()),
                (OP_PUSHDATA4, Some(len)) => out.extend_from_slice(&(len as u32).to_le_bytes()),
                _ => {}
            }
            out.extend_from_slice(data);
        }
    }

    /// Serialize this chunk to raw script bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_len());
        self.write_to(&mut out);
        out
    }

    /// Convert this chunk to its ASM string representation.
    ///
    /// Data push chunks are rendered as hex strings; non-push opcodes use
    /// their canonical OP_xxx name.
    ///
    /// # Returns
    /// A string suitable for inclusion in a space-separated ASM output.
    pub fn to_asm_string(&self) -> String {
        if self.op > OP_0 && self.op <= OP_PUSHDATA4 {
            if let Some(ref data) = self.data {
                if !self.is_well_formed() {
                    return format!("[error:{}]", hex::encode(data));
                }
                return hex::encode(data);
            }
        }
        opcode_to_string(self.op)
    }
}

/// Decode raw script bytes into a vector of `ScriptChunk` values.
///
/// Handles OP_DATA_1..OP_DATA_75 (direct push) and OP_PUSHDATA1/2/4
/// (extended push). Every other byte becomes a bare opcode chunk, including
/// OP_RETURN and unassigned opcode bytes.
///
/// # Arguments
/// * `bytes` - The raw script bytes to decode.
///
/// # Returns
/// A vector of parsed chunks. Truncated pushes are returned as malformed
/// chunks rather than errors.
pub fn decode_script(bytes: &[u8]) -> Vec<ScriptChunk> {
    let mut chunks = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let op = bytes[pos];
        pos += 1;

        let prefix_len = match op {
            OP_PUSHDATA1 => 1,
            OP_PUSHDATA2 => 2,
            OP_PUSHDATA4 => 4,
            OP_DATA_1..=OP_DATA_75 => 0,
            _ => {
                chunks.push(ScriptChunk::opcode(op));
                continue;
            }
        };

        if bytes.len() < pos + prefix_len {
            // Length prefix cut short: keep the partial prefix as data.
            chunks.push(ScriptChunk {
                op,
                data: Some(bytes[pos..].to_vec()),
                declared_len: None,
            });
            break;
        }

        let length = match prefix_len {
            0 => op as usize,
            1 => bytes[pos] as usize,
            2 => u16::from_le_bytes([bytes[pos], bytes[pos + 1]]) as usize,
            _ => u32::from_le_bytes([
                bytes[pos],
                bytes[pos + 1],
                bytes[pos + 2],
                bytes[pos + 3],
            ]) as usize,
        };
        pos += prefix_len;

        let end = pos.saturating_add(length).min(bytes.len());
        chunks.push(ScriptChunk {
            op,
            data: Some(bytes[pos..end].to_vec()),
            declared_len: Some(length),
        });
        pos = end;
    }

    chunks
}

/// Compute the OP_PUSHDATA prefix bytes for a data payload of the given length.
///
/// Returns the prefix that should be prepended to the data when encoding
/// a push operation into raw script bytes.
///
/// # Arguments
/// * `data_len` - The length of the data to be pushed.
///
/// # Returns
/// A byte vector containing the appropriate prefix, or an error if the data
/// is too large for the protocol.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ParseError> {
    if data_len <= 75 {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xFF {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xFFFF {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if data_len <= 0xFFFFFFFF {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        Ok(buf)
    } else {
        Err(ParseError::DataTooBig)
    }
}
