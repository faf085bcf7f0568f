/// Bitcoin Script type - a sequence of opcodes and data pushes.
///
/// Scripts are used in transaction inputs (unlocking) and outputs (locking)
/// to define spending conditions. A `Script` holds its parsed chunks and
/// provides methods for construction, classification, serialization, and
/// ASM output.

use std::fmt;

use btc_primitives::hash::hash160;

use crate::chunk::{decode_script, ScriptChunk};
use crate::interpreter::ScriptNumber;
use crate::opcodes::*;
use crate::ParseError;

/// A Bitcoin script, represented as its ordered list of chunks.
#[derive(Clone, Default)]
pub struct Script {
    chunks: Vec<ScriptChunk>,
}

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new empty script.
    pub fn new() -> Self {
        Script { chunks: Vec::new() }
    }

    /// Create a script from raw bytes.
    ///
    /// Never fails: a push that runs past the end of `bytes` is kept as a
    /// malformed chunk and rejected by the interpreter if executed.
    ///
    /// # Arguments
    /// * `bytes` - Raw script bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script {
            chunks: decode_script(bytes),
        }
    }

    /// Create a script from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string (e.g. "76a914...88ac").
    ///
    /// # Returns
    /// The decoded `Script`, or an error if the hex is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, ParseError> {
        Ok(Script::from_bytes(&hex::decode(hex_str)?))
    }

    /// Create a script from a Bitcoin ASM string.
    ///
    /// Parses whitespace-separated tokens where known opcodes (e.g. "OP_DUP")
    /// are emitted directly and hex strings are treated as push data.
    ///
    /// # Arguments
    /// * `asm` - A space-separated ASM string.
    ///
    /// # Returns
    /// A `Script`, or an error if any token is invalid.
    pub fn from_asm(asm: &str) -> Result<Self, ParseError> {
        let mut script = Script::new();
        for section in asm.split_whitespace() {
            if let Some(opcode) = string_to_opcode(section) {
                script.append_opcodes(&[opcode])?;
            } else {
                let data = hex::decode(section)
                    .map_err(|_| ParseError::InvalidOpcodeData(section.to_string()))?;
                script.append_push_data(&data)?;
            }
        }
        Ok(script)
    }

    /// Create a script from already-parsed chunks.
    pub fn from_chunks(chunks: Vec<ScriptChunk>) -> Self {
        Script { chunks }
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// The parsed chunks of this script.
    pub fn chunks(&self) -> &[ScriptChunk] {
        &self.chunks
    }

    /// Serialize the script back to raw bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        for chunk in &self.chunks {
            chunk.write_to(&mut out);
        }
        out
    }

    /// Encode the script as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Convert the script to its ASM (human-readable assembly) representation.
    ///
    /// Each opcode or data push is represented as a space-separated token.
    /// Data pushes appear as their hex encoding; opcodes appear by name.
    pub fn to_asm(&self) -> String {
        self.chunks
            .iter()
            .map(ScriptChunk::to_asm_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Return the serialized length of the script in bytes.
    pub fn len(&self) -> usize {
        self.chunks.iter().map(ScriptChunk::serialized_len).sum()
    }

    /// Check if the script is empty (zero bytes).
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    // -----------------------------------------------------------------------
    // Script classification
    // -----------------------------------------------------------------------

    /// Return true if every chunk is a push: an opcode no greater than `OP_16`.
    ///
    /// `OP_RESERVED` counts as a push here, matching consensus rules.
    pub fn is_push_only(&self) -> bool {
        self.chunks.iter().all(|chunk| chunk.op <= OP_16)
    }

    /// Check if this is a Pay-to-Script-Hash (P2SH) output script.
    ///
    /// Pattern: OP_HASH160 <20 bytes> OP_EQUAL, exactly 23 bytes.
    pub fn is_script_hash_out(&self) -> bool {
        let b = self.to_bytes();
        b.len() == 23 && b[0] == OP_HASH160 && b[1] == OP_DATA_20 && b[22] == OP_EQUAL
    }

    /// Check if this is a Pay-to-Public-Key-Hash (P2PKH) output script.
    ///
    /// Pattern: OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
    pub fn is_public_key_hash_out(&self) -> bool {
        let b = self.to_bytes();
        b.len() == 25
            && b[0] == OP_DUP
            && b[1] == OP_HASH160
            && b[2] == OP_DATA_20
            && b[23] == OP_EQUALVERIFY
            && b[24] == OP_CHECKSIG
    }

    /// Check if this is a bare multisig output script.
    ///
    /// Pattern: OP_M <pubkey1> ... <pubkeyN> OP_N OP_CHECKMULTISIG
    pub fn is_multisig_out(&self) -> bool {
        let parts = &self.chunks;
        if parts.len() < 3 {
            return false;
        }
        if !is_small_int_op(parts[0].op) {
            return false;
        }
        for chunk in &parts[1..parts.len() - 2] {
            match &chunk.data {
                Some(d) if !d.is_empty() && chunk.is_well_formed() => {}
                _ => return false,
            }
        }
        let second_last = &parts[parts.len() - 2];
        let last = &parts[parts.len() - 1];
        is_small_int_op(second_last.op) && last.op == OP_CHECKMULTISIG
    }

    // -----------------------------------------------------------------------
    // Mutation / building
    // -----------------------------------------------------------------------

    /// Append data bytes to the script with the shortest push form for its
    /// length. Empty data is pushed as `OP_0`.
    ///
    /// # Arguments
    /// * `data` - The data bytes to push.
    ///
    /// # Returns
    /// `Ok(())` on success, or an error if the data is too large.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<(), ParseError> {
        self.chunks.push(ScriptChunk::push(data)?);
        Ok(())
    }

    /// Append hex-encoded data to the script with the proper push prefix.
    pub fn append_push_data_hex(&mut self, hex_str: &str) -> Result<(), ParseError> {
        let data = hex::decode(hex_str)
            .map_err(|_| ParseError::InvalidOpcodeData(hex_str.to_string()))?;
        self.append_push_data(&data)
    }

    /// Append raw opcodes to the script.
    ///
    /// Rejects push data opcodes (OP_DATA_1..OP_PUSHDATA4) to prevent misuse.
    /// Use `append_push_data` for those.
    ///
    /// # Arguments
    /// * `opcodes` - Slice of opcode bytes to append.
    ///
    /// # Returns
    /// `Ok(())` on success, or an error if a push data opcode is encountered.
    pub fn append_opcodes(&mut self, opcodes: &[u8]) -> Result<(), ParseError> {
        if let Some(&op) = opcodes
            .iter()
            .find(|&&op| (OP_DATA_1..=OP_PUSHDATA4).contains(&op))
        {
            return Err(ParseError::InvalidOpcodeType(opcode_to_string(op)));
        }
        self.chunks.extend(opcodes.iter().map(|&op| ScriptChunk::opcode(op)));
        Ok(())
    }

    /// Append a single opcode. See [`Script::append_opcodes`].
    pub fn append_opcode(&mut self, op: u8) -> Result<(), ParseError> {
        self.append_opcodes(&[op])
    }

    /// Append a number, using `OP_0`, `OP_1NEGATE` or `OP_1..=OP_16` when the
    /// value has a dedicated opcode and a minimal number push otherwise.
    pub fn append_number(&mut self, n: i64) -> Result<(), ParseError> {
        match n {
            0 => self.append_opcode(OP_0),
            -1 => self.append_opcode(OP_1NEGATE),
            1..=16 => self.append_opcode(OP_1 + n as u8 - 1),
            _ => self.append_push_data(&ScriptNumber::from(n).to_buffer()),
        }
    }

    // -----------------------------------------------------------------------
    // Signature-hash helpers
    // -----------------------------------------------------------------------

    /// A new script holding the chunks from index `from_chunk` onward.
    ///
    /// Used to cut the script at the last executed `OP_CODESEPARATOR`.
    pub fn subscript(&self, from_chunk: usize) -> Script {
        let start = from_chunk.min(self.chunks.len());
        Script::from_chunks(self.chunks[start..].to_vec())
    }

    /// Remove every run of chunks whose serialization equals `needle`.
    ///
    /// Matching is chunk-aligned: a byte pattern that only appears inside a
    /// larger push is left alone.
    pub fn find_and_delete(&mut self, needle: &Script) {
        let width = needle.chunks.len();
        if width == 0 || width > self.chunks.len() {
            return;
        }
        let target = needle.to_bytes();
        let mut kept = Vec::with_capacity(self.chunks.len());
        let mut i = 0;
        while i < self.chunks.len() {
            if i + width <= self.chunks.len()
                && Script::chunks_to_bytes(&self.chunks[i..i + width]) == target
            {
                i += width;
                continue;
            }
            kept.push(self.chunks[i].clone());
            i += 1;
        }
        self.chunks = kept;
    }

    // -----------------------------------------------------------------------
    // Templates
    // -----------------------------------------------------------------------

    /// Build an `m`-of-`n` bare multisig output from the given public keys.
    ///
    /// # Returns
    /// The script `OP_m <key>... OP_n OP_CHECKMULTISIG`, or an error if
    /// `m > n`, no keys are given, or more than 20 keys are given.
    pub fn build_multisig_out(required: usize, pub_keys: &[Vec<u8>]) -> Result<Script, ParseError> {
        let keys = pub_keys.len();
        if keys == 0 || keys > 20 || required > keys {
            return Err(ParseError::InvalidMultisig { required, keys });
        }
        let mut script = Script::new();
        script.append_number(required as i64)?;
        for key in pub_keys {
            script.append_push_data(key)?;
        }
        script.append_number(keys as i64)?;
        script.append_opcode(OP_CHECKMULTISIG)?;
        Ok(script)
    }

    /// Build the P2SH output `OP_HASH160 <hash160(redeem)> OP_EQUAL`.
    pub fn build_script_hash_out(redeem_script: &Script) -> Script {
        let hash = hash160(&redeem_script.to_bytes());
        Script::from_chunks(vec![
            ScriptChunk::opcode(OP_HASH160),
            ScriptChunk {
                op: OP_DATA_20,
                data: Some(hash.to_vec()),
                declared_len: Some(20),
            },
            ScriptChunk::opcode(OP_EQUAL),
        ])
    }

    fn chunks_to_bytes(chunks: &[ScriptChunk]) -> Vec<u8> {
        let mut out = Vec::new();
        for chunk in chunks {
            chunk.write_to(&mut out);
        }
        out
    }
}

impl PartialEq for Script {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for Script {}

impl fmt::Display for Script {
    /// Display the script as ASM.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_asm())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}
