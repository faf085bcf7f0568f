//! Script execution thread: the per-evaluation state and the step loop.

use log::trace;

use crate::chunk::ScriptChunk;
use crate::opcodes::*;
use crate::Script;

use super::config::Config;
use super::error::ScriptError;
use super::flags::ScriptFlags;
use super::ops_crypto::HashType;
use super::scriptnum::ScriptNumber;
use super::stack::Stack;
use super::TxContext;

/// The execution state for one evaluation of one script.
///
/// A thread is built fresh for every evaluation and dropped afterwards; only
/// the main stack is handed back to the caller.
pub(crate) struct Thread<'a> {
    /// The main data stack used during script execution.
    pub(crate) dstack: Stack,
    /// The alternate stack used by OP_TOALTSTACK and OP_FROMALTSTACK.
    pub(crate) astack: Stack,
    /// One entry per open IF; `false` while inside the branch not taken.
    pub(crate) cond_stack: Vec<bool>,
    pub(crate) cfg: Config,
    pub(crate) script: &'a Script,
    /// Index of the next chunk to execute.
    pub(crate) pc: usize,
    /// Running count of non-push opcodes executed (checked against max_ops).
    pub(crate) op_count: usize,
    /// Chunk index just past the most recent OP_CODESEPARATOR.
    pub(crate) code_separator_pc: usize,
    pub(crate) flags: ScriptFlags,
    /// Optional transaction context for signature verification.
    pub(crate) tx_context: Option<&'a dyn TxContext>,
    /// The transaction input index being verified.
    pub(crate) input_idx: usize,
}

impl<'a> Thread<'a> {
    pub(crate) fn new(
        script: &'a Script,
        stack: Stack,
        flags: ScriptFlags,
        cfg: Config,
        tx_context: Option<&'a dyn TxContext>,
        input_idx: usize,
    ) -> Self {
        let verify_minimal_data = flags.has_flag(ScriptFlags::MINIMALDATA);
        Thread {
            dstack: stack,
            astack: Stack::new(cfg.max_script_number_length, verify_minimal_data),
            cond_stack: Vec::new(),
            cfg,
            script,
            pc: 0,
            op_count: 0,
            code_separator_pc: 0,
            flags,
            tx_context,
            input_idx,
        }
    }

    /// Check if a specific script verification flag is set.
    pub(crate) fn has_flag(&self, flag: ScriptFlags) -> bool {
        self.flags.has_flag(flag)
    }

    /// Check if any of the given script verification flags are set.
    pub(crate) fn has_any(&self, flags: &[ScriptFlags]) -> bool {
        self.flags.has_any(flags)
    }

    /// Execute the whole script.
    pub(crate) fn run(&mut self) -> Result<(), ScriptError> {
        let script_size = self.script.len();
        if script_size > self.cfg.max_script_size {
            trace!(
                "script size {} is larger than the max allowed size {}",
                script_size,
                self.cfg.max_script_size
            );
            return Err(ScriptError::ScriptSize);
        }

        while self.pc < self.script.chunks().len() {
            let op = self.script.chunks()[self.pc].op;
            if let Err(e) = self.step() {
                trace!(
                    "{} failed at chunk {}: {}",
                    opcode_to_string(op),
                    self.pc.saturating_sub(1),
                    e
                );
                return Err(e);
            }
        }

        // Stack size check
        let combined = self.dstack.depth() + self.astack.depth();
        if combined > self.cfg.max_stack_size {
            trace!(
                "combined stack size {} > max allowed {}",
                combined,
                self.cfg.max_stack_size
            );
            return Err(ScriptError::StackSize);
        }

        if !self.cond_stack.is_empty() {
            return Err(ScriptError::UnbalancedConditional);
        }
        Ok(())
    }

    /// Execute the chunk at `pc` and advance past it.
    pub(crate) fn step(&mut self) -> Result<(), ScriptError> {
        let script = self.script;
        let chunk = script
            .chunks()
            .get(self.pc)
            .ok_or_else(|| ScriptError::unknown("program counter past end of script"))?;
        self.pc += 1;

        let opcode = Opcode::from_u8(chunk.op);

        // Element size check
        if let Some(ref data) = chunk.data {
            if data.len() > self.cfg.max_script_element_size {
                return Err(ScriptError::PushSize);
            }
        }

        // Count non-push operations
        if chunk.op > OP_16 {
            self.op_count += 1;
            if self.op_count > self.cfg.max_ops {
                return Err(ScriptError::OpCount);
            }
        }

        // Disabled opcodes fail even in an unexecuted branch
        if opcode.is_disabled() {
            return Err(ScriptError::DisabledOpcode);
        }

        let exec = !self.cond_stack.contains(&false);

        if exec && opcode.is_push_data() {
            return self.op_push_data(chunk);
        }
        if exec || opcode.is_conditional() {
            return self.dispatch_opcode(opcode, chunk);
        }
        Ok(())
    }

    fn op_push_data(&mut self, chunk: &ScriptChunk) -> Result<(), ScriptError> {
        if self.has_flag(ScriptFlags::MINIMALDATA) && !chunk.is_minimal_push() {
            return Err(ScriptError::MinimalData);
        }
        if !chunk.is_well_formed() {
            return Err(ScriptError::unknown(
                "length of push value not equal to length of data",
            ));
        }
        self.dstack.push_byte_array(chunk.data.clone().unwrap_or_default());
        Ok(())
    }

    fn dispatch_opcode(&mut self, opcode: Opcode, chunk: &ScriptChunk) -> Result<(), ScriptError> {
        match opcode {
            Opcode::Op0
            | Opcode::PushBytes(_)
            | Opcode::PushData1
            | Opcode::PushData2
            | Opcode::PushData4 => self.op_push_data(chunk),

            Opcode::Op1Negate
            | Opcode::Op1
            | Opcode::Op2
            | Opcode::Op3
            | Opcode::Op4
            | Opcode::Op5
            | Opcode::Op6
            | Opcode::Op7
            | Opcode::Op8
            | Opcode::Op9
            | Opcode::Op10
            | Opcode::Op11
            | Opcode::Op12
            | Opcode::Op13
            | Opcode::Op14
            | Opcode::Op15
            | Opcode::Op16 => {
                let n = i64::from(opcode.to_u8()) - i64::from(OP_1 - 1);
                self.dstack.push_int(&ScriptNumber::from(n));
                Ok(())
            }

            // Flow control
            Opcode::Nop => Ok(()),
            Opcode::Nop1
            | Opcode::Nop2
            | Opcode::Nop3
            | Opcode::Nop4
            | Opcode::Nop5
            | Opcode::Nop6
            | Opcode::Nop7
            | Opcode::Nop8
            | Opcode::Nop9
            | Opcode::Nop10 => self.op_upgradable_nop(opcode),
            Opcode::If => self.op_if(),
            Opcode::NotIf => self.op_notif(),
            Opcode::Else => self.op_else(),
            Opcode::EndIf => self.op_endif(),
            Opcode::Verify => self.op_verify(),
            Opcode::Return => Err(ScriptError::OpReturn),
            Opcode::Reserved
            | Opcode::Ver
            | Opcode::VerIf
            | Opcode::VerNotIf
            | Opcode::Reserved1
            | Opcode::Reserved2
            | Opcode::InvalidOpcode
            | Opcode::Unassigned(_) => self.op_reserved(opcode),

            // Stack ops
            Opcode::ToAltStack => self.op_to_alt_stack(),
            Opcode::FromAltStack => self.op_from_alt_stack(),
            Opcode::TwoDrop => self.dstack.drop_n(2),
            Opcode::TwoDup => self.dstack.dup_n(2),
            Opcode::ThreeDup => self.dstack.dup_n(3),
            Opcode::TwoOver => self.dstack.over_n(2),
            Opcode::TwoRot => self.dstack.rot_n(2),
            Opcode::TwoSwap => self.dstack.swap_n(2),
            Opcode::IfDup => self.op_ifdup(),
            Opcode::Depth => {
                let d = self.dstack.depth() as i64;
                self.dstack.push_int(&ScriptNumber::from(d));
                Ok(())
            }
            Opcode::Drop => self.dstack.drop_n(1),
            Opcode::Dup => self.dstack.dup_n(1),
            Opcode::Nip => self.dstack.nip_n(1).map(drop),
            Opcode::Over => self.dstack.over_n(1),
            Opcode::Pick => self.op_pick(),
            Opcode::Roll => self.op_roll(),
            Opcode::Rot => self.dstack.rot_n(1),
            Opcode::Swap => self.dstack.swap_n(1),
            Opcode::Tuck => self.dstack.tuck(),

            // Splice and bitwise logic
            Opcode::Size => self.op_size(),
            Opcode::Equal => self.op_equal(),
            Opcode::EqualVerify => self.op_equalverify(),

            // Arithmetic
            Opcode::OneAdd => self.op_unary_int(|m| m + ScriptNumber::from(1)),
            Opcode::OneSub => self.op_unary_int(|m| m - ScriptNumber::from(1)),
            Opcode::Negate => self.op_unary_int(|m| -m),
            Opcode::Abs => self.op_unary_int(|m| m.abs()),
            Opcode::Not => self.op_unary_int(|m| ScriptNumber::from(m.is_zero())),
            Opcode::ZeroNotEqual => self.op_unary_int(|m| ScriptNumber::from(!m.is_zero())),
            Opcode::Add => self.op_binary_int(|a, b| a + b),
            Opcode::Sub => self.op_binary_int(|a, b| a - b),
            Opcode::BoolAnd => self.op_bool_binop(|a, b| !a.is_zero() && !b.is_zero()),
            Opcode::BoolOr => self.op_bool_binop(|a, b| !a.is_zero() || !b.is_zero()),
            Opcode::NumEqual => self.op_bool_binop(|a, b| a == b),
            Opcode::NumEqualVerify => self.op_numequalverify(),
            Opcode::NumNotEqual => self.op_bool_binop(|a, b| a != b),
            Opcode::LessThan => self.op_bool_binop(|a, b| a < b),
            Opcode::GreaterThan => self.op_bool_binop(|a, b| a > b),
            Opcode::LessThanOrEqual => self.op_bool_binop(|a, b| a <= b),
            Opcode::GreaterThanOrEqual => self.op_bool_binop(|a, b| a >= b),
            Opcode::Min => self.op_binary_int(|a, b| a.min(b)),
            Opcode::Max => self.op_binary_int(|a, b| a.max(b)),
            Opcode::Within => self.op_within(),

            // Crypto
            Opcode::Ripemd160 => self.op_hash(HashType::Ripemd160),
            Opcode::Sha1 => self.op_hash(HashType::Sha1),
            Opcode::Sha256 => self.op_hash(HashType::Sha256),
            Opcode::Hash160 => self.op_hash(HashType::Hash160),
            Opcode::Hash256 => self.op_hash(HashType::Hash256),
            Opcode::CodeSeparator => {
                self.code_separator_pc = self.pc;
                Ok(())
            }
            Opcode::CheckSig => self.op_checksig(),
            Opcode::CheckSigVerify => self.op_checksigverify(),
            Opcode::CheckMultiSig => self.op_checkmultisig(),
            Opcode::CheckMultiSigVerify => self.op_checkmultisigverify(),

            // Rejected by `step` before dispatch
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
            | Opcode::RShift => Err(ScriptError::DisabledOpcode),
        }
    }
}
