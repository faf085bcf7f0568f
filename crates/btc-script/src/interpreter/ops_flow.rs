//! Flow control operations for the script interpreter.

use crate::opcodes::Opcode;

use super::error::ScriptError;
use super::flags::ScriptFlags;
use super::thread::Thread;

impl<'a> Thread<'a> {
    pub(crate) fn op_reserved(&self, opcode: Opcode) -> Result<(), ScriptError> {
        log::trace!("attempt to execute reserved opcode {}", opcode);
        Err(ScriptError::BadOpcode)
    }

    pub(crate) fn op_upgradable_nop(&self, opcode: Opcode) -> Result<(), ScriptError> {
        if self.has_flag(ScriptFlags::DISCOURAGE_UPGRADABLE_NOPS) {
            log::trace!("{} reserved for soft-fork upgrades", opcode);
            return Err(ScriptError::DiscourageUpgradableNops);
        }
        Ok(())
    }

    /// Push the branch condition for OP_IF/OP_NOTIF. Inside a branch that is
    /// not executing nothing is popped and the new branch is skipped too.
    fn push_condition(&mut self, invert: bool) -> Result<(), ScriptError> {
        let mut value = false;
        if !self.cond_stack.contains(&false) {
            if self.dstack.is_empty() {
                return Err(ScriptError::UnbalancedConditional);
            }
            value = self.dstack.pop_bool()? != invert;
        }
        self.cond_stack.push(value);
        Ok(())
    }

    pub(crate) fn op_if(&mut self) -> Result<(), ScriptError> {
        self.push_condition(false)
    }

    pub(crate) fn op_notif(&mut self) -> Result<(), ScriptError> {
        self.push_condition(true)
    }

    pub(crate) fn op_else(&mut self) -> Result<(), ScriptError> {
        match self.cond_stack.last_mut() {
            Some(top) => {
                *top = !*top;
                Ok(())
            }
            None => Err(ScriptError::UnbalancedConditional),
        }
    }

    pub(crate) fn op_endif(&mut self) -> Result<(), ScriptError> {
        self.cond_stack
            .pop()
            .map(drop)
            .ok_or(ScriptError::UnbalancedConditional)
    }

    pub(crate) fn op_verify(&mut self) -> Result<(), ScriptError> {
        self.abstract_verify(ScriptError::Verify)
    }

    /// Pop the top item if it is true; otherwise fail with `code` and leave
    /// it in place.
    pub(crate) fn abstract_verify(&mut self, code: ScriptError) -> Result<(), ScriptError> {
        if !self.dstack.peek_bool(0)? {
            return Err(code);
        }
        self.dstack.pop_byte_array()?;
        Ok(())
    }
}
