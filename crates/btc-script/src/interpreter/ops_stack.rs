//! Stack manipulation operations for the script interpreter.

use super::error::ScriptError;
use super::stack::cast_to_bool;
use super::thread::Thread;

impl<'a> Thread<'a> {
    pub(crate) fn op_to_alt_stack(&mut self) -> Result<(), ScriptError> {
        let data = self.dstack.pop_byte_array()?;
        self.astack.push_byte_array(data);
        Ok(())
    }

    pub(crate) fn op_from_alt_stack(&mut self) -> Result<(), ScriptError> {
        let data = self
            .astack
            .pop_byte_array()
            .map_err(|_| ScriptError::InvalidAltstackOperation)?;
        self.dstack.push_byte_array(data);
        Ok(())
    }

    pub(crate) fn op_ifdup(&mut self) -> Result<(), ScriptError> {
        let so = self.dstack.peek_byte_array(0)?;
        if cast_to_bool(so) {
            self.dstack.dup_n(1)?;
        }
        Ok(())
    }

    /// Pop the depth operand for OP_PICK/OP_ROLL and check it addresses an
    /// item that is still on the stack.
    fn pop_depth_operand(&mut self) -> Result<usize, ScriptError> {
        self.dstack.require(2)?;
        let n = self.dstack.pop_int()?.to_i32();
        if n < 0 || n as usize >= self.dstack.depth() {
            return Err(ScriptError::InvalidStackOperation);
        }
        Ok(n as usize)
    }

    pub(crate) fn op_pick(&mut self) -> Result<(), ScriptError> {
        let n = self.pop_depth_operand()?;
        self.dstack.pick_n(n)
    }

    pub(crate) fn op_roll(&mut self) -> Result<(), ScriptError> {
        let n = self.pop_depth_operand()?;
        self.dstack.roll_n(n)
    }
}
