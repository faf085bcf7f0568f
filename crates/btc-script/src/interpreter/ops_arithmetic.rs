//! Arithmetic operations for the script interpreter.
//!
//! Operands are decoded in place before anything is popped, so an operand
//! that fails to decode leaves the stack as it was.

use super::error::ScriptError;
use super::scriptnum::ScriptNumber;
use super::thread::Thread;

impl<'a> Thread<'a> {
    pub(crate) fn op_unary_int(
        &mut self,
        f: impl FnOnce(ScriptNumber) -> ScriptNumber,
    ) -> Result<(), ScriptError> {
        self.dstack.require(1)?;
        let m = self.dstack.peek_int(0)?;
        self.dstack.drop_n(1)?;
        self.dstack.push_int(&f(m));
        Ok(())
    }

    /// Decode the top two items as `(second, top)` and pop them.
    fn pop_operand_pair(&mut self) -> Result<(ScriptNumber, ScriptNumber), ScriptError> {
        self.dstack.require(2)?;
        let bn1 = self.dstack.peek_int(1)?;
        let bn2 = self.dstack.peek_int(0)?;
        self.dstack.drop_n(2)?;
        Ok((bn1, bn2))
    }

    pub(crate) fn op_binary_int(
        &mut self,
        f: impl FnOnce(ScriptNumber, ScriptNumber) -> ScriptNumber,
    ) -> Result<(), ScriptError> {
        let (bn1, bn2) = self.pop_operand_pair()?;
        self.dstack.push_int(&f(bn1, bn2));
        Ok(())
    }

    pub(crate) fn op_bool_binop(
        &mut self,
        f: impl FnOnce(&ScriptNumber, &ScriptNumber) -> bool,
    ) -> Result<(), ScriptError> {
        let (bn1, bn2) = self.pop_operand_pair()?;
        self.dstack.push_int(&ScriptNumber::from(f(&bn1, &bn2)));
        Ok(())
    }

    pub(crate) fn op_numequalverify(&mut self) -> Result<(), ScriptError> {
        self.op_bool_binop(|a, b| a == b)?;
        self.abstract_verify(ScriptError::NumEqualVerify)
    }

    /// `x min max -> (min <= x < max)`
    pub(crate) fn op_within(&mut self) -> Result<(), ScriptError> {
        self.dstack.require(3)?;
        let x = self.dstack.peek_int(2)?;
        let min_val = self.dstack.peek_int(1)?;
        let max_val = self.dstack.peek_int(0)?;
        self.dstack.drop_n(3)?;
        self.dstack
            .push_int(&ScriptNumber::from(min_val <= x && x < max_val));
        Ok(())
    }
}
