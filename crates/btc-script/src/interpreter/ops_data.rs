//! Data operations for the script interpreter.

use super::error::ScriptError;
use super::scriptnum::ScriptNumber;
use super::thread::Thread;

impl<'a> Thread<'a> {
    pub(crate) fn op_size(&mut self) -> Result<(), ScriptError> {
        let len = self.dstack.peek_byte_array(0)?.len();
        self.dstack.push_int(&ScriptNumber::from(len as i64));
        Ok(())
    }

    pub(crate) fn op_equal(&mut self) -> Result<(), ScriptError> {
        self.dstack.require(2)?;
        let a = self.dstack.pop_byte_array()?;
        let b = self.dstack.pop_byte_array()?;
        self.dstack.push_bool(a == b);
        Ok(())
    }

    pub(crate) fn op_equalverify(&mut self) -> Result<(), ScriptError> {
        self.op_equal()?;
        self.abstract_verify(ScriptError::EqualVerify)
    }
}
