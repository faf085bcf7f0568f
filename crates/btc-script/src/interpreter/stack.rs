//! Script execution stack.

use super::error::ScriptError;
use super::scriptnum::ScriptNumber;

/// Convert byte array to boolean (Bitcoin consensus rules).
///
/// Any nonzero byte makes the value true, except that a sign bit alone in
/// the last byte is negative zero and therefore false.
pub fn cast_to_bool(t: &[u8]) -> bool {
    for i in 0..t.len() {
        if t[i] != 0 {
            // Negative 0 is also considered false
            if i == t.len() - 1 && t[i] == 0x80 {
                return false;
            }
            return true;
        }
    }
    false
}

/// Convert boolean to byte array.
pub fn from_bool(v: bool) -> Vec<u8> {
    if v {
        vec![1]
    } else {
        vec![]
    }
}

/// Interpret a stack element as a numeric operand.
pub fn as_script_number(
    t: &[u8],
    max_num_length: usize,
    require_minimal: bool,
) -> Result<ScriptNumber, ScriptError> {
    ScriptNumber::from_bytes(t, max_num_length, require_minimal)
}

/// The main data/alt stack used by the script interpreter.
///
/// Index arguments count from the top: `0` is the topmost element.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    stk: Vec<Vec<u8>>,
    max_num_length: usize,
    verify_minimal_data: bool,
}

impl Stack {
    pub fn new(max_num_length: usize, verify_minimal_data: bool) -> Self {
        Stack {
            stk: Vec::new(),
            max_num_length,
            verify_minimal_data,
        }
    }

    pub fn depth(&self) -> usize {
        self.stk.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stk.is_empty()
    }

    /// Fail with `InvalidStackOperation` unless at least `n` items are present.
    pub fn require(&self, n: usize) -> Result<(), ScriptError> {
        if self.stk.len() < n {
            return Err(ScriptError::InvalidStackOperation);
        }
        Ok(())
    }

    pub fn push_byte_array(&mut self, data: Vec<u8>) {
        self.stk.push(data);
    }

    pub fn push_int(&mut self, n: &ScriptNumber) {
        self.push_byte_array(n.to_buffer());
    }

    pub fn push_bool(&mut self, val: bool) {
        self.push_byte_array(from_bool(val));
    }

    pub fn pop_byte_array(&mut self) -> Result<Vec<u8>, ScriptError> {
        self.stk.pop().ok_or(ScriptError::InvalidStackOperation)
    }

    pub fn pop_int(&mut self) -> Result<ScriptNumber, ScriptError> {
        let n = self.peek_int(0)?;
        self.stk.pop();
        Ok(n)
    }

    pub fn pop_bool(&mut self) -> Result<bool, ScriptError> {
        let data = self.pop_byte_array()?;
        Ok(cast_to_bool(&data))
    }

    pub fn peek_byte_array(&self, idx: usize) -> Result<&[u8], ScriptError> {
        let sz = self.stk.len();
        if idx >= sz {
            return Err(ScriptError::InvalidStackOperation);
        }
        Ok(&self.stk[sz - idx - 1])
    }

    pub fn peek_int(&self, idx: usize) -> Result<ScriptNumber, ScriptError> {
        let data = self.peek_byte_array(idx)?;
        as_script_number(data, self.max_num_length, self.verify_minimal_data)
    }

    pub fn peek_bool(&self, idx: usize) -> Result<bool, ScriptError> {
        Ok(cast_to_bool(self.peek_byte_array(idx)?))
    }

    /// Remove and return the item `idx` places below the top.
    pub fn nip_n(&mut self, idx: usize) -> Result<Vec<u8>, ScriptError> {
        let sz = self.stk.len();
        if idx >= sz {
            return Err(ScriptError::InvalidStackOperation);
        }
        Ok(self.stk.remove(sz - idx - 1))
    }

    /// `x1 x2 -> x2 x1 x2`
    pub fn tuck(&mut self) -> Result<(), ScriptError> {
        self.require(2)?;
        let top = self.stk[self.stk.len() - 1].clone();
        self.stk.insert(self.stk.len() - 2, top);
        Ok(())
    }

    pub fn drop_n(&mut self, n: usize) -> Result<(), ScriptError> {
        self.require(n)?;
        self.stk.truncate(self.stk.len() - n);
        Ok(())
    }

    /// Duplicate the top `n` items, preserving their order.
    pub fn dup_n(&mut self, n: usize) -> Result<(), ScriptError> {
        self.require(n)?;
        let start = self.stk.len() - n;
        self.stk.extend_from_within(start..);
        Ok(())
    }

    /// Move the `n` items sitting below the top `2n` to the top.
    pub fn rot_n(&mut self, n: usize) -> Result<(), ScriptError> {
        self.require(3 * n)?;
        let entry = 3 * n - 1;
        for _ in 0..n {
            let so = self.nip_n(entry)?;
            self.push_byte_array(so);
        }
        Ok(())
    }

    /// Swap the top `n` items with the `n` items below them.
    pub fn swap_n(&mut self, n: usize) -> Result<(), ScriptError> {
        self.require(2 * n)?;
        let entry = 2 * n - 1;
        for _ in 0..n {
            let so = self.nip_n(entry)?;
            self.push_byte_array(so);
        }
        Ok(())
    }

    /// Copy the `n` items below the top `n` to the top.
    pub fn over_n(&mut self, n: usize) -> Result<(), ScriptError> {
        self.require(2 * n)?;
        let entry = 2 * n - 1;
        for _ in 0..n {
            let so = self.peek_byte_array(entry)?.to_vec();
            self.push_byte_array(so);
        }
        Ok(())
    }

    pub fn pick_n(&mut self, n: usize) -> Result<(), ScriptError> {
        let so = self.peek_byte_array(n)?.to_vec();
        self.push_byte_array(so);
        Ok(())
    }

    pub fn roll_n(&mut self, n: usize) -> Result<(), ScriptError> {
        let so = self.nip_n(n)?;
        self.push_byte_array(so);
        Ok(())
    }

    /// Stack contents, bottom to top.
    pub fn items(&self) -> &[Vec<u8>] {
        &self.stk
    }

    /// Set stack contents from array (last = top).
    pub fn set_stack(&mut self, data: Vec<Vec<u8>>) {
        self.stk = data;
    }

    pub fn into_vec(self) -> Vec<Vec<u8>> {
        self.stk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(items: &[&[u8]]) -> Stack {
        let mut s = Stack::new(4, false);
        s.set_stack(items.iter().map(|i| i.to_vec()).collect());
        s
    }

    #[test]
    fn test_cast_to_bool() {
        assert!(!cast_to_bool(&[]));
        assert!(!cast_to_bool(&[0x00]));
        assert!(!cast_to_bool(&[0x80])); // negative zero
        assert!(cast_to_bool(&[0x01]));
        assert!(cast_to_bool(&[0x00, 0x01]));
        assert!(!cast_to_bool(&[0x00, 0x00]));
        assert!(!cast_to_bool(&[0x00, 0x80])); // negative zero
        assert!(cast_to_bool(&[0x01, 0x80]));
        assert!(cast_to_bool(&[0x80, 0x00]));
    }

    #[test]
    fn test_stack_basic_ops() {
        let mut s = stack_of(&[&[1, 2, 3], &[4, 5]]);
        assert_eq!(s.depth(), 2);
        assert_eq!(s.pop_byte_array().unwrap(), vec![4, 5]);
        assert_eq!(s.depth(), 1);
        assert_eq!(s.peek_byte_array(0).unwrap(), &[1, 2, 3]);
        assert_eq!(s.peek_byte_array(1), Err(ScriptError::InvalidStackOperation));
    }

    #[test]
    fn test_stack_dup() {
        let mut s = stack_of(&[&[1], &[2]]);
        s.dup_n(2).unwrap();
        assert_eq!(s.items(), &[vec![1], vec![2], vec![1], vec![2]]);
        assert_eq!(s.dup_n(5), Err(ScriptError::InvalidStackOperation));
    }

    #[test]
    fn test_stack_swap_rot_over_tuck() {
        let mut s = stack_of(&[&[1], &[2]]);
        s.swap_n(1).unwrap();
        assert_eq!(s.items(), &[vec![2], vec![1]]);

        let mut s = stack_of(&[&[1], &[2], &[3]]);
        s.rot_n(1).unwrap();
        assert_eq!(s.items(), &[vec![2], vec![3], vec![1]]);

        let mut s = stack_of(&[&[1], &[2], &[3], &[4], &[5], &[6]]);
        s.rot_n(2).unwrap();
        assert_eq!(s.items(), &[vec![3], vec![4], vec![5], vec![6], vec![1], vec![2]]);

        let mut s = stack_of(&[&[1], &[2], &[3], &[4]]);
        s.over_n(2).unwrap();
        assert_eq!(s.items(), &[vec![1], vec![2], vec![3], vec![4], vec![1], vec![2]]);

        let mut s = stack_of(&[&[1], &[2]]);
        s.tuck().unwrap();
        assert_eq!(s.items(), &[vec![2], vec![1], vec![2]]);
    }

    /// Underflowing helpers leave the stack untouched.
    #[test]
    fn test_underflow_is_checked_first() {
        let mut s = stack_of(&[&[1]]);
        assert_eq!(s.swap_n(1), Err(ScriptError::InvalidStackOperation));
        assert_eq!(s.drop_n(2), Err(ScriptError::InvalidStackOperation));
        assert_eq!(s.tuck(), Err(ScriptError::InvalidStackOperation));
        assert_eq!(s.items(), &[vec![1]]);
    }

    #[test]
    fn test_pick_roll() {
        let mut s = stack_of(&[&[1], &[2], &[3]]);
        s.pick_n(2).unwrap();
        assert_eq!(s.items(), &[vec![1], vec![2], vec![3], vec![1]]);
        s.roll_n(2).unwrap();
        assert_eq!(s.items(), &[vec![1], vec![3], vec![1], vec![2]]);
    }

    #[test]
    fn test_pop_int_respects_limits() {
        let mut s = Stack::new(4, true);
        s.push_byte_array(vec![0x01, 0x00]);
        assert_eq!(s.pop_int(), Err(ScriptError::MinimalData));
        // failed decode does not consume the element
        assert_eq!(s.depth(), 1);

        let mut s = Stack::new(4, false);
        s.push_byte_array(vec![0xff; 5]);
        assert!(matches!(s.pop_int(), Err(ScriptError::UnknownError(_))));
        s.push_int(&ScriptNumber::from(-5));
        assert_eq!(s.pop_int().unwrap(), ScriptNumber::from(-5));
    }
}
