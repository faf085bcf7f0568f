//! Bitcoin script interpreter.
//!
//! Executes unlocking and locking scripts to verify transaction inputs,
//! including pay-to-script-hash redemption.
//!
//! # Architecture
//!
//! The interpreter never sees a transaction. Callers provide a [`TxContext`]
//! implementation that computes the signature hash for an input and checks a
//! signature against it.
//!
//! # Example
//!
//! ```ignore
//! use btc_script::interpreter::{verify, ScriptFlags};
//!
//! verify(
//!     &script_sig,
//!     &script_pubkey,
//!     Some(&tx),
//!     0,
//!     ScriptFlags::P2SH | ScriptFlags::STRICTENC,
//! )?;
//! ```

pub mod config;
pub mod error;
pub mod flags;
pub mod scriptnum;
pub mod stack;

mod ops_arithmetic;
mod ops_crypto;
mod ops_data;
mod ops_flow;
mod ops_stack;
mod thread;

pub use config::Config;
pub use error::ScriptError;
pub use flags::ScriptFlags;
pub use scriptnum::ScriptNumber;
pub use stack::{as_script_number, cast_to_bool, Stack};

use std::panic::{self, AssertUnwindSafe};

use btc_primitives::PrimitivesError;
use log::{debug, trace};

use crate::Script;
use thread::Thread;

/// Signature verification supplied by the transaction layer.
pub trait TxContext {
    /// Check `sig` (DER plus trailing sighash byte) against `pub_key` for the
    /// input at `input_index`, hashing `subscript` as the script code.
    ///
    /// `Ok(false)` and `Err(_)` are both treated as an invalid signature.
    fn verify_signature(
        &self,
        sig: &[u8],
        pub_key: &[u8],
        input_index: usize,
        subscript: &Script,
    ) -> Result<bool, PrimitivesError>;
}

/// Evaluates a single script against a stack.
///
/// Each call to [`evaluate`](Interpreter::evaluate) starts with a fresh
/// program counter, op count, condition stack and alt stack. The main stack
/// carries over, which is how [`verify`] threads results between phases.
pub struct Interpreter<'s> {
    script: &'s Script,
    flags: ScriptFlags,
    cfg: Config,
    stack: Stack,
    alt_stack: Stack,
}

impl<'s> Interpreter<'s> {
    pub fn new(script: &'s Script, flags: ScriptFlags) -> Self {
        let cfg = Config::default();
        Interpreter {
            script,
            flags,
            cfg,
            stack: new_stack(&cfg, flags),
            alt_stack: new_stack(&cfg, flags),
        }
    }

    /// Replace the execution limits.
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        let items = std::mem::take(&mut self.stack).into_vec();
        self.stack = self.restack(items);
        self
    }

    /// Set the starting stack (last element is the top).
    pub fn with_stack(mut self, items: Vec<Vec<u8>>) -> Self {
        self.stack = self.restack(items);
        self
    }

    fn restack(&self, items: Vec<Vec<u8>>) -> Stack {
        let mut stack = new_stack(&self.cfg, self.flags);
        stack.set_stack(items);
        stack
    }

    /// Run the script to completion.
    ///
    /// A panic inside the run is reported as `UnknownError` and leaves both
    /// stacks empty. The process panic hook still runs before the unwind is
    /// caught, so the default hook prints the panic to stderr; callers that
    /// need silent evaluation should install their own hook with
    /// [`std::panic::set_hook`].
    pub fn evaluate(
        &mut self,
        tx: Option<&dyn TxContext>,
        input_index: usize,
    ) -> Result<(), ScriptError> {
        let stack = std::mem::replace(&mut self.stack, new_stack(&self.cfg, self.flags));
        let script = self.script;
        let flags = self.flags;
        let cfg = self.cfg;

        let outcome = panic::catch_unwind(AssertUnwindSafe(move || {
            let mut thread = Thread::new(script, stack, flags, cfg, tx, input_index);
            let result = thread.run();
            (result, thread.dstack, thread.astack)
        }));

        match outcome {
            Ok((result, dstack, astack)) => {
                self.stack = dstack;
                self.alt_stack = astack;
                result
            }
            Err(payload) => {
                self.alt_stack = new_stack(&self.cfg, self.flags);
                let detail = panic_detail(payload.as_ref());
                debug!("script evaluation panicked: {}", detail);
                Err(ScriptError::unknown(detail))
            }
        }
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn alt_stack(&self) -> &Stack {
        &self.alt_stack
    }

    /// Move the main stack out of the interpreter.
    pub fn into_stack(self) -> Vec<Vec<u8>> {
        self.stack.into_vec()
    }
}

fn new_stack(cfg: &Config, flags: ScriptFlags) -> Stack {
    Stack::new(
        cfg.max_script_number_length,
        flags.has_flag(ScriptFlags::MINIMALDATA),
    )
}

fn panic_detail(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic during script evaluation".to_string()
    }
}

/// Verify that `script_sig` satisfies `script_pubkey`.
///
/// With [`ScriptFlags::P2SH`] set and a script-hash `script_pubkey`, the last
/// item pushed by `script_sig` is also run as the redeem script against the
/// rest of the items `script_sig` pushed.
pub fn verify(
    script_sig: &Script,
    script_pubkey: &Script,
    tx: Option<&dyn TxContext>,
    input_index: usize,
    flags: ScriptFlags,
) -> Result<(), ScriptError> {
    if flags.has_flag(ScriptFlags::SIGPUSHONLY) && !script_sig.is_push_only() {
        return Err(ScriptError::SigPushOnly);
    }

    trace!("evaluating scriptSig for input {}", input_index);
    let mut sig_phase = Interpreter::new(script_sig, flags);
    sig_phase.evaluate(tx, input_index)?;
    let stack = sig_phase.into_stack();

    let stack_copy = if flags.has_flag(ScriptFlags::P2SH) {
        Some(stack.clone())
    } else {
        None
    };

    trace!("evaluating scriptPubKey for input {}", input_index);
    let mut pubkey_phase = Interpreter::new(script_pubkey, flags).with_stack(stack);
    pubkey_phase.evaluate(tx, input_index)?;
    if pubkey_phase.stack().is_empty() {
        return Err(ScriptError::EvalFalseNoResult);
    }
    if !pubkey_phase.stack().peek_bool(0)? {
        return Err(ScriptError::EvalFalseInStack);
    }

    if let Some(mut stack_copy) = stack_copy {
        if script_pubkey.is_script_hash_out() {
            if !script_sig.is_push_only() {
                return Err(ScriptError::SigPushOnly);
            }

            let serialized = stack_copy
                .pop()
                .ok_or_else(|| ScriptError::unknown("missing P2SH redeem script"))?;
            let redeem_script = Script::from_bytes(&serialized);

            trace!("evaluating redeem script for input {}", input_index);
            let mut redeem_phase = Interpreter::new(&redeem_script, flags).with_stack(stack_copy);
            redeem_phase.evaluate(tx, input_index)?;
            if redeem_phase.stack().is_empty() {
                return Err(ScriptError::EvalFalseNoP2shStack);
            }
            if !redeem_phase.stack().peek_bool(0)? {
                return Err(ScriptError::EvalFalseInP2shStack);
            }
        }
    }

    debug!("input {} verified", input_index);
    Ok(())
}
