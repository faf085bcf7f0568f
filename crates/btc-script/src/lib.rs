/// Bitcoin script parsing and evaluation.
///
/// Provides the Script type, opcode definitions, script chunk parsing,
/// and a consensus-compatible interpreter with P2SH verification.

pub mod opcodes;
pub mod chunk;
pub mod script;
pub mod interpreter;

mod error;
pub use error::ParseError;
pub use script::Script;
pub use chunk::ScriptChunk;
pub use opcodes::Opcode;
pub use interpreter::{verify, Interpreter, ScriptError, ScriptFlags, TxContext};
