/// Errors raised while building or decoding a script from text.
///
/// Parsing raw bytes never fails; malformed pushes are kept as chunks and
/// rejected when executed. These errors only cover hex/ASM input and the
/// script builder methods.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// An ASM token is neither a known opcode nor valid hex data.
    #[error("invalid opcode data: {0}")]
    InvalidOpcodeData(String),

    /// Attempted to use `append_opcodes` for a push data opcode.
    #[error("use append_push_data for push data opcodes: {0}")]
    InvalidOpcodeType(String),

    /// Push data exceeds the largest encodable push.
    #[error("data too big")]
    DataTooBig,

    /// A multisig template with an impossible key or signature count.
    #[error("invalid multisig: {required} of {keys}")]
    InvalidMultisig { required: usize, keys: usize },
}

impl From<hex::FromHexError> for ParseError {
    fn from(e: hex::FromHexError) -> Self {
        ParseError::InvalidHex(e.to_string())
    }
}
