//! Interpreter error type with the canonical `SCRIPT_ERR_*` identifiers.

/// Why a script failed to evaluate or verify.
///
/// `Display` renders the canonical `SCRIPT_ERR_*` identifier so that results
/// can be compared across implementations by error code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    // resource limits
    #[error("SCRIPT_ERR_SCRIPT_SIZE")]
    ScriptSize,
    #[error("SCRIPT_ERR_PUSH_SIZE")]
    PushSize,
    #[error("SCRIPT_ERR_OP_COUNT")]
    OpCount,
    #[error("SCRIPT_ERR_STACK_SIZE")]
    StackSize,

    // structure and encoding
    #[error("SCRIPT_ERR_UNDEFINED_OPCODE")]
    UndefinedOpcode,
    #[error("SCRIPT_ERR_BAD_OPCODE")]
    BadOpcode,
    #[error("SCRIPT_ERR_MINIMALDATA")]
    MinimalData,
    #[error("SCRIPT_ERR_UNBALANCED_CONDITIONAL")]
    UnbalancedConditional,
    #[error("SCRIPT_ERR_DISABLED_OPCODE")]
    DisabledOpcode,

    // stack discipline
    #[error("SCRIPT_ERR_INVALID_STACK_OPERATION")]
    InvalidStackOperation,
    #[error("SCRIPT_ERR_INVALID_ALTSTACK_OPERATION")]
    InvalidAltstackOperation,

    // assertions
    #[error("SCRIPT_ERR_VERIFY")]
    Verify,
    #[error("SCRIPT_ERR_EQUALVERIFY")]
    EqualVerify,
    #[error("SCRIPT_ERR_NUMEQUALVERIFY")]
    NumEqualVerify,
    #[error("SCRIPT_ERR_CHECKSIGVERIFY")]
    CheckSigVerify,
    #[error("SCRIPT_ERR_CHECKMULTISIGVERIFY")]
    CheckMultisigVerify,
    #[error("SCRIPT_ERR_OP_RETURN")]
    OpReturn,

    // signature and key encoding
    #[error("SCRIPT_ERR_SIG_DER_INVALID_FORMAT")]
    SigDerInvalidFormat,
    #[error("SCRIPT_ERR_SIG_DER_HIGH_S")]
    SigDerHighS,
    #[error("SCRIPT_ERR_SIG_HASHTYPE")]
    SigHashtype,
    #[error("SCRIPT_ERR_PUBKEYTYPE")]
    PubkeyType,
    #[error("SCRIPT_ERR_SIG_NULLDUMMY")]
    SigNullDummy,

    // multisig bounds
    #[error("SCRIPT_ERR_PUBKEY_COUNT")]
    PubkeyCount,
    #[error("SCRIPT_ERR_SIG_COUNT")]
    SigCount,

    // policy
    #[error("SCRIPT_ERR_DISCOURAGE_UPGRADABLE_NOPS")]
    DiscourageUpgradableNops,
    #[error("SCRIPT_ERR_SIG_PUSHONLY")]
    SigPushOnly,

    // verdicts
    #[error("SCRIPT_ERR_EVAL_FALSE_NO_RESULT")]
    EvalFalseNoResult,
    #[error("SCRIPT_ERR_EVAL_FALSE_IN_STACK")]
    EvalFalseInStack,
    #[error("SCRIPT_ERR_EVAL_FALSE_NO_P2SH_STACK")]
    EvalFalseNoP2shStack,
    #[error("SCRIPT_ERR_EVAL_FALSE_IN_P2SH_STACK")]
    EvalFalseInP2shStack,

    #[error("SCRIPT_ERR_UNKNOWN_ERROR: {0}")]
    UnknownError(String),
}

impl ScriptError {
    /// The canonical `SCRIPT_ERR_*` identifier, without any detail text.
    pub fn code(&self) -> &'static str {
        match self {
            ScriptError::ScriptSize => "SCRIPT_ERR_SCRIPT_SIZE",
            ScriptError::PushSize => "SCRIPT_ERR_PUSH_SIZE",
            ScriptError::OpCount => "SCRIPT_ERR_OP_COUNT",
            ScriptError::StackSize => "SCRIPT_ERR_STACK_SIZE",
            ScriptError::UndefinedOpcode => "SCRIPT_ERR_UNDEFINED_OPCODE",
            ScriptError::BadOpcode => "SCRIPT_ERR_BAD_OPCODE",
            ScriptError::MinimalData => "SCRIPT_ERR_MINIMALDATA",
            ScriptError::UnbalancedConditional => "SCRIPT_ERR_UNBALANCED_CONDITIONAL",
            ScriptError::DisabledOpcode => "SCRIPT_ERR_DISABLED_OPCODE",
            ScriptError::InvalidStackOperation => "SCRIPT_ERR_INVALID_STACK_OPERATION",
            ScriptError::InvalidAltstackOperation => "SCRIPT_ERR_INVALID_ALTSTACK_OPERATION",
            ScriptError::Verify => "SCRIPT_ERR_VERIFY",
            ScriptError::EqualVerify => "SCRIPT_ERR_EQUALVERIFY",
            ScriptError::NumEqualVerify => "SCRIPT_ERR_NUMEQUALVERIFY",
            ScriptError::CheckSigVerify => "SCRIPT_ERR_CHECKSIGVERIFY",
            ScriptError::CheckMultisigVerify => "SCRIPT_ERR_CHECKMULTISIGVERIFY",
            ScriptError::OpReturn => "SCRIPT_ERR_OP_RETURN",
            ScriptError::SigDerInvalidFormat => "SCRIPT_ERR_SIG_DER_INVALID_FORMAT",
            ScriptError::SigDerHighS => "SCRIPT_ERR_SIG_DER_HIGH_S",
            ScriptError::SigHashtype => "SCRIPT_ERR_SIG_HASHTYPE",
            ScriptError::PubkeyType => "SCRIPT_ERR_PUBKEYTYPE",
            ScriptError::SigNullDummy => "SCRIPT_ERR_SIG_NULLDUMMY",
            ScriptError::PubkeyCount => "SCRIPT_ERR_PUBKEY_COUNT",
            ScriptError::SigCount => "SCRIPT_ERR_SIG_COUNT",
            ScriptError::DiscourageUpgradableNops => "SCRIPT_ERR_DISCOURAGE_UPGRADABLE_NOPS",
            ScriptError::SigPushOnly => "SCRIPT_ERR_SIG_PUSHONLY",
            ScriptError::EvalFalseNoResult => "SCRIPT_ERR_EVAL_FALSE_NO_RESULT",
            ScriptError::EvalFalseInStack => "SCRIPT_ERR_EVAL_FALSE_IN_STACK",
            ScriptError::EvalFalseNoP2shStack => "SCRIPT_ERR_EVAL_FALSE_NO_P2SH_STACK",
            ScriptError::EvalFalseInP2shStack => "SCRIPT_ERR_EVAL_FALSE_IN_P2SH_STACK",
            ScriptError::UnknownError(_) => "SCRIPT_ERR_UNKNOWN_ERROR",
        }
    }

    pub(crate) fn unknown(detail: impl Into<String>) -> Self {
        ScriptError::UnknownError(detail.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_code() {
        let all = [
            ScriptError::ScriptSize,
            ScriptError::PushSize,
            ScriptError::MinimalData,
            ScriptError::InvalidAltstackOperation,
            ScriptError::CheckMultisigVerify,
            ScriptError::SigDerHighS,
            ScriptError::PubkeyType,
            ScriptError::DiscourageUpgradableNops,
            ScriptError::EvalFalseInP2shStack,
        ];
        for err in &all {
            assert_eq!(err.to_string(), err.code());
        }
    }

    #[test]
    fn test_unknown_error_carries_detail() {
        let err = ScriptError::unknown("script number overflow");
        assert_eq!(err.code(), "SCRIPT_ERR_UNKNOWN_ERROR");
        assert_eq!(err.to_string(), "SCRIPT_ERR_UNKNOWN_ERROR: script number overflow");
    }
}
