//! Table of (scriptSig, scriptPubKey, flags) cases in ASM with their verdicts.

use btc_script::{verify, Script, ScriptError, ScriptFlags};

struct Vector {
    sig: &'static str,
    pubkey: &'static str,
    flags: ScriptFlags,
    expected: Result<(), ScriptError>,
}

const NONE: ScriptFlags = ScriptFlags::NONE;
const MINIMAL: ScriptFlags = ScriptFlags::MINIMALDATA;

fn v(
    sig: &'static str,
    pubkey: &'static str,
    flags: ScriptFlags,
    expected: Result<(), ScriptError>,
) -> Vector {
    Vector {
        sig,
        pubkey,
        flags,
        expected,
    }
}

fn vectors() -> Vec<Vector> {
    use ScriptError::*;
    vec![
        // constants and equality
        v("OP_1", "OP_1 OP_EQUAL", NONE, Ok(())),
        v("OP_TRUE", "", NONE, Ok(())),
        v("OP_FALSE", "", NONE, Err(EvalFalseInStack)),
        v("", "", NONE, Err(EvalFalseNoResult)),
        v("OP_1NEGATE", "81 OP_EQUAL", NONE, Ok(())),
        v("OP_16", "10 OP_EQUAL", NONE, Ok(())),
        v("aabb", "aabb OP_EQUALVERIFY OP_DEPTH OP_0 OP_EQUAL", NONE, Ok(())),
        v("aabb", "aabc OP_EQUALVERIFY OP_1", NONE, Err(EqualVerify)),
        // boolean casts
        v("80", "", NONE, Err(EvalFalseInStack)),
        v("0080", "", NONE, Err(EvalFalseInStack)),
        v("0180", "", NONE, Ok(())),
        v("0000", "", NONE, Err(EvalFalseInStack)),
        // arithmetic
        v("OP_2 OP_3", "OP_ADD OP_5 OP_NUMEQUAL", NONE, Ok(())),
        v("OP_2 OP_3", "OP_SUB OP_1NEGATE OP_NUMEQUAL", NONE, Ok(())),
        v("OP_0", "OP_1SUB OP_1NEGATE OP_EQUAL", NONE, Ok(())),
        v("OP_1NEGATE", "OP_1ADD OP_0 OP_EQUAL", NONE, Ok(())),
        v("OP_5", "OP_0NOTEQUAL", NONE, Ok(())),
        v("OP_0", "OP_0NOTEQUAL", NONE, Err(EvalFalseInStack)),
        v("OP_1 OP_0", "OP_BOOLAND", NONE, Err(EvalFalseInStack)),
        v("OP_1 OP_0", "OP_BOOLOR", NONE, Ok(())),
        v("OP_3 OP_4", "OP_LESSTHAN", NONE, Ok(())),
        v("OP_4 OP_4", "OP_LESSTHANOREQUAL", NONE, Ok(())),
        v("OP_4 OP_3", "OP_GREATERTHAN", NONE, Ok(())),
        v("OP_3 OP_3", "OP_GREATERTHANOREQUAL", NONE, Ok(())),
        v("OP_3 OP_4", "OP_NUMNOTEQUAL", NONE, Ok(())),
        v("OP_3 OP_9", "OP_MIN OP_3 OP_EQUAL", NONE, Ok(())),
        v("OP_3 OP_9", "OP_MAX OP_9 OP_EQUAL", NONE, Ok(())),
        v("OP_2 OP_2 OP_5", "OP_WITHIN", NONE, Ok(())),
        v("OP_5 OP_2 OP_5", "OP_WITHIN", NONE, Err(EvalFalseInStack)),
        v("OP_3 OP_4", "OP_NUMEQUALVERIFY OP_1", NONE, Err(NumEqualVerify)),
        // negative zero equals zero numerically, not bytewise
        v("80", "OP_0 OP_NUMEQUAL", NONE, Ok(())),
        v("80", "OP_0 OP_EQUAL", NONE, Err(EvalFalseInStack)),
        v("80", "OP_0 OP_NUMEQUAL", MINIMAL, Err(MinimalData)),
        v("0100", "OP_1 OP_NUMEQUAL", NONE, Ok(())),
        v("0100", "OP_1 OP_NUMEQUAL", MINIMAL, Err(MinimalData)),
        v(
            "0000008000",
            "OP_ABS",
            NONE,
            Err(UnknownError(
                "script number overflow: 5 bytes exceeds the max allowed of 4".to_string(),
            )),
        ),
        // stack manipulation
        v("OP_1 OP_2", "OP_SWAP OP_1 OP_EQUALVERIFY OP_2 OP_EQUAL", NONE, Ok(())),
        v("OP_1 OP_2 OP_3", "OP_ROT OP_1 OP_EQUAL", NONE, Ok(())),
        v("OP_1 OP_2", "OP_OVER OP_1 OP_EQUAL", NONE, Ok(())),
        v("OP_1 OP_2", "OP_NIP OP_DEPTH OP_1 OP_EQUAL", NONE, Ok(())),
        v("OP_1 OP_2", "OP_TUCK OP_DEPTH OP_3 OP_EQUAL", NONE, Ok(())),
        v("OP_1 OP_2", "OP_2DUP OP_DEPTH OP_4 OP_EQUAL", NONE, Ok(())),
        v("OP_1 OP_2 OP_3", "OP_3DUP OP_DEPTH OP_6 OP_EQUAL", NONE, Ok(())),
        v("OP_1 OP_2 OP_3 OP_4", "OP_2SWAP OP_2 OP_EQUAL", NONE, Ok(())),
        v("OP_1 OP_2 OP_3 OP_4", "OP_2OVER OP_2 OP_EQUAL", NONE, Ok(())),
        v("OP_1 OP_2 OP_3 OP_4 OP_5 OP_6", "OP_2ROT OP_2 OP_EQUAL", NONE, Ok(())),
        v("OP_1 OP_1", "OP_2DROP OP_DEPTH OP_0 OP_EQUAL", NONE, Ok(())),
        v("OP_0", "OP_IFDUP OP_DEPTH OP_1 OP_EQUAL", NONE, Ok(())),
        v("OP_7", "OP_IFDUP OP_DEPTH OP_2 OP_EQUAL", NONE, Ok(())),
        v("OP_1", "OP_DROP OP_DROP OP_1", NONE, Err(InvalidStackOperation)),
        v("", "OP_DUP", NONE, Err(InvalidStackOperation)),
        v("OP_1", "OP_SWAP", NONE, Err(InvalidStackOperation)),
        v("OP_1", "OP_TOALTSTACK OP_FROMALTSTACK", NONE, Ok(())),
        v("", "OP_FROMALTSTACK", NONE, Err(InvalidAltstackOperation)),
        v("aabbcc", "OP_SIZE OP_3 OP_EQUALVERIFY OP_1", NONE, Ok(())),
        v("", "OP_SIZE", NONE, Err(InvalidStackOperation)),
        // hashing
        v("", "OP_0 OP_SHA256 e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855 OP_EQUAL", NONE, Ok(())),
        v("", "OP_0 OP_SHA1 da39a3ee5e6b4b0d3255bfef95601890afd80709 OP_EQUAL", NONE, Ok(())),
        v("", "OP_0 OP_RIPEMD160 9c1185a5c5e9fc54612808977ee8f548b2258d31 OP_EQUAL", NONE, Ok(())),
        v("", "OP_0 OP_HASH160 b472a266d0bd89c13706a4132ccfb16f7c3b9fcb OP_EQUAL", NONE, Ok(())),
        v("", "OP_0 OP_HASH256 5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456 OP_EQUAL", NONE, Ok(())),
        // flow control
        v("OP_1", "OP_IF OP_1 OP_ELSE OP_0 OP_ENDIF", NONE, Ok(())),
        v("OP_0", "OP_IF OP_1 OP_ELSE OP_0 OP_ENDIF", NONE, Err(EvalFalseInStack)),
        v("OP_0", "OP_NOTIF OP_1 OP_ENDIF", NONE, Ok(())),
        v("OP_1", "OP_IF OP_0 OP_IF OP_RETURN OP_ENDIF OP_1 OP_ENDIF", NONE, Ok(())),
        v("OP_1", "OP_IF OP_ELSE OP_ELSE OP_1 OP_ENDIF", NONE, Ok(())),
        v("OP_1", "OP_IF OP_1", NONE, Err(UnbalancedConditional)),
        v("OP_1", "OP_IF OP_1 OP_ENDIF OP_ENDIF", NONE, Err(UnbalancedConditional)),
        v("OP_1", "OP_ELSE", NONE, Err(UnbalancedConditional)),
        v("", "OP_IF OP_1 OP_ENDIF", NONE, Err(UnbalancedConditional)),
        v("OP_1", "OP_VERIFY OP_1", NONE, Ok(())),
        v("OP_0", "OP_VERIFY OP_1", NONE, Err(Verify)),
        v("OP_1", "OP_RETURN", NONE, Err(OpReturn)),
        v("OP_1", "OP_NOP OP_NOP1 OP_CHECKLOCKTIMEVERIFY OP_NOP10", NONE, Ok(())),
        v(
            "OP_1",
            "OP_CHECKSEQUENCEVERIFY",
            ScriptFlags::DISCOURAGE_UPGRADABLE_NOPS,
            Err(DiscourageUpgradableNops),
        ),
        v(
            "OP_1",
            "OP_0 OP_IF OP_NOP10 OP_ENDIF",
            ScriptFlags::DISCOURAGE_UPGRADABLE_NOPS,
            Ok(()),
        ),
        // reserved and disabled
        v("OP_1", "OP_RESERVED", NONE, Err(BadOpcode)),
        v("OP_1", "OP_0 OP_IF OP_RESERVED OP_ENDIF", NONE, Ok(())),
        v("OP_1", "OP_0 OP_IF OP_VERIF OP_ENDIF", NONE, Err(BadOpcode)),
        v("OP_1", "OP_RESERVED1", NONE, Err(BadOpcode)),
        v("aa bb", "OP_CAT", NONE, Err(DisabledOpcode)),
        v("OP_1", "OP_0 OP_IF OP_2MUL OP_ENDIF", NONE, Err(DisabledOpcode)),
        v("OP_1", "OP_1 OP_IF OP_ELSE OP_LSHIFT OP_ENDIF", NONE, Err(DisabledOpcode)),
        // unassigned bytes
        v("", "OP_0 OP_IF OP_UNKNOWN186 OP_ENDIF OP_1", NONE, Ok(())),
        v("", "OP_1 OP_UNKNOWN186", NONE, Err(BadOpcode)),
        v("OP_1", "OP_UNKNOWN254", NONE, Err(BadOpcode)),
        // an empty signature is not exempt from the DER rule
        v("OP_0", "OP_DROP OP_0 OP_0 OP_CHECKSIG OP_NOT", NONE, Ok(())),
        v(
            "OP_0",
            "OP_DROP OP_0 OP_0 OP_CHECKSIG OP_NOT",
            ScriptFlags::DERSIG,
            Err(SigDerInvalidFormat),
        ),
        // multisig without signatures
        v("OP_0 OP_0", "OP_0 OP_CHECKMULTISIG", NONE, Ok(())),
        v("OP_0", "OP_0 OP_0 OP_CHECKMULTISIGVERIFY OP_1", NONE, Ok(())),
        v("OP_0 OP_0", "OP_1 OP_0 OP_CHECKMULTISIG", NONE, Err(SigCount)),
        v("OP_1 OP_0", "OP_0 OP_CHECKMULTISIG", ScriptFlags::NULLDUMMY, Err(SigNullDummy)),
        // push-only scriptSig
        v("OP_1 OP_DUP", "OP_EQUAL", ScriptFlags::SIGPUSHONLY, Err(SigPushOnly)),
        v("OP_1 OP_NOP", "", ScriptFlags::SIGPUSHONLY, Err(SigPushOnly)),
        v("OP_1 aa OP_16", "OP_DROP OP_DROP", ScriptFlags::SIGPUSHONLY, Ok(())),
        // minimal pushes
        v("0b", "OP_11 OP_EQUAL", NONE, Ok(())),
        v("0b", "OP_DROP OP_1", MINIMAL, Err(MinimalData)),
        v("81", "OP_DROP OP_1", MINIMAL, Err(MinimalData)),
        v("OP_11 OP_1NEGATE", "OP_DROP", MINIMAL, Ok(())),
        v("1122", "OP_DROP OP_1", MINIMAL, Ok(())),
    ]
}

#[test]
fn test_script_vectors() {
    for (i, vector) in vectors().into_iter().enumerate() {
        let script_sig = Script::from_asm(vector.sig).unwrap();
        let script_pubkey = Script::from_asm(vector.pubkey).unwrap();
        let result = verify(&script_sig, &script_pubkey, None, 0, vector.flags);
        assert_eq!(
            result, vector.expected,
            "vector {} failed: [{}] [{}]",
            i, vector.sig, vector.pubkey
        );
    }
}

#[test]
fn test_non_minimal_push_from_bytes() {
    // 0x4c 0x01 0x07: OP_PUSHDATA1 where a direct push would do
    let script_sig = Script::from_bytes(&[0x4c, 0x01, 0x07]);
    let script_pubkey = Script::from_asm("OP_DROP OP_1").unwrap();
    assert_eq!(
        verify(&script_sig, &script_pubkey, None, 0, MINIMAL),
        Err(ScriptError::MinimalData)
    );
    assert_eq!(verify(&script_sig, &script_pubkey, None, 0, ScriptFlags::NONE), Ok(()));
}

#[test]
fn test_truncated_push_fails() {
    let script_sig = Script::from_bytes(&[0x4c]);
    let script_pubkey = Script::from_asm("OP_1").unwrap();
    assert!(matches!(
        verify(&script_sig, &script_pubkey, None, 0, ScriptFlags::NONE),
        Err(ScriptError::UnknownError(_))
    ));
}
