use proptest::prelude::*;

use btc_script::interpreter::{cast_to_bool, Config, Interpreter, ScriptNumber};
use btc_script::opcodes::*;
use btc_script::{verify, Script, ScriptError, ScriptFlags};

const DISABLED: [u8; 15] = [
    OP_CAT, OP_SUBSTR, OP_LEFT, OP_RIGHT, OP_INVERT, OP_AND, OP_OR, OP_XOR, OP_2MUL, OP_2DIV,
    OP_MUL, OP_DIV, OP_MOD, OP_LSHIFT, OP_RSHIFT,
];

/// Opcodes that cannot fail on their own: small ints and plain NOP.
fn harmless_op() -> impl Strategy<Value = u8> {
    prop_oneof![Just(OP_0), Just(OP_1NEGATE), OP_1..=OP_16, Just(OP_NOP)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn script_number_minimal_roundtrip(val in -0x7FFFFFFFi64..=0x7FFFFFFFi64) {
        let buf = ScriptNumber::from(val).to_buffer();
        prop_assert!(buf.len() <= 4);
        let decoded = ScriptNumber::from_buffer(&buf, true).unwrap();
        prop_assert_eq!(decoded, ScriptNumber::from(val));
    }

    #[test]
    fn script_bytes_roundtrip(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let script = Script::from_bytes(&data);
        prop_assert_eq!(&data[..], &script.to_bytes()[..]);
    }

    #[test]
    fn script_hex_roundtrip(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let script = Script::from_bytes(&data);
        let script2 = Script::from_hex(&script.to_hex()).unwrap();
        prop_assert_eq!(script, script2);
    }

    #[test]
    fn negative_zero_is_false(zeros in 0usize..8) {
        let mut buf = vec![0u8; zeros];
        buf.push(0x80);
        prop_assert!(!cast_to_bool(&buf));
        buf.insert(0, 0x01);
        prop_assert!(cast_to_bool(&buf));
    }

    #[test]
    fn evaluation_is_deterministic(
        sig in prop::collection::vec(any::<u8>(), 0..64),
        pubkey in prop::collection::vec(any::<u8>(), 0..128),
        bits in 0u32..256,
    ) {
        let script_sig = Script::from_bytes(&sig);
        let script_pubkey = Script::from_bytes(&pubkey);
        let flags = ScriptFlags::from_bits(bits);
        let first = verify(&script_sig, &script_pubkey, None, 0, flags);
        let second = verify(&script_sig, &script_pubkey, None, 0, flags);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn successful_runs_respect_bounds(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let cfg = Config { max_stack_size: 40, ..Config::default() };
        let script = Script::from_bytes(&bytes);
        let mut interp = Interpreter::new(&script, ScriptFlags::NONE).with_config(cfg);
        if interp.evaluate(None, 0).is_ok() {
            prop_assert!(interp.stack().depth() + interp.alt_stack().depth() <= 40);
        }
    }

    #[test]
    fn disabled_opcodes_always_fail(
        prefix in prop::collection::vec(harmless_op(), 0..50),
        disabled in prop::sample::select(DISABLED.to_vec()),
        skipped in any::<bool>(),
    ) {
        let mut bytes = prefix;
        if skipped {
            bytes.extend([OP_0, OP_IF, disabled, OP_ENDIF]);
        } else {
            bytes.push(disabled);
        }
        bytes.push(OP_1);
        let script = Script::from_bytes(&bytes);
        let mut interp = Interpreter::new(&script, ScriptFlags::NONE);
        prop_assert_eq!(interp.evaluate(None, 0), Err(ScriptError::DisabledOpcode));
    }

    #[test]
    fn unassigned_bytes_fail_only_when_executed(op in 0xbau8..=0xfe, skipped in any::<bool>()) {
        let bytes = if skipped {
            vec![OP_0, OP_IF, op, OP_ENDIF, OP_1]
        } else {
            vec![OP_1, op]
        };
        let script = Script::from_bytes(&bytes);
        let mut interp = Interpreter::new(&script, ScriptFlags::NONE);
        let expected = if skipped { Ok(()) } else { Err(ScriptError::BadOpcode) };
        prop_assert_eq!(interp.evaluate(None, 0), expected);
    }

    #[test]
    fn op_count_never_exceeds_limit(nops in 0usize..400) {
        let script = Script::from_bytes(&vec![OP_NOP; nops]);
        let mut interp = Interpreter::new(&script, ScriptFlags::NONE);
        let result = interp.evaluate(None, 0);
        if nops <= 201 {
            prop_assert_eq!(result, Ok(()));
        } else {
            prop_assert_eq!(result, Err(ScriptError::OpCount));
        }
    }
}
