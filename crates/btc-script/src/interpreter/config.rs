//! Interpreter configuration with the consensus limits.

/// Maximum serialized script size in bytes.
pub const MAX_SCRIPT_SIZE: usize = 10_000;
/// Maximum size of a single pushed element.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;
/// Maximum number of non-push opcodes executed per script.
pub const MAX_OPS_PER_SCRIPT: usize = 201;
/// Maximum combined depth of the main and alt stacks.
pub const MAX_STACK_SIZE: usize = 1_000;
pub const MAX_PUBKEYS_PER_MULTISIG: usize = 20;
/// Maximum byte length of a numeric operand.
pub const MAX_SCRIPT_NUMBER_LENGTH: usize = 4;

/// Script execution limits.
///
/// `Config::default()` is the consensus configuration. Other values are only
/// useful for tests and experiments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub max_script_size: usize,
    pub max_script_element_size: usize,
    pub max_ops: usize,
    pub max_stack_size: usize,
    pub max_pub_keys_per_multisig: usize,
    pub max_script_number_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_script_size: MAX_SCRIPT_SIZE,
            max_script_element_size: MAX_SCRIPT_ELEMENT_SIZE,
            max_ops: MAX_OPS_PER_SCRIPT,
            max_stack_size: MAX_STACK_SIZE,
            max_pub_keys_per_multisig: MAX_PUBKEYS_PER_MULTISIG,
            max_script_number_length: MAX_SCRIPT_NUMBER_LENGTH,
        }
    }
}
