/// Cryptographic primitives backing the script interpreter.
///
/// This crate provides the hashing and signature building blocks that the
/// script engine delegates to:
/// - Hash functions (SHA-1, SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - secp256k1 keys and ECDSA signatures
/// - Strict transaction-signature and public-key encoding predicates

pub mod hash;
pub mod ec;

mod error;
pub use error::PrimitivesError;
