//! Crypto operations for the script interpreter.

use btc_primitives::ec::public_key::PublicKey;
use btc_primitives::ec::signature::Signature;
use btc_primitives::hash;
use log::debug;

use crate::chunk::ScriptChunk;
use crate::Script;

use super::error::ScriptError;
use super::flags::ScriptFlags;
use super::thread::Thread;

pub(crate) enum HashType {
    Ripemd160,
    Sha1,
    Sha256,
    Hash160,
    Hash256,
}

impl<'a> Thread<'a> {
    pub(crate) fn op_hash(&mut self, hash_type: HashType) -> Result<(), ScriptError> {
        let buf = self.dstack.pop_byte_array()?;
        let result = match hash_type {
            HashType::Ripemd160 => hash::ripemd160(&buf).to_vec(),
            HashType::Sha1 => hash::sha1(&buf).to_vec(),
            HashType::Sha256 => hash::sha256(&buf).to_vec(),
            HashType::Hash160 => hash::hash160(&buf).to_vec(),
            HashType::Hash256 => hash::sha256d(&buf).to_vec(),
        };
        self.dstack.push_byte_array(result);
        Ok(())
    }

    /// The script from the last executed OP_CODESEPARATOR onward.
    pub(crate) fn sub_script(&self) -> Script {
        self.script.subscript(self.code_separator_pc)
    }

    /// Ask the transaction context whether `sig` signs `sub_script` for `pub_key`.
    ///
    /// An empty signature, a missing context or an oracle error all count as
    /// a failed verification.
    fn check_sig(&self, sig: &[u8], pub_key: &[u8], sub_script: &Script) -> bool {
        if sig.is_empty() {
            return false;
        }
        let ctx = match self.tx_context {
            Some(ctx) => ctx,
            None => return false,
        };
        match ctx.verify_signature(sig, pub_key, self.input_idx, sub_script) {
            Ok(valid) => valid,
            Err(e) => {
                debug!("signature verification error: {}", e);
                false
            }
        }
    }

    pub(crate) fn op_checksig(&mut self) -> Result<(), ScriptError> {
        self.dstack.require(2)?;
        let sig = self.dstack.peek_byte_array(1)?.to_vec();
        let pk_bytes = self.dstack.peek_byte_array(0)?.to_vec();

        // Check encodings
        self.check_signature_encoding(&sig)?;
        self.check_pub_key_encoding(&pk_bytes)?;

        // Signatures cannot sign themselves
        let mut sub_script = self.sub_script();
        sub_script.find_and_delete(&signature_push(&sig)?);

        let valid = self.check_sig(&sig, &pk_bytes, &sub_script);

        self.dstack.drop_n(2)?;
        self.dstack.push_bool(valid);
        Ok(())
    }

    pub(crate) fn op_checksigverify(&mut self) -> Result<(), ScriptError> {
        self.op_checksig()?;
        self.abstract_verify(ScriptError::CheckSigVerify)
    }

    /// Stack, top first: `n_keys <keys...> n_sigs <sigs...> dummy`.
    ///
    /// Signatures are matched against keys in order; a key that fails is
    /// skipped, and the check fails as soon as the remaining keys cannot
    /// cover the remaining signatures.
    pub(crate) fn op_checkmultisig(&mut self) -> Result<(), ScriptError> {
        // `i` counts stack items consumed so far, 1-based from the top.
        let mut i: usize = 1;
        self.dstack.require(i)?;

        let num_keys = self.dstack.peek_int(i - 1)?.to_i32();
        if num_keys < 0 || num_keys as usize > self.cfg.max_pub_keys_per_multisig {
            debug!("invalid pubkey count {}", num_keys);
            return Err(ScriptError::PubkeyCount);
        }
        let mut keys_left = num_keys as usize;

        self.op_count += keys_left;
        if self.op_count > self.cfg.max_ops {
            return Err(ScriptError::OpCount);
        }

        i += 1;
        let mut ikey = i;
        i += keys_left;
        self.dstack.require(i)?;

        let num_sigs = self.dstack.peek_int(i - 1)?.to_i32();
        if num_sigs < 0 || num_sigs > num_keys {
            debug!("invalid signature count {} for {} keys", num_sigs, num_keys);
            return Err(ScriptError::SigCount);
        }
        let mut sigs_left = num_sigs as usize;

        i += 1;
        let mut isig = i;
        i += sigs_left;
        self.dstack.require(i)?;

        // Signatures cannot sign themselves
        let mut sub_script = self.sub_script();
        for k in 0..sigs_left {
            let sig = self.dstack.peek_byte_array(isig + k - 1)?;
            sub_script.find_and_delete(&signature_push(sig)?);
        }

        let mut success = true;
        while success && sigs_left > 0 {
            let sig = self.dstack.peek_byte_array(isig - 1)?;
            let pub_key = self.dstack.peek_byte_array(ikey - 1)?;

            // Check encodings
            self.check_signature_encoding(sig)?;
            self.check_pub_key_encoding(pub_key)?;

            if self.check_sig(sig, pub_key, &sub_script) {
                isig += 1;
                sigs_left -= 1;
            }
            ikey += 1;
            keys_left -= 1;

            // More signatures left than keys means the check cannot succeed
            if sigs_left > keys_left {
                success = false;
            }
        }

        // Everything but the dummy element
        self.dstack.drop_n(i - 1)?;

        // Dummy element consumed by the historical off-by-one
        let dummy_len = self.dstack.peek_byte_array(0)?.len();
        if self.has_flag(ScriptFlags::NULLDUMMY) && dummy_len > 0 {
            return Err(ScriptError::SigNullDummy);
        }
        self.dstack.drop_n(1)?;

        self.dstack.push_bool(success);
        Ok(())
    }

    pub(crate) fn op_checkmultisigverify(&mut self) -> Result<(), ScriptError> {
        self.op_checkmultisig()?;
        self.abstract_verify(ScriptError::CheckMultisigVerify)
    }

    pub(crate) fn check_pub_key_encoding(&self, pub_key: &[u8]) -> Result<(), ScriptError> {
        if self.has_flag(ScriptFlags::STRICTENC) && !PublicKey::is_valid_encoding(pub_key) {
            return Err(ScriptError::PubkeyType);
        }
        Ok(())
    }

    /// The strictest enabled rule decides: any of DERSIG, LOW_S or STRICTENC
    /// requires strict DER; then LOW_S checks S, and only without LOW_S does
    /// STRICTENC check the hashtype.
    pub(crate) fn check_signature_encoding(&self, sig: &[u8]) -> Result<(), ScriptError> {
        if self.has_any(&[
            ScriptFlags::DERSIG,
            ScriptFlags::LOW_S,
            ScriptFlags::STRICTENC,
        ]) && !Signature::is_tx_der(sig)
        {
            return Err(ScriptError::SigDerInvalidFormat);
        }
        if self.has_flag(ScriptFlags::LOW_S) {
            if !Signature::has_low_s(sig) {
                return Err(ScriptError::SigDerHighS);
            }
        } else if self.has_flag(ScriptFlags::STRICTENC) && !Signature::has_defined_hashtype(sig) {
            return Err(ScriptError::SigHashtype);
        }
        Ok(())
    }
}

/// A one-chunk script pushing `sig`, as it would appear in a scriptSig.
fn signature_push(sig: &[u8]) -> Result<Script, ScriptError> {
    let chunk = ScriptChunk::push(sig).map_err(|e| ScriptError::unknown(e.to_string()))?;
    Ok(Script::from_chunks(vec![chunk]))
}
