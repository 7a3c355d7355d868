// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ephemeral ed25519 keypair.
//!
//! Holds the only decoded copy of the secret for the duration of a single
//! operation. The secret buffer is zeroed by [`EphemeralKeypair::release`] or,
//! on any other exit path, when the keypair is dropped.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey, SECRET_KEY_LENGTH};
use zeroize::{Zeroize, Zeroizing};

use crate::blockchain::signing::{
    address_from_public_key, encode_public_key, intent_digest, serialize_signature, IntentScope,
    TransactionSigner,
};
use crate::blockchain::SuiAddress;
use crate::error::{WalletError, WalletResult};

/// Hex length of a bare 32-byte seed.
const SEED_HEX_LENGTH: usize = SECRET_KEY_LENGTH * 2;

/// Hex length of a 64-byte `seed || public key` secret.
const KEYPAIR_HEX_LENGTH: usize = SECRET_KEY_LENGTH * 4;

/// A signing identity derived from raw key material for one operation.
pub struct EphemeralKeypair {
    secret: Zeroizing<[u8; SECRET_KEY_LENGTH]>,
    public: VerifyingKey,
    address: SuiAddress,
    released: bool,
    /// Outstanding-keypair counter of the custody manager that derived us.
    tracker: Option<Arc<AtomicUsize>>,
}

impl EphemeralKeypair {
    /// Decode hex key material (optional `0x` prefix) into a keypair.
    ///
    /// Accepts a 32-byte seed or a 64-byte `seed || public key` secret; in the
    /// latter case the embedded public key must match the seed.
    pub fn from_key_material(raw: &str) -> WalletResult<Self> {
        let secret = decode_secret(raw)?;
        let public = SigningKey::from_bytes(&secret).verifying_key();
        let address = address_from_public_key(&public);

        Ok(Self {
            secret,
            public,
            address,
            released: false,
            tracker: None,
        })
    }

    pub(crate) fn tracked_by(mut self, tracker: Arc<AtomicUsize>) -> Self {
        tracker.fetch_add(1, Ordering::SeqCst);
        self.tracker = Some(tracker);
        self
    }

    pub fn public_key(&self) -> &VerifyingKey {
        &self.public
    }

    /// Sui encoding of the public key (`base64(flag || key)`).
    pub fn sui_public_key(&self) -> String {
        encode_public_key(&self.public)
    }

    pub fn address(&self) -> SuiAddress {
        self.address
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Sign a personal message, returning the serialized Sui signature.
    pub fn sign_personal_message(&self, message: &[u8]) -> WalletResult<String> {
        let signature = self.sign_digest(&intent_digest(IntentScope::PersonalMessage, message))?;
        Ok(serialize_signature(&signature, &self.public))
    }

    fn sign_digest(&self, digest: &[u8; 32]) -> WalletResult<Signature> {
        if self.released {
            return Err(WalletError::NotAuthenticated);
        }
        // SigningKey zeroizes its copy of the secret when dropped.
        let signing_key = SigningKey::from_bytes(&self.secret);
        Ok(signing_key.sign(digest))
    }

    /// Overwrite the secret with zeros. Idempotent.
    pub fn release(&mut self) {
        self.secret.zeroize();
        self.released = true;
        if let Some(tracker) = self.tracker.take() {
            tracker.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[cfg(test)]
    pub(crate) fn secret_bytes(&self) -> &[u8; SECRET_KEY_LENGTH] {
        &self.secret
    }
}

impl Drop for EphemeralKeypair {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for EphemeralKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EphemeralKeypair")
            .field("address", &self.address)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

impl TransactionSigner for EphemeralKeypair {
    fn address(&self) -> SuiAddress {
        self.address
    }

    fn sign_transaction(&self, tx_bytes: &[u8]) -> Result<String, String> {
        let signature = self
            .sign_digest(&intent_digest(IntentScope::TransactionData, tx_bytes))
            .map_err(|e| e.to_string())?;
        Ok(serialize_signature(&signature, &self.public))
    }
}

fn decode_secret(raw: &str) -> WalletResult<Zeroizing<[u8; SECRET_KEY_LENGTH]>> {
    let trimmed = raw.trim();
    let hex_key = trimmed.strip_prefix("0x").unwrap_or(trimmed);

    let mut seed = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
    match hex_key.len() {
        SEED_HEX_LENGTH => {
            hex::decode_to_slice(hex_key, seed.as_mut_slice())
                .map_err(|e| invalid_key(e.to_string()))?;
        }
        KEYPAIR_HEX_LENGTH => {
            let mut full = Zeroizing::new([0u8; SECRET_KEY_LENGTH * 2]);
            hex::decode_to_slice(hex_key, full.as_mut_slice())
                .map_err(|e| invalid_key(e.to_string()))?;
            seed.copy_from_slice(&full[..SECRET_KEY_LENGTH]);

            let public = SigningKey::from_bytes(&seed).verifying_key();
            if public.as_bytes()[..] != full[SECRET_KEY_LENGTH..] {
                return Err(invalid_key("embedded public key does not match the seed".to_string()));
            }
        }
        other => {
            return Err(invalid_key(format!(
                "expected {SEED_HEX_LENGTH} or {KEYPAIR_HEX_LENGTH} hex characters, got {other}"
            )))
        }
    }
    Ok(seed)
}

fn invalid_key(reason: String) -> WalletError {
    WalletError::upstream(format!("Invalid key material: {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::signing::verify_serialized_signature;

    const SEED_HEX: &str = "9bf49a6a0755f953811fce125f2683d50429c3bb49e074147e0089a52eae155f";

    #[test]
    fn decodes_bare_seed_with_and_without_prefix() {
        let a = EphemeralKeypair::from_key_material(SEED_HEX).unwrap();
        let b = EphemeralKeypair::from_key_material(&format!("0x{SEED_HEX}")).unwrap();
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn decodes_seed_with_embedded_public_key() {
        let seeded = EphemeralKeypair::from_key_material(SEED_HEX).unwrap();
        let full = format!("{SEED_HEX}{}", hex::encode(seeded.public_key().as_bytes()));
        let kp = EphemeralKeypair::from_key_material(&full).unwrap();
        assert_eq!(kp.address(), seeded.address());
    }

    #[test]
    fn rejects_mismatched_embedded_public_key() {
        let full = format!("{SEED_HEX}{}", "00".repeat(32));
        let err = EphemeralKeypair::from_key_material(&full).unwrap_err();
        assert_eq!(err.error_code(), "upstream_error");
    }

    #[test]
    fn rejects_bad_lengths_and_characters() {
        assert!(EphemeralKeypair::from_key_material("abcd").is_err());
        assert!(EphemeralKeypair::from_key_material(&"zz".repeat(32)).is_err());
        assert!(EphemeralKeypair::from_key_material("").is_err());
    }

    #[test]
    fn release_zeroes_secret() {
        let mut kp = EphemeralKeypair::from_key_material(SEED_HEX).unwrap();
        assert!(kp.secret_bytes().iter().any(|b| *b != 0));
        kp.release();
        assert!(kp.is_released());
        assert!(kp.secret_bytes().iter().all(|b| *b == 0));
        kp.release();
        assert!(kp.secret_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn released_keypair_refuses_to_sign() {
        let mut kp = EphemeralKeypair::from_key_material(SEED_HEX).unwrap();
        kp.release();
        assert_eq!(
            kp.sign_personal_message(b"hello").unwrap_err(),
            WalletError::NotAuthenticated
        );
        assert!(kp.sign_transaction(b"tx").is_err());
    }

    #[test]
    fn signatures_verify_against_keypair_address() {
        let kp = EphemeralKeypair::from_key_material(SEED_HEX).unwrap();
        let personal = kp.sign_personal_message(b"hello").unwrap();
        assert_eq!(
            verify_serialized_signature(IntentScope::PersonalMessage, b"hello", &personal).unwrap(),
            kp.address()
        );

        let tx = kp.sign_transaction(b"tx-bytes").unwrap();
        assert_eq!(
            verify_serialized_signature(IntentScope::TransactionData, b"tx-bytes", &tx).unwrap(),
            kp.address()
        );
    }

    #[test]
    fn tracker_counts_outstanding_keypairs() {
        let tracker = Arc::new(AtomicUsize::new(0));
        let mut kp = EphemeralKeypair::from_key_material(SEED_HEX)
            .unwrap()
            .tracked_by(tracker.clone());
        assert_eq!(tracker.load(Ordering::SeqCst), 1);
        kp.release();
        assert_eq!(tracker.load(Ordering::SeqCst), 0);
        drop(kp);
        assert_eq!(tracker.load(Ordering::SeqCst), 0);

        {
            let _scoped = EphemeralKeypair::from_key_material(SEED_HEX)
                .unwrap()
                .tracked_by(tracker.clone());
            assert_eq!(tracker.load(Ordering::SeqCst), 1);
        }
        assert_eq!(tracker.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn debug_output_omits_secret() {
        let kp = EphemeralKeypair::from_key_material(SEED_HEX).unwrap();
        let printed = format!("{kp:?}");
        assert!(!printed.contains(SEED_HEX));
        assert!(printed.contains("address"));
    }
}
