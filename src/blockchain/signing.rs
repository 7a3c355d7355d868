// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sui signing primitives.
//!
//! Sui signs a Blake2b-256 digest of an *intent message*: a three byte intent
//! (scope, version, app id) followed by the payload. Personal messages are
//! BCS-encoded as `vector<u8>` before hashing; transaction data is already
//! BCS bytes. Signatures travel as `base64(flag || signature || public key)`.

use base64ct::{Base64, Encoding};
use blake2b_simd::Params;
use ed25519_dalek::{Signature, VerifyingKey};

use super::types::SuiAddress;

/// Signature scheme flag for ed25519.
pub const ED25519_FLAG: u8 = 0x00;

/// Length of a serialized ed25519 signature (flag + signature + public key).
pub const SERIALIZED_SIGNATURE_LENGTH: usize = 1 + 64 + 32;

/// Intent scopes used by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IntentScope {
    TransactionData = 0,
    PersonalMessage = 3,
}

impl IntentScope {
    /// Intent prefix: scope, version 0, app id Sui (0).
    pub fn prefix(self) -> [u8; 3] {
        [self as u8, 0, 0]
    }
}

/// Anything able to sign on behalf of a Sui address.
///
/// Implemented by the ephemeral keypair; consumed by the RPC client so the
/// client never sees secret bytes.
pub trait TransactionSigner: Send + Sync {
    fn address(&self) -> SuiAddress;

    /// Sign BCS transaction bytes, returning the serialized signature.
    fn sign_transaction(&self, tx_bytes: &[u8]) -> Result<String, String>;
}

pub fn blake2b256(parts: &[&[u8]]) -> [u8; 32] {
    let mut state = Params::new().hash_length(32).to_state();
    for part in parts {
        state.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(state.finalize().as_bytes());
    out
}

/// Derive the Sui address of an ed25519 public key.
pub fn address_from_public_key(public_key: &VerifyingKey) -> SuiAddress {
    SuiAddress(blake2b256(&[&[ED25519_FLAG][..], &public_key.as_bytes()[..]]))
}

/// BCS encoding of a byte vector: ULEB128 length followed by the bytes.
pub fn bcs_bytes(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 5);
    let mut len = payload.len();
    loop {
        let byte = (len & 0x7f) as u8;
        len >>= 7;
        if len == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
    out.extend_from_slice(payload);
    out
}

/// Digest that is actually signed for the given scope and payload.
pub fn intent_digest(scope: IntentScope, payload: &[u8]) -> [u8; 32] {
    match scope {
        IntentScope::PersonalMessage => blake2b256(&[&scope.prefix()[..], &bcs_bytes(payload)[..]]),
        IntentScope::TransactionData => blake2b256(&[&scope.prefix()[..], payload]),
    }
}

/// `base64(flag || signature || public key)`.
pub fn serialize_signature(signature: &Signature, public_key: &VerifyingKey) -> String {
    let mut bytes = Vec::with_capacity(SERIALIZED_SIGNATURE_LENGTH);
    bytes.push(ED25519_FLAG);
    bytes.extend_from_slice(&signature.to_bytes());
    bytes.extend_from_slice(public_key.as_bytes());
    Base64::encode_string(&bytes)
}

/// `base64(flag || public key)`, the Sui public key encoding.
pub fn encode_public_key(public_key: &VerifyingKey) -> String {
    let mut bytes = Vec::with_capacity(33);
    bytes.push(ED25519_FLAG);
    bytes.extend_from_slice(public_key.as_bytes());
    Base64::encode_string(&bytes)
}

/// Verify a serialized signature over `payload` and return the signer address.
pub fn verify_serialized_signature(
    scope: IntentScope,
    payload: &[u8],
    serialized: &str,
) -> Result<SuiAddress, String> {
    let bytes = Base64::decode_vec(serialized).map_err(|e| format!("invalid base64: {e}"))?;
    if bytes.len() != SERIALIZED_SIGNATURE_LENGTH {
        return Err(format!("unexpected signature length {}", bytes.len()));
    }
    if bytes[0] != ED25519_FLAG {
        return Err(format!("unsupported signature scheme flag {}", bytes[0]));
    }

    let mut sig_bytes = [0u8; 64];
    sig_bytes.copy_from_slice(&bytes[1..65]);
    let mut pk_bytes = [0u8; 32];
    pk_bytes.copy_from_slice(&bytes[65..]);

    let public_key =
        VerifyingKey::from_bytes(&pk_bytes).map_err(|e| format!("invalid public key: {e}"))?;
    let signature = Signature::from_bytes(&sig_bytes);

    public_key
        .verify_strict(&intent_digest(scope, payload), &signature)
        .map_err(|e| format!("signature verification failed: {e}"))?;

    Ok(address_from_public_key(&public_key))
}
