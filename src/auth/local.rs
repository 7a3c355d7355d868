// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process identity SDK.
//!
//! Stands in for a hosted identity provider during development and tests.
//! The private key for a login is `HMAC-SHA256(client_id, "<provider>:<identity>")`,
//! so logging in again with the same provider and hint yields the same wallet.

use std::sync::Mutex;

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::sdk::{AuthSdk, LoginParams, LoginProvider, SdkError, SdkInitParams, UserInfo};
use crate::blockchain::signing::{
    address_from_public_key, intent_digest, serialize_signature, IntentScope,
};
use crate::blockchain::{ChainConfig, SuiAddress};

type HmacSha256 = Hmac<Sha256>;

struct LocalSession {
    provider: LoginProvider,
    identity: String,
    seed: Zeroizing<[u8; 32]>,
}

impl LocalSession {
    fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.seed)
    }

    fn address(&self) -> SuiAddress {
        address_from_public_key(&self.signing_key().verifying_key())
    }
}

#[derive(Default)]
struct LocalState {
    params: Option<SdkInitParams>,
    session: Option<LocalSession>,
    /// Session restored from storage on `init`.
    persisted: Option<(LoginProvider, String)>,
}

/// Identity SDK that derives keys locally.
#[derive(Default)]
pub struct LocalAuthSdk {
    state: Mutex<LocalState>,
}

impl LocalAuthSdk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend a previous login was persisted; it is restored on `init`.
    pub fn with_persisted_session(self, provider: LoginProvider, identity: impl Into<String>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.persisted = Some((provider, identity.into()));
        }
        self
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, LocalState>, SdkError> {
        self.state
            .lock()
            .map_err(|_| SdkError::Other("local SDK state poisoned".to_string()))
    }
}

fn derive_seed(client_id: &str, provider: LoginProvider, identity: &str) -> Result<Zeroizing<[u8; 32]>, SdkError> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(client_id.as_bytes())
        .map_err(|e| SdkError::Other(format!("HMAC init failed: {e}")))?;
    mac.update(provider.as_str().as_bytes());
    mac.update(b":");
    mac.update(identity.as_bytes());

    let mut seed = Zeroizing::new([0u8; 32]);
    seed.copy_from_slice(&mac.finalize().into_bytes());
    Ok(seed)
}

fn default_identity(provider: LoginProvider) -> String {
    format!("{}-user", provider.as_str())
}

#[async_trait]
impl AuthSdk for LocalAuthSdk {
    async fn init(&self, params: &SdkInitParams) -> Result<(), SdkError> {
        let mut state = self.lock()?;
        if let Some((provider, identity)) = state.persisted.take() {
            let seed = derive_seed(&params.client_id, provider, &identity)?;
            debug!(provider = %provider, "restoring persisted session");
            state.session = Some(LocalSession {
                provider,
                identity,
                seed,
            });
        }
        state.params = Some(params.clone());
        Ok(())
    }

    fn ready(&self) -> bool {
        self.state.lock().map(|s| s.params.is_some()).unwrap_or(false)
    }

    fn connected(&self) -> bool {
        self.state.lock().map(|s| s.session.is_some()).unwrap_or(false)
    }

    async fn login(&self, params: LoginParams) -> Result<(), SdkError> {
        let mut state = self.lock()?;
        let client_id = state
            .params
            .as_ref()
            .map(|p| p.client_id.clone())
            .ok_or(SdkError::NotInitialized)?;

        let identity = match params.login_hint.as_deref().map(str::trim) {
            Some(hint) if !hint.is_empty() => hint.to_string(),
            _ if params.provider.requires_hint() => {
                return Err(SdkError::InvalidRequest(format!(
                    "{} requires a login hint",
                    params.provider
                )))
            }
            _ => default_identity(params.provider),
        };

        let seed = derive_seed(&client_id, params.provider, &identity)?;
        state.session = Some(LocalSession {
            provider: params.provider,
            identity,
            seed,
        });
        info!(provider = %params.provider, "local SDK login complete");
        Ok(())
    }

    async fn logout(&self) -> Result<(), SdkError> {
        let mut state = self.lock()?;
        if state.params.is_none() {
            return Err(SdkError::NotInitialized);
        }
        state.session = None;
        Ok(())
    }

    async fn user_info(&self) -> Result<UserInfo, SdkError> {
        let state = self.lock()?;
        let session = state.session.as_ref().ok_or(SdkError::NoSession)?;
        let email = session
            .identity
            .contains('@')
            .then(|| session.identity.clone());

        Ok(UserInfo {
            email,
            name: Some(session.identity.clone()),
            profile_image: None,
            verifier: session.provider.as_str().to_string(),
            verifier_id: session.identity.clone(),
            type_of_login: session.provider.as_str().to_string(),
        })
    }

    async fn private_key(&self) -> Result<Zeroizing<String>, SdkError> {
        let state = self.lock()?;
        let session = state.session.as_ref().ok_or(SdkError::NoSession)?;
        Ok(Zeroizing::new(hex::encode(session.seed.as_slice())))
    }

    async fn request(
        &self,
        _chain: &ChainConfig,
        method: &str,
        params: Value,
    ) -> Result<Value, SdkError> {
        if method != "personal_sign" {
            return Err(SdkError::UnsupportedMethod(method.to_string()));
        }

        let message = params
            .get(0)
            .and_then(Value::as_str)
            .ok_or_else(|| SdkError::InvalidRequest("personal_sign expects [message, address]".to_string()))?;
        let requested: SuiAddress = params
            .get(1)
            .and_then(Value::as_str)
            .ok_or_else(|| SdkError::InvalidRequest("personal_sign expects [message, address]".to_string()))?
            .parse()
            .map_err(SdkError::InvalidRequest)?;

        let state = self.lock()?;
        let session = state.session.as_ref().ok_or(SdkError::NoSession)?;
        if session.address() != requested {
            return Err(SdkError::InvalidRequest(
                "address does not belong to the session".to_string(),
            ));
        }

        let key = session.signing_key();
        let signature = key.sign(&intent_digest(IntentScope::PersonalMessage, message.as_bytes()));

        Ok(json!({
            "signature": serialize_signature(&signature, &key.verifying_key()),
            "address": requested.to_string(),
        }))
    }

    async fn launch_wallet_services(&self, chain: &ChainConfig) -> Result<(), SdkError> {
        let state = self.lock()?;
        let session = state.session.as_ref().ok_or(SdkError::NoSession)?;
        info!(
            network = %chain.network,
            url = %chain.explorer_account_url(&session.address()),
            "local SDK has no hosted wallet; account is viewable in the explorer"
        );
        Ok(())
    }
}
