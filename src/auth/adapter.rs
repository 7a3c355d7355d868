// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication session adapter.
//!
//! Bridges the external identity SDK to the wallet session. It owns the
//! `connected` flag and the provider handle, and is the only path through
//! which raw key material leaves the SDK.
//!
//! Every SDK call is wrapped: failures become console entries and the
//! session keeps its previous state.

use std::sync::Arc;

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::sdk::{AuthNetwork, AuthSdk, LoginParams, LoginProvider, MfaLevel, SdkInitParams, UserInfo};
use crate::blockchain::ChainConfig;
use crate::console::ConsoleLog;
use crate::error::{WalletError, WalletResult};
use crate::state::{ProviderHandle, SharedSession};

/// Configuration the adapter needs to initialize the SDK.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Identity SDK client id; `None` leaves the adapter permanently unready.
    pub client_id: Option<String>,
    pub network: AuthNetwork,
    pub redirect_url: String,
}

pub struct AuthSessionAdapter {
    sdk: Arc<dyn AuthSdk>,
    config: AuthConfig,
    chain: &'static ChainConfig,
    session: SharedSession,
    console: ConsoleLog,
}

impl AuthSessionAdapter {
    pub fn new(
        sdk: Arc<dyn AuthSdk>,
        config: AuthConfig,
        chain: &'static ChainConfig,
        session: SharedSession,
        console: ConsoleLog,
    ) -> Self {
        Self {
            sdk,
            config,
            chain,
            session,
            console,
        }
    }

    pub fn sdk(&self) -> &Arc<dyn AuthSdk> {
        &self.sdk
    }

    /// Initialize the SDK. Safe to call repeatedly; never fails loudly.
    pub async fn initialize(&self) {
        let Some(client_id) = self.client_id() else {
            warn!("identity SDK client id is not configured");
            self.console
                .error_in("Missing client id at runtime", &WalletError::NotInitialized);
            return;
        };

        if let Err(err) = self.try_initialize(client_id).await {
            self.console.error_in("init error", &err);
        }
    }

    fn client_id(&self) -> Option<&str> {
        self.config
            .client_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    async fn try_initialize(&self, client_id: &str) -> WalletResult<()> {
        let mut session = self.session.write().await;
        if session.is_initialized() {
            debug!("identity SDK already initialized");
            return Ok(());
        }

        let params = SdkInitParams {
            client_id: client_id.to_string(),
            network: self.config.network,
            redirect_url: self.config.redirect_url.clone(),
        };
        self.sdk.init(&params).await?;
        session.mark_initialized();

        info!(
            ready = self.sdk.ready(),
            connected = self.sdk.connected(),
            "identity SDK initialized"
        );

        if self.sdk.connected() {
            session.connect(self.provider_handle("restored"));
            drop(session);
            self.console.info("Session restored");
        }
        Ok(())
    }

    /// Log in with `provider`. Passwordless providers need `email_hint`.
    pub async fn login(&self, provider: &str, email_hint: Option<&str>) -> bool {
        match self.try_login(provider, email_hint).await {
            Ok(()) => true,
            Err(err) => {
                self.console.error_in("login error", &err);
                false
            }
        }
    }

    async fn try_login(&self, provider: &str, email_hint: Option<&str>) -> WalletResult<()> {
        if !self.is_ready().await {
            return Err(WalletError::NotInitialized);
        }

        let provider: LoginProvider = provider.parse().map_err(WalletError::Validation)?;
        let hint = email_hint.map(str::trim).filter(|h| !h.is_empty());

        let params = if provider.requires_hint() {
            let hint = hint.ok_or_else(|| WalletError::validation("Email is required"))?;
            LoginParams {
                provider,
                redirect_url: self.config.redirect_url.clone(),
                mfa_level: MfaLevel::Default,
                login_hint: Some(hint.to_string()),
            }
        } else {
            LoginParams {
                provider,
                redirect_url: self.config.redirect_url.clone(),
                mfa_level: MfaLevel::None,
                login_hint: None,
            }
        };

        self.console.info("Logging in");
        info!(provider = %provider, "logging in");
        self.sdk.login(params).await?;

        if !self.sdk.connected() {
            return Err(WalletError::upstream("login finished without a session"));
        }

        let mut session = self.session.write().await;
        // A new login may belong to a different user.
        session.disconnect();
        session.connect(self.provider_handle(provider.as_str()));
        drop(session);

        self.console.info("Logged In");
        Ok(())
    }

    /// Log out of the SDK and drop the provider.
    pub async fn logout(&self) -> bool {
        match self.try_logout().await {
            Ok(()) => true,
            Err(err) => {
                self.console.error_in("logout error", &err);
                false
            }
        }
    }

    async fn try_logout(&self) -> WalletResult<()> {
        if !self.session.read().await.is_initialized() {
            return Err(WalletError::NotInitialized);
        }

        self.console.info("Logging out");
        self.sdk.logout().await?;

        if self.sdk.connected() {
            return Err(WalletError::upstream("SDK still reports a session after logout"));
        }

        self.session.write().await.disconnect();
        self.console.info("Logged out");
        Ok(())
    }

    /// User profile of the current session.
    pub async fn user_info(&self) -> WalletResult<UserInfo> {
        if !self.is_connected().await {
            return Err(WalletError::not_ready("not connected"));
        }
        Ok(self.sdk.user_info().await?)
    }

    /// Initialized and the SDK reports ready.
    pub async fn is_ready(&self) -> bool {
        self.session.read().await.is_initialized() && self.sdk.ready()
    }

    pub async fn is_connected(&self) -> bool {
        self.session.read().await.is_connected()
    }

    /// Hex key material for the current session. Only the custody manager calls this.
    pub(crate) async fn raw_key_material(&self) -> WalletResult<Zeroizing<String>> {
        let connected = {
            let session = self.session.read().await;
            session.provider().is_some()
        };
        if !connected {
            return Err(WalletError::NotAuthenticated);
        }
        Ok(self.sdk.private_key().await?)
    }

    /// End of lifecycle: forget the session and require a fresh `initialize`.
    pub async fn dispose(&self) {
        self.session.write().await.reset();
        debug!("authentication adapter disposed");
    }

    fn provider_handle(&self, login_provider: &str) -> ProviderHandle {
        ProviderHandle {
            login_provider: login_provider.to_string(),
            chain_id: self.chain.chain_id,
        }
    }
}
