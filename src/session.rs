// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Session
//!
//! [`WalletSession`] is the root object of the wallet. The binary constructs
//! exactly one, calls [`WalletSession::initialize`] and finally
//! [`WalletSession::dispose`].
//!
//! ## Contract
//!
//! Public operations never return an error. A failure becomes a console
//! entry (see [`ConsoleLog`]) and the operation returns `None` or `false`.
//! Internally every operation is a `try_*` function returning
//! [`WalletResult`] so that `?` can be used throughout.
//!
//! ## Keys
//!
//! Operations that need the key derive a fresh [`EphemeralKeypair`] from the
//! identity SDK and release it before returning, on every path.
//!
//! [`EphemeralKeypair`]: crate::custody::EphemeralKeypair

use std::sync::{Arc, Mutex};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::auth::{AuthConfig, AuthSdk, AuthSessionAdapter, UserInfo};
use crate::blockchain::{
    format_balance, mist_to_sui, sui_to_mist, ChainConfig, ChainRpc, ExecutionResult, SuiAddress,
    TransferRequest, SUI_DECIMALS,
};
use crate::config::AppConfig;
use crate::console::ConsoleLog;
use crate::custody::KeyCustody;
use crate::error::{WalletError, WalletResult};
use crate::state::{new_shared_session, SharedSession};

/// Message signed by [`WalletSession::sign_message`] when none is given.
pub const DEFAULT_SIGN_MESSAGE: &str = "Signee confirmation";

/// Message signed through the SDK by [`WalletSession::request_signature`].
pub const SIGNATURE_REQUEST_MESSAGE: &str = "Hello World";

/// Result of [`WalletSession::sign_message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedMessage {
    /// The exact payload that was signed, including the timestamp.
    pub message: String,
    /// Serialized Sui signature (`base64(flag || signature || public key)`).
    pub signature: String,
    pub public_key: String,
    pub address: SuiAddress,
    pub timestamp: String,
}

pub struct WalletSession {
    auth: Arc<AuthSessionAdapter>,
    custody: KeyCustody,
    rpc: Arc<dyn ChainRpc>,
    chain: &'static ChainConfig,
    faucet_host: Option<String>,
    session: SharedSession,
    console: ConsoleLog,
    /// Microsecond timestamp of the last signed message.
    last_signed_at: Mutex<Option<i64>>,
}

impl WalletSession {
    pub fn new(
        sdk: Arc<dyn AuthSdk>,
        rpc: Arc<dyn ChainRpc>,
        auth_config: AuthConfig,
        chain: &'static ChainConfig,
        faucet_host: Option<String>,
    ) -> Self {
        let session = new_shared_session();
        let console = ConsoleLog::new();
        let auth = Arc::new(AuthSessionAdapter::new(
            sdk,
            auth_config,
            chain,
            session.clone(),
            console.clone(),
        ));

        Self {
            custody: KeyCustody::new(auth.clone()),
            auth,
            rpc,
            chain,
            faucet_host,
            session,
            console,
            last_signed_at: Mutex::new(None),
        }
    }

    /// Build a session from the resolved application configuration.
    pub fn from_config(config: &AppConfig, sdk: Arc<dyn AuthSdk>, rpc: Arc<dyn ChainRpc>) -> Self {
        Self::new(
            sdk,
            rpc,
            config.auth_config(),
            config.chain(),
            config.faucet_host().map(str::to_string),
        )
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub async fn initialize(&self) {
        self.auth.initialize().await;
    }

    /// Forget the session. `initialize` must be called again before reuse.
    pub async fn dispose(&self) {
        self.auth.dispose().await;
        info!(network = %self.chain.network, "wallet session disposed");
    }

    pub async fn login(&self, provider: &str, email_hint: Option<&str>) -> bool {
        self.auth.login(provider, email_hint).await
    }

    pub async fn logout(&self) -> bool {
        self.auth.logout().await
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn is_ready(&self) -> bool {
        self.auth.is_ready().await
    }

    pub async fn logged_in(&self) -> bool {
        self.session.read().await.is_connected()
    }

    /// Bound address of the session; `None` while logged out.
    pub async fn address(&self) -> Option<SuiAddress> {
        self.session.read().await.address()
    }

    pub fn console(&self) -> &ConsoleLog {
        &self.console
    }

    pub fn chain(&self) -> &'static ChainConfig {
        self.chain
    }

    pub fn custody(&self) -> &KeyCustody {
        &self.custody
    }

    // =========================================================================
    // Operations
    // =========================================================================

    pub async fn get_user_info(&self) -> Option<UserInfo> {
        let result = self.try_get_user_info().await;
        self.report("error fetching user info", result)
    }

    async fn try_get_user_info(&self) -> WalletResult<UserInfo> {
        let info = self.auth.user_info().await?;
        let rendered = serde_json::to_string(&info)
            .map_err(|e| WalletError::upstream(format!("unreadable user info: {e}")))?;
        self.console.info(rendered);
        Ok(info)
    }

    /// Chain identifier reported by the node.
    pub async fn get_chain_id(&self) -> Option<String> {
        let result = self.try_get_chain_id().await;
        self.report("error fetching chain id", result)
    }

    async fn try_get_chain_id(&self) -> WalletResult<String> {
        self.require_provider().await?;
        self.console.info("Getting chain id");
        let chain_id = self.rpc.get_chain_identifier().await?;
        self.console.info(chain_id.clone());
        Ok(chain_id)
    }

    /// Derive the session address and bind it to the session.
    pub async fn get_address(&self) -> Option<SuiAddress> {
        let result = self.try_get_address().await;
        self.report("error fetching address", result)
    }

    async fn try_get_address(&self) -> WalletResult<SuiAddress> {
        self.require_provider().await?;
        let address = self.refresh_address().await?;
        self.console.info(format!("Sui account: {address}"));
        Ok(address)
    }

    async fn refresh_address(&self) -> WalletResult<SuiAddress> {
        let generation = self.session.read().await.generation();

        let keypair = self.custody.derive_keypair().await?;
        let address = KeyCustody::compute_address(&keypair);
        self.custody.release(keypair);

        let mut session = self.session.write().await;
        // A logout or re-login while the key was fetched makes it stale.
        if !session.is_connected() || session.generation() != generation {
            return Err(WalletError::not_ready(
                "session changed while deriving the address",
            ));
        }
        session.bind_address(address);
        debug!(%address, generation, "bound session address");
        Ok(address)
    }

    /// SUI balance of the bound address, in display units.
    pub async fn get_balance(&self) -> Option<f64> {
        let result = self.try_get_balance().await;
        self.report("error fetching balance", result)
    }

    async fn try_get_balance(&self) -> WalletResult<f64> {
        self.require_provider().await?;
        let address = self
            .session
            .read()
            .await
            .address()
            .ok_or(WalletError::MissingAddress)?;

        self.console.info("Fetching balance");
        let balance = self.rpc.get_balance(&address).await?;
        let mist = balance.total_mist().map_err(WalletError::upstream)?;
        let sui = mist_to_sui(mist);

        info!(%address, mist = %mist, "fetched balance");
        self.console
            .info(format!("Sui Balance: {}", format_balance(mist, SUI_DECIMALS)));
        Ok(sui)
    }

    /// Ask the network faucet for test SUI. Only devnet and testnet qualify.
    pub async fn request_faucet_funds(&self) -> bool {
        let result = self.try_request_faucet_funds().await;
        self.report("Error requesting faucet", result).is_some()
    }

    async fn try_request_faucet_funds(&self) -> WalletResult<()> {
        self.require_provider().await?;
        if !self.chain.faucet_enabled() {
            return Err(WalletError::validation(
                "Requesting faucet is only supported for devnet/testnet",
            ));
        }
        let host = self.faucet_host.as_deref().ok_or_else(|| {
            WalletError::validation(format!("no faucet configured for {}", self.chain.network))
        })?;

        let address = self.refresh_address().await?;
        self.console.info("Requesting faucet...");
        self.rpc.request_faucet_funds(host, &address).await?;

        info!(%address, host, "faucet request accepted");
        self.console
            .info("Faucet request successful! Check your balance.");
        Ok(())
    }

    /// Transfer `amount` SUI from the session address to `recipient`.
    pub async fn send_transaction(&self, recipient: &str, amount: f64) -> Option<ExecutionResult> {
        let result = self.try_send_transaction(recipient, amount).await;
        self.report("error sending transaction", result)
    }

    async fn try_send_transaction(
        &self,
        recipient: &str,
        amount: f64,
    ) -> WalletResult<ExecutionResult> {
        self.require_provider().await?;
        let sender = self
            .session
            .read()
            .await
            .address()
            .ok_or_else(|| WalletError::not_ready("Address not available"))?;

        let recipient = recipient.trim();
        if recipient.is_empty() || amount.is_nan() || amount <= 0.0 {
            return Err(WalletError::validation(
                "recipientAddress and amount are required",
            ));
        }
        let recipient: SuiAddress = recipient
            .parse()
            .map_err(|e| WalletError::validation(format!("invalid recipient address: {e}")))?;
        let transfer = TransferRequest {
            sender,
            recipient,
            amount_mist: sui_to_mist(amount)?,
        };

        self.console.info("Sending transaction");
        let keypair = self.custody.derive_keypair().await?;
        if KeyCustody::compute_address(&keypair) != sender {
            self.custody.release(keypair);
            return Err(WalletError::not_ready(
                "session address does not match the signing key",
            ));
        }

        let executed = self
            .rpc
            .sign_and_execute_transaction(&keypair, &transfer)
            .await;
        self.custody.release(keypair);
        let executed = executed?;

        info!(
            digest = %executed.digest,
            amount_mist = transfer.amount_mist,
            explorer = %self.chain.explorer_tx_url(&executed.digest),
            "transaction executed"
        );
        self.console.info(format!(
            "transaction: {} amount: {} recipientAddress: {}",
            executed.digest, amount, recipient
        ));
        Ok(executed)
    }

    /// Sign `message` (or the default message) suffixed with a timestamp.
    pub async fn sign_message(&self, message: Option<&str>) -> Option<SignedMessage> {
        let result = self.try_sign_message(message).await;
        self.report("Error signing message", result)
    }

    async fn try_sign_message(&self, message: Option<&str>) -> WalletResult<SignedMessage> {
        self.require_provider().await?;

        let text = message
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_SIGN_MESSAGE);
        let timestamp = self.next_signing_timestamp()?;
        let payload = format!("{text} at {timestamp}");
        self.console.info(format!("Signing message: {payload}"));

        let keypair = self.custody.derive_keypair().await?;
        let signature = keypair.sign_personal_message(payload.as_bytes());
        let public_key = keypair.sui_public_key();
        let address = KeyCustody::compute_address(&keypair);
        self.custody.release(keypair);

        let signed = SignedMessage {
            message: payload,
            signature: signature?,
            public_key,
            address,
            timestamp,
        };
        let rendered = serde_json::to_string_pretty(&signed)
            .map_err(|e| WalletError::upstream(format!("unprintable signature: {e}")))?;
        self.console
            .info(format!("Message signed successfully: {rendered}"));
        Ok(signed)
    }

    /// ISO-8601 timestamp strictly later than the previous one.
    fn next_signing_timestamp(&self) -> WalletResult<String> {
        let mut last = self
            .last_signed_at
            .lock()
            .map_err(|_| WalletError::upstream("signing clock poisoned"))?;

        let now = Utc::now().timestamp_micros();
        let next = match *last {
            Some(previous) if now <= previous => previous + 1,
            _ => now,
        };
        *last = Some(next);

        let at = DateTime::<Utc>::from_timestamp_micros(next)
            .ok_or_else(|| WalletError::upstream("clock out of range"))?;
        Ok(at.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    /// Open the SDK's hosted wallet for this chain.
    pub async fn launch_wallet_services(&self) -> bool {
        let result = self.try_launch_wallet_services().await;
        self.report("error launching wallet services", result)
            .is_some()
    }

    async fn try_launch_wallet_services(&self) -> WalletResult<()> {
        if !self.auth.is_ready().await {
            return Err(WalletError::NotInitialized);
        }
        self.console.info("Launch Wallet Services");
        self.auth.sdk().launch_wallet_services(self.chain).await?;
        Ok(())
    }

    /// Have the SDK sign `"Hello World"` for the session address.
    pub async fn request_signature(&self) -> Option<Value> {
        let result = self.try_request_signature().await;
        self.report("error requesting signature", result)
    }

    async fn try_request_signature(&self) -> WalletResult<Value> {
        if !self.auth.is_ready().await {
            return Err(WalletError::NotInitialized);
        }
        self.require_provider().await?;

        let address = self.refresh_address().await?;
        self.console.info("Request Signature");
        let response = self
            .auth
            .sdk()
            .request(
                self.chain,
                "personal_sign",
                json!([SIGNATURE_REQUEST_MESSAGE, address.to_string()]),
            )
            .await?;
        self.console.info(response.to_string());
        Ok(response)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Fails unless the SDK is initialized and a provider is attached.
    async fn require_provider(&self) -> WalletResult<()> {
        let session = self.session.read().await;
        if !session.is_initialized() {
            return Err(WalletError::NotInitialized);
        }
        if session.provider().is_none() {
            return Err(WalletError::not_ready("provider not initialized yet"));
        }
        Ok(())
    }

    fn report<T>(&self, context: &str, result: WalletResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.console.error_in(context, &err);
                None
            }
        }
    }
}
