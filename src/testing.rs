// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Test doubles shared by the unit tests.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;
use zeroize::Zeroizing;

use crate::auth::{AuthSdk, LocalAuthSdk, LoginParams, SdkError, SdkInitParams, UserInfo};
use crate::blockchain::signing::verify_serialized_signature;
use crate::blockchain::{
    ChainConfig, ChainRpc, CoinBalance, ExecutionResult, IntentScope, SuiAddress, SuiClientError,
    TransactionSigner, TransferRequest, SUI_COIN_TYPE,
};

/// Transaction bytes the mock "builds" for every transfer.
pub(crate) const MOCK_TX_BYTES: &[u8] = b"mock-transfer";

/// In-memory [`ChainRpc`] that records every call.
#[derive(Default)]
pub(crate) struct MockRpc {
    balance_mist: AtomicU64,
    fail: AtomicBool,
    chain_calls: AtomicUsize,
    balance_calls: AtomicUsize,
    transfer_calls: AtomicUsize,
    faucet_calls: AtomicUsize,
    last_transfer: Mutex<Option<TransferRequest>>,
    faucet_hosts: Mutex<Vec<String>>,
}

impl MockRpc {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_balance(self, mist: u64) -> Self {
        self.balance_mist.store(mist, Ordering::SeqCst);
        self
    }

    pub(crate) fn fail_requests(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Total number of calls of any kind.
    pub(crate) fn calls(&self) -> usize {
        self.chain_calls.load(Ordering::SeqCst)
            + self.balance_calls.load(Ordering::SeqCst)
            + self.transfer_calls.load(Ordering::SeqCst)
            + self.faucet_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn transfer_calls(&self) -> usize {
        self.transfer_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn faucet_calls(&self) -> usize {
        self.faucet_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_transfer(&self) -> Option<TransferRequest> {
        self.last_transfer.lock().ok()?.clone()
    }

    pub(crate) fn faucet_hosts(&self) -> Vec<String> {
        self.faucet_hosts
            .lock()
            .map(|hosts| hosts.clone())
            .unwrap_or_default()
    }

    fn check(&self) -> Result<(), SuiClientError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SuiClientError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChainRpc for MockRpc {
    async fn get_chain_identifier(&self) -> Result<String, SuiClientError> {
        self.chain_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok("fd2adfa8".to_string())
    }

    async fn get_balance(&self, _owner: &SuiAddress) -> Result<CoinBalance, SuiClientError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(CoinBalance {
            coin_type: SUI_COIN_TYPE.to_string(),
            coin_object_count: 1,
            total_balance: self.balance_mist.load(Ordering::SeqCst).to_string(),
        })
    }

    async fn sign_and_execute_transaction(
        &self,
        signer: &dyn TransactionSigner,
        transfer: &TransferRequest,
    ) -> Result<ExecutionResult, SuiClientError> {
        self.transfer_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let signature = signer
            .sign_transaction(MOCK_TX_BYTES)
            .map_err(SuiClientError::Signing)?;
        let signed_by =
            verify_serialized_signature(IntentScope::TransactionData, MOCK_TX_BYTES, &signature)
                .map_err(SuiClientError::Signing)?;
        if signed_by != transfer.sender {
            return Err(SuiClientError::Signing("signer is not the sender".to_string()));
        }

        if let Ok(mut last) = self.last_transfer.lock() {
            *last = Some(transfer.clone());
        }
        Ok(ExecutionResult {
            digest: "9vYqZk2mXc1mockdigest".to_string(),
            status: "success".to_string(),
        })
    }

    async fn request_faucet_funds(
        &self,
        host: &str,
        _recipient: &SuiAddress,
    ) -> Result<(), SuiClientError> {
        self.faucet_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        if let Ok(mut hosts) = self.faucet_hosts.lock() {
            hosts.push(host.to_string());
        }
        Ok(())
    }
}

/// [`LocalAuthSdk`] wrapper that counts calls and can be told to fail.
#[derive(Default)]
pub(crate) struct FlakySdk {
    inner: LocalAuthSdk,
    fail_logins: AtomicBool,
    fail_init: AtomicBool,
    login_calls: AtomicUsize,
    logout_calls: AtomicUsize,
}

impl FlakySdk {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_logins(&self, fail: bool) {
        self.fail_logins.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_init(&self, fail: bool) {
        self.fail_init.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthSdk for FlakySdk {
    async fn init(&self, params: &SdkInitParams) -> Result<(), SdkError> {
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(SdkError::Other("storage unavailable".to_string()));
        }
        self.inner.init(params).await
    }

    fn ready(&self) -> bool {
        self.inner.ready()
    }

    fn connected(&self) -> bool {
        self.inner.connected()
    }

    async fn login(&self, params: LoginParams) -> Result<(), SdkError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_logins.load(Ordering::SeqCst) {
            return Err(SdkError::Login("user closed the login window".to_string()));
        }
        self.inner.login(params).await
    }

    async fn logout(&self) -> Result<(), SdkError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.logout().await
    }

    async fn user_info(&self) -> Result<UserInfo, SdkError> {
        self.inner.user_info().await
    }

    async fn private_key(&self) -> Result<Zeroizing<String>, SdkError> {
        self.inner.private_key().await
    }

    async fn request(
        &self,
        chain: &ChainConfig,
        method: &str,
        params: Value,
    ) -> Result<Value, SdkError> {
        self.inner.request(chain, method, params).await
    }

    async fn launch_wallet_services(&self, chain: &ChainConfig) -> Result<(), SdkError> {
        self.inner.launch_wallet_services(chain).await
    }
}

/// [`LocalAuthSdk`] wrapper whose `private_key` can be held open.
///
/// When gated, `private_key` reads the key of the current login and then
/// waits for [`GatedSdk::open`] before returning it.
#[derive(Default)]
pub(crate) struct GatedSdk {
    inner: LocalAuthSdk,
    gated: AtomicBool,
    key_read: Notify,
    opened: Notify,
}

impl GatedSdk {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn gate(&self, gated: bool) {
        self.gated.store(gated, Ordering::SeqCst);
    }

    /// Wait until a gated `private_key` call has read its key.
    pub(crate) async fn key_read(&self) {
        self.key_read.notified().await;
    }

    /// Let the waiting `private_key` call return.
    pub(crate) fn open(&self) {
        self.opened.notify_one();
    }
}

#[async_trait]
impl AuthSdk for GatedSdk {
    async fn init(&self, params: &SdkInitParams) -> Result<(), SdkError> {
        self.inner.init(params).await
    }

    fn ready(&self) -> bool {
        self.inner.ready()
    }

    fn connected(&self) -> bool {
        self.inner.connected()
    }

    async fn login(&self, params: LoginParams) -> Result<(), SdkError> {
        self.inner.login(params).await
    }

    async fn logout(&self) -> Result<(), SdkError> {
        self.inner.logout().await
    }

    async fn user_info(&self) -> Result<UserInfo, SdkError> {
        self.inner.user_info().await
    }

    async fn private_key(&self) -> Result<Zeroizing<String>, SdkError> {
        let key = self.inner.private_key().await?;
        if self.gated.load(Ordering::SeqCst) {
            self.key_read.notify_one();
            self.opened.notified().await;
        }
        Ok(key)
    }

    async fn request(
        &self,
        chain: &ChainConfig,
        method: &str,
        params: Value,
    ) -> Result<Value, SdkError> {
        self.inner.request(chain, method, params).await
    }

    async fn launch_wallet_services(&self, chain: &ChainConfig) -> Result<(), SdkError> {
        self.inner.launch_wallet_services(chain).await
    }
}
