// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sui full node client for blockchain interactions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64ct::{Base64, Encoding};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::faucet;
use super::signing::TransactionSigner;
use super::types::*;

/// HTTP timeout for JSON-RPC and faucet calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of coins fetched to fund a transfer.
const MAX_INPUT_COINS: usize = 50;

/// Operations the wallet session needs from a Sui node.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Chain identifier reported by the node.
    async fn get_chain_identifier(&self) -> Result<String, SuiClientError>;

    /// Total SUI balance owned by `owner`.
    async fn get_balance(&self, owner: &SuiAddress) -> Result<CoinBalance, SuiClientError>;

    /// Build the transfer, sign it with `signer` and execute it.
    async fn sign_and_execute_transaction(
        &self,
        signer: &dyn TransactionSigner,
        transfer: &TransferRequest,
    ) -> Result<ExecutionResult, SuiClientError>;

    /// Ask the faucet at `host` to fund `recipient`.
    async fn request_faucet_funds(
        &self,
        host: &str,
        recipient: &SuiAddress,
    ) -> Result<(), SuiClientError>;
}

/// Sui JSON-RPC client.
pub struct SuiClient {
    endpoint: url::Url,
    gas_budget: u64,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl SuiClient {
    /// Create a new client for the given JSON-RPC endpoint.
    pub fn new(endpoint: &str, gas_budget: u64) -> Result<Self, SuiClientError> {
        let endpoint: url::Url = endpoint
            .parse()
            .map_err(|e: url::ParseError| SuiClientError::InvalidRpcUrl(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SuiClientError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint,
            gas_budget,
            http,
            next_id: AtomicU64::new(1),
        })
    }

    /// Create a client for the default endpoint of `chain`.
    pub fn for_chain(chain: &ChainConfig, gas_budget: u64) -> Result<Self, SuiClientError> {
        Self::new(chain.rpc_url, gas_budget)
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }

    /// Issue a JSON-RPC call and decode its `result`.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, SuiClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = rpc_request(id, method, params);
        debug!(method, id, "Sui RPC call");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| SuiClientError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SuiClientError::Transport(format!(
                "HTTP {} from {}",
                response.status(),
                method
            )));
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| SuiClientError::InvalidResponse(e.to_string()))?;

        decode_rpc_response(method, envelope)
    }

    async fn get_sui_coins(&self, owner: &SuiAddress) -> Result<Vec<CoinRef>, SuiClientError> {
        let page: CoinPage = self
            .call(
                "suix_getCoins",
                json!([owner.to_string(), SUI_COIN_TYPE, Value::Null, MAX_INPUT_COINS]),
            )
            .await?;
        Ok(page.data)
    }
}

#[async_trait]
impl ChainRpc for SuiClient {
    async fn get_chain_identifier(&self) -> Result<String, SuiClientError> {
        self.call("sui_getChainIdentifier", json!([])).await
    }

    async fn get_balance(&self, owner: &SuiAddress) -> Result<CoinBalance, SuiClientError> {
        self.call("suix_getBalance", json!([owner.to_string(), SUI_COIN_TYPE]))
            .await
    }

    async fn sign_and_execute_transaction(
        &self,
        signer: &dyn TransactionSigner,
        transfer: &TransferRequest,
    ) -> Result<ExecutionResult, SuiClientError> {
        if signer.address() != transfer.sender {
            return Err(SuiClientError::Signing(
                "signer does not own the sending address".to_string(),
            ));
        }

        let coins = self.get_sui_coins(&transfer.sender).await?;
        let input_coins = select_input_coins(&coins, transfer.amount_mist, self.gas_budget)?;

        // The node assembles the transfer; the first input coin pays for gas.
        let built: TransactionBytes = self
            .call(
                "unsafe_paySui",
                json!([
                    transfer.sender.to_string(),
                    input_coins,
                    [transfer.recipient.to_string()],
                    [transfer.amount_mist.to_string()],
                    self.gas_budget.to_string(),
                ]),
            )
            .await?;

        let tx_bytes = Base64::decode_vec(&built.tx_bytes)
            .map_err(|e| SuiClientError::InvalidResponse(format!("txBytes is not base64: {e}")))?;
        let signature = signer
            .sign_transaction(&tx_bytes)
            .map_err(SuiClientError::Signing)?;

        let response: Value = self
            .call(
                "sui_executeTransactionBlock",
                json!([
                    built.tx_bytes,
                    [signature],
                    { "showEffects": true },
                    "WaitForLocalExecution"
                ]),
            )
            .await?;

        let result = parse_execution(&response)?;
        info!(digest = %result.digest, amount_mist = transfer.amount_mist, "Transfer executed");
        Ok(result)
    }

    async fn request_faucet_funds(
        &self,
        host: &str,
        recipient: &SuiAddress,
    ) -> Result<(), SuiClientError> {
        faucet::request_funds(&self.http, host, recipient).await
    }
}

fn rpc_request(id: u64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Extract `result` from a JSON-RPC envelope, surfacing `error` objects.
fn decode_rpc_response<T: DeserializeOwned>(method: &str, envelope: Value) -> Result<T, SuiClientError> {
    if let Some(error) = envelope.get("error") {
        let error: RpcErrorObject = serde_json::from_value(error.clone())
            .map_err(|e| SuiClientError::InvalidResponse(format!("{method}: {e}")))?;
        return Err(SuiClientError::Rpc(format!(
            "{method} failed ({}): {}",
            error.code, error.message
        )));
    }

    let result = envelope
        .get("result")
        .cloned()
        .ok_or_else(|| SuiClientError::InvalidResponse(format!("{method}: missing result")))?;

    serde_json::from_value(result)
        .map_err(|e| SuiClientError::InvalidResponse(format!("{method}: {e}")))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinRef {
    coin_object_id: String,
    balance: String,
}

#[derive(Debug, Deserialize)]
struct CoinPage {
    data: Vec<CoinRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionBytes {
    tx_bytes: String,
}

/// Pick coins (largest first) until they cover the amount plus gas.
fn select_input_coins(
    coins: &[CoinRef],
    amount_mist: u64,
    gas_budget: u64,
) -> Result<Vec<String>, SuiClientError> {
    let mut sorted: Vec<(u128, &CoinRef)> = coins
        .iter()
        .filter_map(|c| c.balance.parse::<u128>().ok().map(|b| (b, c)))
        .collect();
    sorted.sort_by(|a, b| b.0.cmp(&a.0));

    let needed = amount_mist as u128 + gas_budget as u128;
    let mut total = 0u128;
    let mut selected = Vec::new();
    for (balance, coin) in sorted {
        selected.push(coin.coin_object_id.clone());
        total += balance;
        if total >= needed {
            return Ok(selected);
        }
    }

    Err(SuiClientError::InsufficientFunds {
        available: total,
        required: needed,
    })
}

/// Read digest and effects status from `sui_executeTransactionBlock`.
fn parse_execution(response: &Value) -> Result<ExecutionResult, SuiClientError> {
    let digest = response
        .get("digest")
        .and_then(Value::as_str)
        .ok_or_else(|| SuiClientError::InvalidResponse("missing transaction digest".to_string()))?
        .to_string();

    let status = response
        .pointer("/effects/status/status")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    if status == "failure" {
        let reason = response
            .pointer("/effects/status/error")
            .and_then(Value::as_str)
            .unwrap_or("no error reported");
        return Err(SuiClientError::TransactionFailed(format!("{digest}: {reason}")));
    }

    Ok(ExecutionResult { digest, status })
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, thiserror::Error)]
pub enum SuiClientError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Faucet request failed: {0}")]
    Faucet(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Insufficient funds: {available} MIST available, {required} MIST required")]
    InsufficientFunds { available: u128, required: u128 },
}
