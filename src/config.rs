// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `WALLET_CLIENT_ID` | Identity SDK client identifier | Required for login |
//! | `SUI_NETWORK` | `mainnet`, `devnet` or `testnet` | `devnet` |
//! | `SUI_RPC_URL` | Full node JSON-RPC endpoint override | Network default |
//! | `SUI_FAUCET_URL` | Faucet host override | Network default |
//! | `AUTH_NETWORK` | `sapphire_devnet` or `sapphire_mainnet` | `sapphire_devnet` |
//! | `AUTH_REDIRECT_URL` | Redirect target handed to the SDK on login | `web3login://auth` |
//! | `SUI_GAS_BUDGET` | Gas budget for transfers, in MIST | `10000000` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |
//!
//! A missing client id is not a startup error: the authentication adapter
//! stays unready and every operation reports "not initialized".

use std::env;

use crate::auth::{AuthConfig, AuthNetwork};
use crate::blockchain::{ChainConfig, Network};

/// Environment variable name for the identity SDK client identifier.
pub const CLIENT_ID_ENV: &str = "WALLET_CLIENT_ID";

/// Environment variable name for the Sui network selection.
pub const NETWORK_ENV: &str = "SUI_NETWORK";

/// Environment variable name for the RPC endpoint override.
pub const RPC_URL_ENV: &str = "SUI_RPC_URL";

/// Environment variable name for the faucet host override.
pub const FAUCET_URL_ENV: &str = "SUI_FAUCET_URL";

/// Environment variable name for the identity SDK network.
pub const AUTH_NETWORK_ENV: &str = "AUTH_NETWORK";

/// Environment variable name for the login redirect target.
pub const REDIRECT_URL_ENV: &str = "AUTH_REDIRECT_URL";

/// Environment variable name for the transfer gas budget.
pub const GAS_BUDGET_ENV: &str = "SUI_GAS_BUDGET";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Redirect target used when `AUTH_REDIRECT_URL` is unset.
pub const DEFAULT_REDIRECT_URL: &str = "web3login://auth";

/// Gas budget (0.01 SUI) used when `SUI_GAS_BUDGET` is unset.
pub const DEFAULT_GAS_BUDGET: u64 = 10_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Application configuration resolved at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client_id: Option<String>,
    pub network: Network,
    pub rpc_url: Option<String>,
    pub faucet_url: Option<String>,
    pub auth_network: AuthNetwork,
    pub redirect_url: String,
    pub gas_budget: u64,
    pub log_format: LogFormat,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let network = match get(NETWORK_ENV) {
            Some(raw) => raw.parse::<Network>().map_err(|reason| ConfigError::InvalidValue {
                name: NETWORK_ENV,
                reason,
            })?,
            None => Network::Devnet,
        };

        let auth_network = match get(AUTH_NETWORK_ENV) {
            Some(raw) => raw
                .parse::<AuthNetwork>()
                .map_err(|reason| ConfigError::InvalidValue {
                    name: AUTH_NETWORK_ENV,
                    reason,
                })?,
            None => AuthNetwork::default(),
        };

        let gas_budget = match get(GAS_BUDGET_ENV) {
            Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                name: GAS_BUDGET_ENV,
                reason: e.to_string(),
            })?,
            None => DEFAULT_GAS_BUDGET,
        };

        let log_format = match get(LOG_FORMAT_ENV).map(|v| v.to_ascii_lowercase()) {
            Some(v) if v == "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            client_id: get(CLIENT_ID_ENV),
            network,
            rpc_url: get(RPC_URL_ENV),
            faucet_url: get(FAUCET_URL_ENV),
            auth_network,
            redirect_url: get(REDIRECT_URL_ENV).unwrap_or_else(|| DEFAULT_REDIRECT_URL.to_string()),
            gas_budget,
            log_format,
        })
    }

    /// Chain configuration for the selected network.
    pub fn chain(&self) -> &'static ChainConfig {
        self.network.config()
    }

    /// RPC endpoint, honouring the override.
    pub fn rpc_endpoint(&self) -> &str {
        self.rpc_url.as_deref().unwrap_or(self.chain().rpc_url)
    }

    /// Faucet host, honouring the override. `None` on networks without a faucet.
    pub fn faucet_host(&self) -> Option<&str> {
        self.faucet_url.as_deref().or(self.chain().faucet_url)
    }

    /// Identity SDK settings for the authentication adapter.
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            client_id: self.client_id.clone(),
            network: self.auth_network,
            redirect_url: self.redirect_url.clone(),
        }
    }
}
