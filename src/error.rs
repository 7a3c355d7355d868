// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session error taxonomy.
//!
//! Internal helpers return `Result<T, WalletError>` and propagate with `?`.
//! Only the public [`WalletSession`](crate::session::WalletSession) boundary
//! turns an error into a console entry and an absent result.

use crate::auth::SdkError;
use crate::blockchain::SuiClientError;

/// Errors surfaced by the wallet session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    /// The identity SDK was never initialized (or its configuration is missing).
    #[error("Identity SDK not initialized")]
    NotInitialized,

    /// The operation needs an authenticated session.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// A caller-supplied argument is missing or invalid.
    #[error("{0}")]
    Validation(String),

    /// The provider or session address is not available yet.
    #[error("{0}")]
    NotReady(String),

    /// No wallet address is bound to the session.
    #[error("address not initialized yet")]
    MissingAddress,

    /// Failure reported by the identity SDK or the RPC transport.
    #[error("{0}")]
    Upstream(String),
}

impl WalletError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_ready(message: impl Into<String>) -> Self {
        Self::NotReady(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Get the machine readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            WalletError::NotInitialized => "not_initialized",
            WalletError::NotAuthenticated => "not_authenticated",
            WalletError::Validation(_) => "validation_error",
            WalletError::NotReady(_) => "not_ready",
            WalletError::MissingAddress => "missing_address",
            WalletError::Upstream(_) => "upstream_error",
        }
    }
}

impl From<SuiClientError> for WalletError {
    fn from(err: SuiClientError) -> Self {
        WalletError::Upstream(err.to_string())
    }
}

impl From<SdkError> for WalletError {
    fn from(err: SdkError) -> Self {
        match err {
            SdkError::NotInitialized => WalletError::NotInitialized,
            other => WalletError::Upstream(other.to_string()),
        }
    }
}

pub type WalletResult<T> = Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(WalletError::NotInitialized.error_code(), "not_initialized");
        assert_eq!(WalletError::NotAuthenticated.error_code(), "not_authenticated");
        assert_eq!(WalletError::validation("x").error_code(), "validation_error");
        assert_eq!(WalletError::not_ready("x").error_code(), "not_ready");
        assert_eq!(WalletError::MissingAddress.error_code(), "missing_address");
        assert_eq!(WalletError::upstream("x").error_code(), "upstream_error");
    }

    #[test]
    fn upstream_errors_keep_their_message() {
        let err: WalletError = SuiClientError::Rpc("node unavailable".into()).into();
        assert_eq!(err.error_code(), "upstream_error");
        assert!(err.to_string().contains("node unavailable"));
    }

    #[test]
    fn sdk_not_initialized_maps_to_not_initialized() {
        let err: WalletError = SdkError::NotInitialized.into();
        assert_eq!(err, WalletError::NotInitialized);
    }
}
