// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sui faucet (v2 gas endpoint).

use serde_json::{json, Value};
use tracing::info;

use super::client::SuiClientError;
use super::types::SuiAddress;

/// Faucet gas endpoint relative to the faucet host.
const GAS_PATH: &str = "/v2/gas";

pub(crate) fn gas_url(host: &str) -> String {
    format!("{}{}", host.trim_end_matches('/'), GAS_PATH)
}

pub(crate) fn gas_request_body(recipient: &SuiAddress) -> Value {
    json!({
        "FixedAmountRequest": {
            "recipient": recipient.to_string(),
        }
    })
}

/// Interpret a faucet v2 response body.
///
/// Success is `{"status":"Success", ...}`; failures carry
/// `{"status":{"Failure":{...}}}`.
pub(crate) fn check_faucet_response(body: &Value) -> Result<(), SuiClientError> {
    match body.get("status") {
        Some(Value::String(status)) if status == "Success" => Ok(()),
        Some(other) => Err(SuiClientError::Faucet(other.to_string())),
        None => Err(SuiClientError::Faucet(format!("unexpected response: {body}"))),
    }
}

pub(crate) async fn request_funds(
    http: &reqwest::Client,
    host: &str,
    recipient: &SuiAddress,
) -> Result<(), SuiClientError> {
    let url = gas_url(host);
    let response = http
        .post(&url)
        .json(&gas_request_body(recipient))
        .send()
        .await
        .map_err(|e| SuiClientError::Transport(e.to_string()))?;

    let status = response.status();
    if status.as_u16() == 429 {
        return Err(SuiClientError::Faucet(
            "rate limited, try again later".to_string(),
        ));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| SuiClientError::InvalidResponse(format!("faucet: {e}")))?;

    if !status.is_success() {
        return Err(SuiClientError::Faucet(format!("HTTP {status}: {body}")));
    }

    check_faucet_response(&body)?;
    info!(recipient = %recipient, host, "Faucet request accepted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gas_url_tolerates_trailing_slash() {
        assert_eq!(gas_url("https://faucet.devnet.sui.io/"), "https://faucet.devnet.sui.io/v2/gas");
        assert_eq!(gas_url("https://faucet.devnet.sui.io"), "https://faucet.devnet.sui.io/v2/gas");
    }

    #[test]
    fn request_body_names_recipient() {
        let recipient: SuiAddress = "0x2".parse().unwrap();
        let body = gas_request_body(&recipient);
        assert_eq!(body["FixedAmountRequest"]["recipient"], recipient.to_string());
    }

    #[test]
    fn response_status_is_checked() {
        assert!(check_faucet_response(&json!({"status": "Success", "coins_sent": []})).is_ok());
        assert!(check_faucet_response(&json!({"status": {"Failure": {"Internal": "oops"}}})).is_err());
        assert!(check_faucet_response(&json!({})).is_err());
    }
}
