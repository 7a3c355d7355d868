// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{WalletError, WalletResult};

/// Number of MIST in one SUI.
pub const MIST_PER_SUI: u64 = 1_000_000_000;

/// Decimals of the SUI coin.
pub const SUI_DECIMALS: u8 = 9;

/// Fully qualified type of the native coin.
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// Supported Sui networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Devnet,
    Testnet,
}

impl Network {
    /// Short network name (`mainnet`, `devnet`, `testnet`).
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
        }
    }

    /// Static chain configuration for this network.
    pub fn config(&self) -> &'static ChainConfig {
        match self {
            Network::Mainnet => &SUI_MAINNET,
            Network::Devnet => &SUI_DEVNET,
            Network::Testnet => &SUI_TESTNET,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "devnet" => Ok(Network::Devnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(format!(
                "unknown network `{other}` (expected mainnet, devnet or testnet)"
            )),
        }
    }
}

/// Sui network configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    /// Network this configuration belongs to
    pub network: Network,
    /// Chain ID as registered with the identity SDK
    pub chain_id: &'static str,
    /// Full node JSON-RPC endpoint
    pub rpc_url: &'static str,
    /// Network name for display
    pub display_name: &'static str,
    /// Block explorer URL
    pub explorer_url: &'static str,
    pub ticker: &'static str,
    pub ticker_name: &'static str,
    pub logo: &'static str,
    /// Faucet host (test networks only)
    pub faucet_url: Option<&'static str>,
}

const SUI_LOGO: &str = "https://cryptologos.cc/logos/sui-sui-logo.png?v=040";

/// Sui Mainnet configuration.
pub const SUI_MAINNET: ChainConfig = ChainConfig {
    network: Network::Mainnet,
    chain_id: "0x35834a8a",
    rpc_url: "https://fullnode.mainnet.sui.io:443",
    display_name: "Sui Mainnet",
    explorer_url: "https://suiscan.xyz/mainnet",
    ticker: "SUI",
    ticker_name: "Sui",
    logo: SUI_LOGO,
    faucet_url: None,
};

/// Sui Devnet configuration.
pub const SUI_DEVNET: ChainConfig = ChainConfig {
    network: Network::Devnet,
    chain_id: "0xfd2adfa8",
    rpc_url: "https://fullnode.devnet.sui.io:443",
    display_name: "Sui Devnet",
    explorer_url: "https://suiscan.xyz/devnet",
    ticker: "SUI",
    ticker_name: "Sui",
    logo: SUI_LOGO,
    faucet_url: Some("https://faucet.devnet.sui.io"),
};

/// Sui Testnet configuration.
pub const SUI_TESTNET: ChainConfig = ChainConfig {
    network: Network::Testnet,
    chain_id: "0x39a044aa",
    rpc_url: "https://fullnode.testnet.sui.io:443",
    display_name: "Sui Testnet",
    explorer_url: "https://suiscan.xyz/testnet",
    ticker: "SUI",
    ticker_name: "Sui",
    logo: SUI_LOGO,
    faucet_url: Some("https://faucet.testnet.sui.io"),
};

/// Networks on which faucet requests are allowed.
const FAUCET_NETWORKS: [&str; 2] = ["devnet", "testnet"];

impl ChainConfig {
    /// Whether faucet funds may be requested on this network.
    pub fn faucet_enabled(&self) -> bool {
        FAUCET_NETWORKS.contains(&self.network.name())
    }

    pub fn explorer_tx_url(&self, digest: &str) -> String {
        format!("{}/tx/{}", self.explorer_url, digest)
    }

    pub fn explorer_account_url(&self, address: &SuiAddress) -> String {
        format!("{}/account/{}", self.explorer_url, address)
    }
}

/// A 32-byte Sui account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SuiAddress(pub [u8; 32]);

impl SuiAddress {
    pub const LENGTH: usize = 32;

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiAddress({self})")
    }
}

impl FromStr for SuiAddress {
    type Err = String;

    /// Accepts `0x` followed by 1 to 64 hex digits; short forms are left-padded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix("0x")
            .ok_or_else(|| format!("address `{s}` must start with 0x"))?;

        if digits.is_empty() || digits.len() > Self::LENGTH * 2 {
            return Err(format!("address `{s}` must have 1 to 64 hex digits"));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("address `{s}` contains non-hex characters"));
        }

        let padded = format!("{:0>64}", digits);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&padded, &mut bytes).map_err(|e| e.to_string())?;
        Ok(SuiAddress(bytes))
    }
}

impl Serialize for SuiAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SuiAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Balance of one coin type as returned by `suix_getBalance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinBalance {
    pub coin_type: String,
    pub coin_object_count: u64,
    /// Balance in MIST, encoded as a decimal string on the wire
    pub total_balance: String,
}

impl CoinBalance {
    /// Total balance in MIST.
    pub fn total_mist(&self) -> Result<u128, String> {
        self.total_balance
            .parse::<u128>()
            .map_err(|e| format!("invalid totalBalance `{}`: {}", self.total_balance, e))
    }
}

/// Native SUI transfer from the session account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub sender: SuiAddress,
    pub recipient: SuiAddress,
    pub amount_mist: u64,
}

/// Outcome of a signed and executed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub digest: String,
    /// Effects status reported by the node (`success` or `failure`)
    pub status: String,
}

/// Convert MIST to SUI display units.
pub fn mist_to_sui(mist: u128) -> f64 {
    mist as f64 / MIST_PER_SUI as f64
}

/// Convert a SUI amount to MIST, rounding to the nearest MIST.
pub fn sui_to_mist(amount: f64) -> WalletResult<u64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(WalletError::validation("amount must be a positive number"));
    }

    let mist = (amount * MIST_PER_SUI as f64).round();
    if mist < 1.0 {
        return Err(WalletError::validation("amount is smaller than 1 MIST"));
    }
    if mist >= u64::MAX as f64 {
        return Err(WalletError::validation("amount is too large"));
    }

    Ok(mist as u64)
}

/// Fraction digits shown by [`format_balance`].
const DISPLAY_DECIMALS: usize = 6;

/// Render a base-unit balance in display units, truncated to six decimals.
pub fn format_balance(balance: u128, decimals: u8) -> String {
    let divisor = 10u128.pow(u32::from(decimals));
    let whole = balance / divisor;
    let fraction = format!(
        "{:0>width$}",
        balance % divisor,
        width = usize::from(decimals)
    );
    let shown = fraction[..fraction.len().min(DISPLAY_DECIMALS)].trim_end_matches('0');

    if shown.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{shown}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faucet_allow_list() {
        assert!(SUI_DEVNET.faucet_enabled());
        assert!(SUI_TESTNET.faucet_enabled());
        assert!(!SUI_MAINNET.faucet_enabled());
    }

    #[test]
    fn network_parsing() {
        assert_eq!("DevNet".parse::<Network>(), Ok(Network::Devnet));
        assert_eq!(" mainnet ".parse::<Network>(), Ok(Network::Mainnet));
        assert!("localnet".parse::<Network>().is_err());
        assert_eq!(Network::Testnet.config().display_name, "Sui Testnet");
    }

    #[test]
    fn address_round_trips_through_display() {
        let raw = "0x02a212de6a9dfa3a69e22387acfbafbb1a9e591bd9d636e7895dcfc8de05f331";
        let addr: SuiAddress = raw.parse().unwrap();
        assert_eq!(addr.to_string(), raw);
    }

    #[test]
    fn short_addresses_are_left_padded() {
        let addr: SuiAddress = "0x2".parse().unwrap();
        let mut expected = [0u8; 32];
        expected[31] = 2;
        assert_eq!(addr, SuiAddress(expected));
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        assert!("".parse::<SuiAddress>().is_err());
        assert!("0x".parse::<SuiAddress>().is_err());
        assert!("02a2".parse::<SuiAddress>().is_err());
        assert!("0xzz".parse::<SuiAddress>().is_err());
        assert!(format!("0x{}", "1".repeat(65)).parse::<SuiAddress>().is_err());
    }

    #[test]
    fn address_serializes_as_string() {
        let addr: SuiAddress = "0x2".parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{addr}\""));
        let back: SuiAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn format_balance_trims_trailing_zeros() {
        assert_eq!(format_balance(1_000_000_000, SUI_DECIMALS), "1");
        assert_eq!(format_balance(500_000_000, SUI_DECIMALS), "0.5");
        // truncated to 6 decimals
        assert_eq!(format_balance(1_234_567_891, SUI_DECIMALS), "1.234567");
        assert_eq!(format_balance(0, SUI_DECIMALS), "0");
    }

    #[test]
    fn format_balance_drops_digits_below_display_precision() {
        assert_eq!(format_balance(1_000_000_123, SUI_DECIMALS), "1");
        assert_eq!(format_balance(1_000_100_000, SUI_DECIMALS), "1.0001");
        assert_eq!(format_balance(123, SUI_DECIMALS), "0");
        assert_eq!(format_balance(42, 0), "42");
    }

    #[test]
    fn mist_conversions() {
        assert_eq!(mist_to_sui(1_500_000_000), 1.5);
        assert_eq!(sui_to_mist(0.1).unwrap(), 100_000_000);
        assert_eq!(sui_to_mist(2.0).unwrap(), 2_000_000_000);
    }

    #[test]
    fn invalid_amounts_are_validation_errors() {
        for amount in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e-12, 1e30] {
            let err = sui_to_mist(amount).unwrap_err();
            assert_eq!(err.error_code(), "validation_error", "amount {amount}");
        }
    }

    #[test]
    fn coin_balance_parses_wire_format() {
        let balance: CoinBalance = serde_json::from_str(
            r#"{"coinType":"0x2::sui::SUI","coinObjectCount":3,"totalBalance":"2500000000","lockedBalance":{}}"#,
        )
        .unwrap();
        assert_eq!(balance.total_mist().unwrap(), 2_500_000_000);
    }
}
