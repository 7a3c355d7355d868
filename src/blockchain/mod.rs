// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration module for Sui.
//!
//! This module provides functionality for:
//! - Static chain configuration per network
//! - Querying chain identifier and SUI balances
//! - Building, signing and executing SUI transfers
//! - Requesting test network faucet funds

pub mod client;
pub mod faucet;
pub mod signing;
pub mod types;

pub use client::{ChainRpc, SuiClient, SuiClientError};
pub use signing::{IntentScope, TransactionSigner};
pub use types::*;
