// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sui Wallet Session - Key Custody & Transaction Signing
//!
//! This crate turns the private key handed back by an external identity SDK
//! into a short-lived ed25519 signing identity, and mediates every Sui RPC
//! operation (balance, faucet, transfers, message signing) through it.
//!
//! ## Modules
//!
//! - `auth` - Identity SDK interface and the authentication session adapter
//! - `blockchain` - Sui chain registry, JSON-RPC client and signing primitives
//! - `custody` - Ephemeral keypairs that are zeroed after every operation
//! - `session` - The fail-soft wallet session facade
//! - `console` - User-facing audit log

pub mod auth;
pub mod blockchain;
pub mod cli;
pub mod config;
pub mod console;
pub mod custody;
pub mod error;
pub mod session;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{WalletError, WalletResult};
pub use session::{SignedMessage, WalletSession};
