// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Key Custody
//!
//! Short-lived signing keys.
//!
//! The wallet never stores a decoded private key. Each operation that needs
//! one asks [`KeyCustody::derive_keypair`] for a fresh [`EphemeralKeypair`],
//! uses it, and hands it back to [`KeyCustody::release`]. Error paths rely on
//! the keypair's `Drop`, which zeroes the secret the same way.

pub mod keypair;

pub use keypair::EphemeralKeypair;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::auth::AuthSessionAdapter;
use crate::blockchain::SuiAddress;
use crate::error::WalletResult;

pub struct KeyCustody {
    auth: Arc<AuthSessionAdapter>,
    outstanding: Arc<AtomicUsize>,
}

impl KeyCustody {
    pub fn new(auth: Arc<AuthSessionAdapter>) -> Self {
        Self {
            auth,
            outstanding: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Derive the session keypair from the provider's key material.
    ///
    /// Fails with `NotAuthenticated` when no provider is attached.
    pub async fn derive_keypair(&self) -> WalletResult<EphemeralKeypair> {
        let material = self.auth.raw_key_material().await?;
        let keypair = EphemeralKeypair::from_key_material(&material)?;
        debug!(address = %keypair.address(), "derived ephemeral keypair");
        Ok(keypair.tracked_by(self.outstanding.clone()))
    }

    pub fn compute_address(keypair: &EphemeralKeypair) -> SuiAddress {
        keypair.address()
    }

    /// Zero the keypair's secret and drop it.
    pub fn release(&self, mut keypair: EphemeralKeypair) {
        keypair.release();
        debug!(address = %keypair.address(), "released ephemeral keypair");
    }

    /// Keypairs derived by this manager that still hold their secret.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }
}
