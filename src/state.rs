// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared session state.
//!
//! One [`SharedSession`] is created by the application root and handed to the
//! authentication adapter and the session facade. All transitions take the
//! write lock.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::blockchain::SuiAddress;

/// Handle to the key provider attached by the identity SDK after login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderHandle {
    /// Login provider that produced the session (`google`, ...).
    pub login_provider: String,
    pub chain_id: &'static str,
}

/// The authenticated state.
#[derive(Debug, Default)]
pub struct Session {
    initialized: bool,
    connected: bool,
    provider: Option<ProviderHandle>,
    address: Option<SuiAddress>,
    /// Bumped on every connect and disconnect.
    generation: u64,
}

impl Session {
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// The attached provider; absent while disconnected.
    pub fn provider(&self) -> Option<&ProviderHandle> {
        self.provider.as_ref().filter(|_| self.connected)
    }

    /// The derived address; absent while disconnected, even if a stale one remains.
    pub fn address(&self) -> Option<SuiAddress> {
        self.address.filter(|_| self.connected)
    }

    /// Identifies the current login. Work that started under another
    /// generation must not write into the session.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    pub(crate) fn connect(&mut self, provider: ProviderHandle) {
        self.connected = true;
        self.provider = Some(provider);
        self.generation += 1;
    }

    /// Drop the provider and every value derived from it.
    pub(crate) fn disconnect(&mut self) {
        self.connected = false;
        self.provider = None;
        self.address = None;
        self.generation += 1;
    }

    /// Only the custody path binds addresses; callers cannot set one directly.
    pub(crate) fn bind_address(&mut self, address: SuiAddress) {
        self.address = Some(address);
    }

    pub(crate) fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Session {
            generation,
            ..Session::default()
        };
    }
}

pub type SharedSession = Arc<RwLock<Session>>;

pub fn new_shared_session() -> SharedSession {
    Arc::new(RwLock::new(Session::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> ProviderHandle {
        ProviderHandle {
            login_provider: "google".to_string(),
            chain_id: "0xfd2adfa8",
        }
    }

    #[test]
    fn stale_values_are_hidden_while_disconnected() {
        let mut session = Session::default();
        session.connect(provider());
        session.bind_address(SuiAddress([1u8; 32]));
        assert!(session.address().is_some());

        session.connected = false;
        assert!(session.address().is_none());
        assert!(session.provider().is_none());
    }

    #[test]
    fn disconnect_clears_derived_state() {
        let mut session = Session::default();
        session.mark_initialized();
        session.connect(provider());
        session.bind_address(SuiAddress([1u8; 32]));
        session.disconnect();

        assert!(session.is_initialized());
        assert!(!session.is_connected());
        assert!(session.address.is_none());
        assert!(session.provider.is_none());
    }

    #[test]
    fn every_transition_starts_a_new_generation() {
        let mut session = Session::default();
        let mut seen = vec![session.generation()];

        session.connect(provider());
        seen.push(session.generation());
        session.bind_address(SuiAddress([1u8; 32]));
        assert_eq!(session.generation(), *seen.last().unwrap());

        session.disconnect();
        seen.push(session.generation());
        session.connect(provider());
        seen.push(session.generation());
        session.reset();
        seen.push(session.generation());

        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn reset_returns_to_uninitialized() {
        let mut session = Session::default();
        session.mark_initialized();
        session.connect(provider());
        session.reset();
        assert!(!session.is_initialized());
        assert!(!session.is_connected());
    }
}
