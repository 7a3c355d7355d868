// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! UI console sink.
//!
//! Append-only, human readable record of every session operation, newest
//! entry first. It is the audit trail shown to the user; each entry is also
//! mirrored to `tracing`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::WalletError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleLevel {
    Info,
    Error,
}

/// A console entry.
#[derive(Debug, Clone, Serialize)]
pub struct ConsoleEntry {
    /// Unique entry ID.
    pub entry_id: String,
    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,
    pub level: ConsoleLevel,
    pub message: String,
    /// Error code when the entry reports a failure.
    pub error_code: Option<&'static str>,
}

/// Shared handle to the console log.
#[derive(Clone, Default)]
pub struct ConsoleLog {
    entries: Arc<Mutex<VecDeque<ConsoleEntry>>>,
}

impl ConsoleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an informational entry.
    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        info!(console = %message, "wallet console");
        self.push(ConsoleLevel::Info, message, None);
    }

    /// Record a failure with operation context, e.g. `"error fetching balance"`.
    pub fn error_in(&self, context: &str, err: &WalletError) {
        warn!(error_code = err.error_code(), error = %err, context, "wallet console");
        self.push(
            ConsoleLevel::Error,
            format!("{context}: {err}"),
            Some(err.error_code()),
        );
    }

    fn push(&self, level: ConsoleLevel, message: String, error_code: Option<&'static str>) {
        let entry = ConsoleEntry {
            entry_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            level,
            message,
            error_code,
        };
        self.lock().push_front(entry);
    }

    /// Entries are only ever prepended, so a poisoned deque is still consistent.
    fn lock(&self) -> MutexGuard<'_, VecDeque<ConsoleEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All entries, newest first.
    pub fn entries(&self) -> Vec<ConsoleEntry> {
        self.lock().iter().cloned().collect()
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<ConsoleEntry> {
        self.lock().front().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render the log for display, newest entry on top.
    pub fn render(&self) -> String {
        self.entries()
            .iter()
            .map(|entry| match entry.level {
                ConsoleLevel::Info => format!("[{}] {}", entry.timestamp.format("%H:%M:%S"), entry.message),
                ConsoleLevel::Error => format!(
                    "[{}] error: {}",
                    entry.timestamp.format("%H:%M:%S"),
                    entry.message
                ),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_newest_first() {
        let console = ConsoleLog::new();
        console.info("first");
        console.info("second");
        console.error_in("error fetching balance", &WalletError::MissingAddress);

        let entries = console.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].error_code, Some("missing_address"));
        assert_eq!(entries[1].message, "second");
        assert_eq!(entries[2].message, "first");
    }

    #[test]
    fn clones_share_the_same_log() {
        let console = ConsoleLog::new();
        let other = console.clone();
        other.info("from clone");
        assert_eq!(console.len(), 1);
        assert_eq!(console.latest().unwrap().message, "from clone");
    }

    #[test]
    fn error_in_prefixes_context() {
        let console = ConsoleLog::new();
        console.error_in("error fetching balance", &WalletError::upstream("timeout"));
        let latest = console.latest().unwrap();
        assert_eq!(latest.level, ConsoleLevel::Error);
        assert_eq!(latest.message, "error fetching balance: timeout");
        assert_eq!(latest.error_code, Some("upstream_error"));
    }

    #[test]
    fn poisoned_log_keeps_recording() {
        let console = ConsoleLog::new();
        console.info("before");

        let poisoner = console.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.lock().unwrap();
            panic!("poison the console lock");
        })
        .join();
        assert!(console.entries.is_poisoned());

        console.info("after");
        assert_eq!(console.len(), 2);
        assert_eq!(console.latest().unwrap().message, "after");
    }

    #[test]
    fn render_puts_newest_on_top() {
        let console = ConsoleLog::new();
        assert!(console.is_empty());
        console.info("Logging in");
        console.info("Logged In");
        let rendered = console.render();
        let top = rendered.lines().next().unwrap();
        assert!(top.ends_with("Logged In"));
        assert!(rendered.contains("Logging in"));
    }
}
