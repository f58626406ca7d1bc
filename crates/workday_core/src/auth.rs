//! Shared-passphrase session gate.
//!
//! This is a convenience lock for a single-user tool, not an authentication
//! system: whoever can read the configuration can read the passphrase.
//!
//! # Invariants
//! - A session is valid for less than `SESSION_TTL_HOURS` after login.
//! - Expired or unreadable session documents are removed on check.
//! - Without a configured passphrase the gate is always open.

use crate::storage::{load_json, save_json, Collection, DocumentStore, StoreResult};
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub authenticated: bool,
    /// Login time in epoch milliseconds.
    pub timestamp_ms: i64,
}

impl SessionRecord {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if !self.authenticated {
            return false;
        }
        let elapsed_ms = now.timestamp_millis() - self.timestamp_ms;
        elapsed_ms >= 0 && elapsed_ms < Duration::hours(SESSION_TTL_HOURS).num_milliseconds()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Granted,
    Rejected,
}

pub struct AccessGate<S: DocumentStore> {
    store: S,
    passphrase: Option<String>,
}

impl<S: DocumentStore> AccessGate<S> {
    pub fn new(store: S, passphrase: Option<String>) -> Self {
        let passphrase = passphrase.filter(|value| !value.is_empty());
        Self { store, passphrase }
    }

    pub fn is_open(&self) -> bool {
        self.passphrase.is_none()
    }

    /// Checks `attempt` and records a session on match.
    pub fn login(&self, attempt: &str, now: DateTime<Utc>) -> StoreResult<LoginOutcome> {
        let Some(expected) = self.passphrase.as_deref() else {
            return Ok(LoginOutcome::Granted);
        };
        if attempt != expected {
            warn!("event=login module=auth status=rejected");
            return Ok(LoginOutcome::Rejected);
        }

        let record = SessionRecord {
            authenticated: true,
            timestamp_ms: now.timestamp_millis(),
        };
        save_json(&self.store, Collection::Session, &record)?;
        info!("event=login module=auth status=ok");
        Ok(LoginOutcome::Granted)
    }

    /// Whether a session recorded by `login` is still valid at `now`.
    pub fn is_authenticated(&self, now: DateTime<Utc>) -> bool {
        if self.is_open() {
            return true;
        }
        match load_json::<SessionRecord, _>(&self.store, Collection::Session) {
            Ok(Some(record)) if record.is_valid_at(now) => true,
            Ok(None) => false,
            Ok(Some(_)) => {
                info!("event=session_check module=auth status=expired");
                self.clear_session();
                false
            }
            Err(err) => {
                warn!("event=session_check module=auth status=error error={err}");
                self.clear_session();
                false
            }
        }
    }

    pub fn logout(&self) -> StoreResult<()> {
        self.store.remove(Collection::Session)?;
        info!("event=logout module=auth status=ok");
        Ok(())
    }

    fn clear_session(&self) {
        if let Err(err) = self.store.remove(Collection::Session) {
            warn!("event=session_clear module=auth status=error error={err}");
        }
    }
}
