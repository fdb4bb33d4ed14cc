//! E-mail allow-list access control.
//!
//! Callers identify themselves with the `X-User-Email` header. Read-write addresses
//! can also read. Every write check happens before any ledger operation runs.

use axum::http::HeaderMap;
use compute::LedgerError;
use tracing::{debug, warn};

use crate::config::AppConfig;

pub const USER_EMAIL_HEADER: &str = "x-user-email";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Read,
    ReadWrite,
}

/// The two allow-lists, normalized for comparison.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    read_only: Vec<String>,
    read_write: Vec<String>,
    bypass: bool,
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AccessPolicy {
    pub fn new(read_only: &[String], read_write: &[String], bypass: bool) -> Self {
        let clean = |emails: &[String]| {
            emails
                .iter()
                .map(|e| normalize(e))
                .filter(|e| !e.is_empty())
                .collect::<Vec<_>>()
        };
        Self {
            read_only: clean(read_only),
            read_write: clean(read_write),
            bypass,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.read_only_emails,
            &config.read_write_emails,
            config.bypass_email_verification,
        )
    }

    /// Everyone gets read-write access.
    #[cfg(test)]
    pub fn open() -> Self {
        Self {
            bypass: true,
            ..Self::default()
        }
    }

    pub fn tier_of(&self, email: &str) -> Option<Tier> {
        if self.bypass {
            return Some(Tier::ReadWrite);
        }
        let email = normalize(email);
        if self.read_write.contains(&email) {
            Some(Tier::ReadWrite)
        } else if self.read_only.contains(&email) {
            Some(Tier::Read)
        } else {
            None
        }
    }

    /// Checks that the caller of a request holds at least `required`.
    pub fn authorize(&self, headers: &HeaderMap, required: Tier) -> Result<Tier, LedgerError> {
        let email = headers
            .get(USER_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        let Some(tier) = self.tier_of(email) else {
            warn!("Rejected request from unlisted e-mail '{}'", email);
            return Err(LedgerError::AccessDenied(format!(
                "Access denied. Email {} not authorized.",
                email.trim()
            )));
        };
        if tier < required {
            warn!("Rejected write from read-only e-mail '{}'", email);
            return Err(LedgerError::AccessDenied("Write access required".to_string()));
        }
        debug!("Authorized '{}' as {:?}", email, tier);
        Ok(tier)
    }
}
