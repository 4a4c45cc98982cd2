//! Login sessions created after the one-time-passcode step, and the contact
//! validation shared with reminder recipients.
//!
//! The poller calls [`UserSession::is_expired`] with its own clock reading;
//! nothing here reads the wall clock.

use crate::{
    core::datetime,
    errors::{Error, Result},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Default session lifetime after a successful login.
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 24 * 60;

/// A signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    /// Email the user signed in with; also scopes their stored data
    pub email: String,
    /// When the passcode was verified
    pub logged_in_at: NaiveDateTime,
    /// First moment the session is no longer valid
    pub expires_at: NaiveDateTime,
}

impl UserSession {
    /// Opens a session for `email` lasting `ttl_minutes` from `now`.
    ///
    /// The email is trimmed and lowercased so storage keys stay stable.
    ///
    /// # Errors
    /// - [`Error::InvalidEmail`] for a malformed address
    /// - [`Error::InvalidDuration`] for a non-positive lifetime
    pub fn start(email: &str, now: NaiveDateTime, ttl_minutes: i64) -> Result<Self> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(Error::InvalidEmail { email });
        }
        if ttl_minutes <= 0 {
            return Err(Error::InvalidDuration {
                minutes: ttl_minutes,
            });
        }

        Ok(Self {
            expires_at: datetime::add_minutes(now, ttl_minutes)?,
            email,
            logged_in_at: now,
        })
    }

    /// Expired once `now` reaches `expires_at`.
    #[must_use]
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        now >= self.expires_at
    }
}

/// Trimmed and lowercased, the form used for session emails and storage keys.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// An optional leading `+` followed by at least ten digits, spaces, dashes
/// or parentheses, e.g. `+1 (555) 010-0199`.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    let trimmed = phone.trim();
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
    body.chars().count() >= 10
        && body.chars().any(|c| c.is_ascii_digit())
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'))
}
