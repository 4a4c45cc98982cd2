//! Reminder records for classes and payments.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// What a reminder is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    /// An upcoming class
    Session,
    /// A payment due date
    Payment,
}

/// A notification that should fire at `fire_at`.
///
/// `sent` only ever goes from `false` to `true`; use [`Reminder::mark_sent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Unique identifier
    pub id: String,
    /// Class or payment reminder
    pub kind: ReminderKind,
    /// Id of the class occurrence or payment this reminder refers to
    pub reference_id: String,
    /// Text shown to the user
    pub message: String,
    /// When the reminder should fire
    pub fire_at: NaiveDateTime,
    /// Whether the reminder has been delivered or acknowledged
    #[serde(default)]
    pub sent: bool,
    /// When it was marked sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<NaiveDateTime>,
    /// Email recipient, if email notifications are enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_email: Option<String>,
    /// SMS recipient, if SMS notifications are enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_phone: Option<String>,
}

impl Reminder {
    /// Marks the reminder as sent at `now`.
    ///
    /// Returns `true` if the flag changed. Calling it on an already-sent
    /// reminder changes nothing (the first `sent_at` is kept) and returns `false`.
    pub fn mark_sent(&mut self, now: NaiveDateTime) -> bool {
        if self.sent {
            return false;
        }
        self.sent = true;
        self.sent_at = Some(now);
        true
    }
}
