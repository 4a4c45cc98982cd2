//! Shared test utilities for `ScheduleBuddy`.
//!
//! This module provides helpers for setting up test databases and building
//! records with sensible defaults.
#![allow(clippy::unwrap_used)]

use crate::{
    errors::Result,
    models::{Event, Reminder, ReminderKind},
};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::DatabaseConnection;

/// Email used as the default test user.
pub const PARENT: &str = "parent@example.com";

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Parses a timestamp literal, panicking on typos in the test itself.
pub fn ts(s: &str) -> NaiveDateTime {
    crate::core::datetime::parse_timestamp(s).unwrap()
}

/// Parses a `YYYY-MM-DD` literal.
pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// A scheduled 60 minute class starting at `start`.
pub fn class_at(id: &str, start: &str) -> Event {
    Event::new(id, format!("Class {id}"), ts(start), 60).unwrap()
}

/// An unsent session reminder firing at `fire_at`.
///
/// # Defaults
/// * `reference_id`: `"class-1"`
/// * `message`: `"Class starts soon"`
/// * no recipients
pub fn sample_reminder(id: &str, fire_at: NaiveDateTime) -> Reminder {
    Reminder {
        id: id.to_string(),
        kind: ReminderKind::Session,
        reference_id: "class-1".to_string(),
        message: "Class starts soon".to_string(),
        fire_at,
        sent: false,
        sent_at: None,
        recipient_email: None,
        recipient_phone: None,
    }
}
