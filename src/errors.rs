//! Unified error type for the scheduling core, the store and the poller.

use thiserror::Error;

/// Everything that can go wrong in `ScheduleBuddy`.
///
/// Validation variants are raised before any output is produced; the
/// remaining variants wrap failures from the persistence and config layers.
#[derive(Debug, Error)]
pub enum Error {
    /// A date or timestamp string could not be parsed
    #[error("Invalid timestamp: {input:?}")]
    InvalidTimestamp {
        /// The rejected input
        input: String,
    },

    /// Date arithmetic left the representable range
    #[error("Timestamp arithmetic overflowed the supported date range")]
    TimestampOutOfRange,

    /// A recurrence pattern is malformed (bad interval or frequency)
    #[error("Invalid recurrence pattern: {message}")]
    InvalidPattern {
        /// Description of the problem
        message: String,
    },

    /// Durations and slot lengths must be positive
    #[error("Invalid duration: {minutes} minutes (must be positive)")]
    InvalidDuration {
        /// The rejected duration in minutes
        minutes: i64,
    },

    /// Reminder lead times must be non-negative
    #[error("Invalid reminder lead time: {value} (must be non-negative)")]
    InvalidLeadTime {
        /// The rejected lead time
        value: i64,
    },

    /// Payment amounts must be positive and finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A status change that the record's lifecycle does not allow
    #[error("Cannot move from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Malformed email address for a login session
    #[error("Invalid email address: {email:?}")]
    InvalidEmail {
        /// The rejected address
        email: String,
    },

    /// Malformed phone number for SMS delivery
    #[error("Invalid phone number: {phone:?}")]
    InvalidPhone {
        /// The rejected number
        phone: String,
    },

    /// Availability slot with a bad weekday, time format or time order
    #[error("Invalid time slot: {message}")]
    InvalidTimeSlot {
        /// Description of the problem
        message: String,
    },

    /// Configuration file or environment problem
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A stored value could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O failure (reading config, creating the data directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
