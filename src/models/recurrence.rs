//! Recurrence patterns for repeating classes.

use crate::{
    core::datetime,
    errors::{Error, Result},
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How often a recurring class repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every `interval` days
    Daily,
    /// Every `interval` weeks (7 × interval days)
    Weekly,
    /// Every `interval` calendar months
    Monthly,
}

impl Frequency {
    /// Lowercase name used in storage and config
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Moves `from` forward by `units` of this frequency.
    ///
    /// Monthly steps clamp to the end of shorter months, see [`datetime::add_months`].
    pub fn advance(self, from: NaiveDateTime, units: i64) -> Result<NaiveDateTime> {
        match self {
            Self::Daily => datetime::add_days(from, units),
            Self::Weekly => {
                let days = units.checked_mul(7).ok_or(Error::TimestampOutOfRange)?;
                datetime::add_days(from, days)
            }
            Self::Monthly => datetime::add_months(from, units),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(Error::InvalidPattern {
                message: format!("unsupported frequency {other:?}"),
            }),
        }
    }
}

/// A repetition rule attached to a class.
///
/// `interval` is kept signed so that a malformed stored value (0 or negative)
/// survives deserialization and is rejected by [`RecurrencePattern::validate`]
/// rather than silently wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrencePattern {
    /// Unit of repetition
    pub frequency: Frequency,
    /// Number of units between occurrences, at least 1
    pub interval: i64,
    /// Last calendar day on which an occurrence may fall
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl RecurrencePattern {
    /// Creates a validated pattern without an end date.
    pub fn new(frequency: Frequency, interval: i64) -> Result<Self> {
        let pattern = Self {
            frequency,
            interval,
            end_date: None,
        };
        pattern.validate()?;
        Ok(pattern)
    }

    /// Parses the frequency from its string form, e.g. as submitted by a form.
    pub fn parse(frequency: &str, interval: i64) -> Result<Self> {
        Self::new(frequency.parse()?, interval)
    }

    /// Limits the pattern to occurrences on or before `end_date`.
    #[must_use]
    pub const fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Checks the interval invariant.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPattern`] when `interval < 1`.
    pub fn validate(&self) -> Result<()> {
        if self.interval < 1 {
            return Err(Error::InvalidPattern {
                message: format!("interval must be at least 1, got {}", self.interval),
            });
        }
        Ok(())
    }
}
