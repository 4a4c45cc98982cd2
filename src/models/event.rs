//! Class (event) records and their user-driven status transitions.

use super::RecurrencePattern;
use crate::{
    core::datetime,
    errors::{Error, Result},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a class. Changes only through explicit user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Planned and not yet held
    Scheduled,
    /// Held
    Completed,
    /// Called off
    Cancelled,
    /// Moved to a new start time
    Rescheduled,
}

impl EventStatus {
    /// Lowercase name used in storage
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Rescheduled => "rescheduled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A class or tutoring session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier
    pub id: String,
    /// Activity name, e.g. "Piano Lessons"
    pub title: String,
    /// Start of the class
    pub start: NaiveDateTime,
    /// Length of the class in minutes, always positive
    pub duration_minutes: i64,
    /// Current lifecycle state
    pub status: EventStatus,
    /// Repetition rule for recurring classes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrencePattern>,
    /// Where the class takes place ("Online", "At home", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Event {
    /// Creates a scheduled, non-recurring class.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDuration`] when `duration_minutes` is not positive.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDateTime,
        duration_minutes: i64,
    ) -> Result<Self> {
        validate_duration(duration_minutes)?;
        Ok(Self {
            id: id.into(),
            title: title.into(),
            start,
            duration_minutes,
            status: EventStatus::Scheduled,
            recurrence: None,
            location: None,
        })
    }

    /// Attaches a recurrence rule after validating it.
    pub fn with_recurrence(mut self, pattern: RecurrencePattern) -> Result<Self> {
        pattern.validate()?;
        self.recurrence = Some(pattern);
        Ok(self)
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// End of the class (`start + duration`).
    pub fn end(&self) -> Result<NaiveDateTime> {
        datetime::add_minutes(self.start, self.duration_minutes)
    }

    /// `9:00 AM - 10:00 AM`
    pub fn time_range_label(&self) -> Result<String> {
        Ok(format!(
            "{} - {}",
            datetime::format_time(self.start),
            datetime::format_time(self.end()?)
        ))
    }

    /// Marks the class as held. Completing twice is a no-op.
    ///
    /// # Errors
    /// A cancelled class cannot be completed.
    pub fn complete(&mut self) -> Result<()> {
        match self.status {
            EventStatus::Completed => Ok(()),
            EventStatus::Cancelled => Err(self.transition_error(EventStatus::Completed)),
            EventStatus::Scheduled | EventStatus::Rescheduled => {
                self.status = EventStatus::Completed;
                Ok(())
            }
        }
    }

    /// Calls the class off. Cancelling twice is a no-op.
    ///
    /// # Errors
    /// A completed class cannot be cancelled.
    pub fn cancel(&mut self) -> Result<()> {
        match self.status {
            EventStatus::Cancelled => Ok(()),
            EventStatus::Completed => Err(self.transition_error(EventStatus::Cancelled)),
            EventStatus::Scheduled | EventStatus::Rescheduled => {
                self.status = EventStatus::Cancelled;
                Ok(())
            }
        }
    }

    /// Moves the class to `new_start` and marks it rescheduled.
    ///
    /// # Errors
    /// A completed class cannot be rescheduled.
    pub fn reschedule(&mut self, new_start: NaiveDateTime) -> Result<()> {
        if self.status == EventStatus::Completed {
            return Err(self.transition_error(EventStatus::Rescheduled));
        }
        self.start = new_start;
        self.status = EventStatus::Rescheduled;
        Ok(())
    }

    fn transition_error(&self, to: EventStatus) -> Error {
        Error::InvalidTransition {
            from: self.status.to_string(),
            to: to.to_string(),
        }
    }
}

pub(crate) const fn validate_duration(minutes: i64) -> Result<()> {
    if minutes <= 0 {
        return Err(Error::InvalidDuration { minutes });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{models::Frequency, test_utils::ts};

    fn piano() -> Event {
        Event::new("cls-1", "Piano", ts("2025-06-02T16:00:00"), 45).unwrap()
    }

    #[test]
    fn test_new_rejects_non_positive_duration() {
        for minutes in [0, -15] {
            let result = Event::new("x", "Chess", ts("2025-06-02T16:00:00"), minutes);
            assert!(matches!(result, Err(Error::InvalidDuration { minutes: m }) if m == minutes));
        }
    }

    #[test]
    fn test_end_and_label() {
        let event = piano();
        assert_eq!(event.end().unwrap(), ts("2025-06-02T16:45:00"));
        assert_eq!(event.time_range_label().unwrap(), "4:00 PM - 4:45 PM");
    }

    #[test]
    fn test_with_recurrence_validates() {
        let bad = RecurrencePattern {
            frequency: Frequency::Daily,
            interval: 0,
            end_date: None,
        };
        assert!(piano().with_recurrence(bad).is_err());

        let good = RecurrencePattern::new(Frequency::Weekly, 1).unwrap();
        assert_eq!(
            piano().with_recurrence(good.clone()).unwrap().recurrence,
            Some(good)
        );
    }

    #[test]
    fn test_reschedule_moves_start_and_sets_status() {
        let mut event = piano();
        event.reschedule(ts("2025-06-03T17:00:00")).unwrap();
        assert_eq!(event.start, ts("2025-06-03T17:00:00"));
        assert_eq!(event.status, EventStatus::Rescheduled);
    }

    #[test]
    fn test_completed_is_final() {
        let mut event = piano();
        event.complete().unwrap();
        event.complete().unwrap();
        assert_eq!(event.status, EventStatus::Completed);
        assert!(matches!(event.cancel(), Err(Error::InvalidTransition { .. })));
        assert!(event.reschedule(ts("2025-06-09T16:00:00")).is_err());
        assert_eq!(event.start, ts("2025-06-02T16:00:00"));
    }

    #[test]
    fn test_cancelled_cannot_complete() {
        let mut event = piano();
        event.cancel().unwrap();
        event.cancel().unwrap();
        assert!(event.complete().is_err());
        assert_eq!(event.status, EventStatus::Cancelled);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&piano()).unwrap();
        assert!(json.contains(r#""status":"scheduled""#));
        assert!(!json.contains("recurrence"));
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, piano());
    }
}
