//! Weekly availability slots, e.g. "Tuesdays 16:00 - 18:00".

use crate::{
    core::{datetime, schedule},
    errors::{Error, Result},
};
use chrono::{Datelike, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

const SLOT_TIME_FORMAT: &str = "%H:%M";

/// A recurring weekly window in which classes can be booked.
///
/// Times are stored as `"HH:MM"` strings. A slot read from storage is not
/// trusted until [`TimeSlot::validate`] has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    /// 0 = Sunday through 6 = Saturday
    pub day_of_week: u8,
    /// First minute of the slot
    #[serde(with = "hh_mm")]
    pub start_time: NaiveTime,
    /// End of the slot, exclusive
    #[serde(with = "hh_mm")]
    pub end_time: NaiveTime,
}

impl TimeSlot {
    /// Creates a validated slot.
    pub fn new(day_of_week: u8, start_time: NaiveTime, end_time: NaiveTime) -> Result<Self> {
        let slot = Self {
            day_of_week,
            start_time,
            end_time,
        };
        slot.validate()?;
        Ok(slot)
    }

    /// Builds a slot from `"HH:MM"` strings as entered in the availability form.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTimeSlot`] for a malformed time, a weekday
    /// outside 0-6 or an end that is not after the start.
    pub fn parse(day_of_week: u8, start_time: &str, end_time: &str) -> Result<Self> {
        Self::new(day_of_week, parse_time(start_time)?, parse_time(end_time)?)
    }

    /// Checks the weekday range and that the slot ends after it starts.
    pub fn validate(&self) -> Result<()> {
        if datetime::day_name(self.day_of_week).is_none() {
            return Err(Error::InvalidTimeSlot {
                message: format!("day of week must be 0-6, got {}", self.day_of_week),
            });
        }
        if self.start_time >= self.end_time {
            return Err(Error::InvalidTimeSlot {
                message: "end time must be after start time".to_string(),
            });
        }
        Ok(())
    }

    /// Length of the slot in minutes.
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// True when `at` falls on this slot's weekday within `[start, end)`.
    #[must_use]
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at.weekday().num_days_from_sunday() == u32::from(self.day_of_week)
            && self.start_time <= at.time()
            && at.time() < self.end_time
    }

    /// Bookable start times inside the slot every `step_minutes`.
    pub fn start_times(&self, step_minutes: i64) -> Result<Vec<NaiveTime>> {
        schedule::time_slots(self.start_time, self.end_time, step_minutes)
    }

    /// `Tuesday 16:00 - 18:00`
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{} {} - {}",
            datetime::day_name(self.day_of_week).unwrap_or_default(),
            self.start_time.format(SLOT_TIME_FORMAT),
            self.end_time.format(SLOT_TIME_FORMAT)
        )
    }
}

fn parse_time(input: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), SLOT_TIME_FORMAT).map_err(|_| Error::InvalidTimeSlot {
        message: format!("invalid time format {input:?}, expected HH:MM"),
    })
}

mod hh_mm {
    use super::SLOT_TIME_FORMAT;
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(SLOT_TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), SLOT_TIME_FORMAT).map_err(D::Error::custom)
    }
}
