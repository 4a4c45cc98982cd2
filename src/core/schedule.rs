//! Schedule views over concrete classes: ordering, date filters, weekly
//! counts and time-slot generation for availability pickers.

use crate::{
    core::datetime,
    errors::{Error, Result},
    models::{Event, EventStatus},
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

/// Returns the classes ordered by start time (stable for equal starts).
#[must_use]
pub fn sort_by_start(events: &[Event]) -> Vec<Event> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|e| e.start);
    sorted
}

/// Scheduled classes starting after `now` and no later than `now + horizon`,
/// soonest first.
#[must_use]
pub fn upcoming(events: &[Event], now: NaiveDateTime, horizon: TimeDelta) -> Vec<&Event> {
    let limit = now.checked_add_signed(horizon);
    let mut upcoming: Vec<&Event> = events
        .iter()
        .filter(|e| e.status == EventStatus::Scheduled)
        .filter(|e| e.start > now && limit.is_none_or(|limit| e.start <= limit))
        .collect();
    upcoming.sort_by_key(|e| e.start);
    upcoming
}

/// Classes whose start day lies within `[from, to]`, both days inclusive.
#[must_use]
pub fn in_range(events: &[Event], from: NaiveDateTime, to: NaiveDateTime) -> Vec<&Event> {
    events
        .iter()
        .filter(|e| {
            datetime::is_same_day_or_after(e.start, from)
                && datetime::is_same_day_or_before(e.start, to)
        })
        .collect()
}

/// Scheduled classes on `day`, in start order.
#[must_use]
pub fn on_day(events: &[Event], day: NaiveDate) -> Vec<&Event> {
    let mut todays: Vec<&Event> = events
        .iter()
        .filter(|e| e.status == EventStatus::Scheduled && e.start.date() == day)
        .collect();
    todays.sort_by_key(|e| e.start);
    todays
}

/// Class counts for one Monday-to-Sunday week
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeeklyStats {
    /// Scheduled or rescheduled
    pub scheduled: usize,
    /// Held
    pub completed: usize,
    /// Called off
    pub cancelled: usize,
}

impl WeeklyStats {
    /// Counts the classes in the week containing `now`.
    #[must_use]
    pub fn for_week(events: &[Event], now: NaiveDateTime) -> Self {
        let (start, end) = datetime::week_range(now);
        in_range(events, start, end)
            .into_iter()
            .fold(Self::default(), |mut stats, event| {
                match event.status {
                    EventStatus::Scheduled | EventStatus::Rescheduled => stats.scheduled += 1,
                    EventStatus::Completed => stats.completed += 1,
                    EventStatus::Cancelled => stats.cancelled += 1,
                }
                stats
            })
    }
}

/// Start times from `start` (inclusive) to `end` (exclusive) every `step_minutes`.
///
/// # Errors
/// Returns [`Error::InvalidDuration`] if `step_minutes` is not positive.
pub fn time_slots(start: NaiveTime, end: NaiveTime, step_minutes: i64) -> Result<Vec<NaiveTime>> {
    if step_minutes <= 0 {
        return Err(Error::InvalidDuration {
            minutes: step_minutes,
        });
    }

    let to_minutes = |t: NaiveTime| i64::from(t.hour() * 60 + t.minute());
    let (first, last) = (to_minutes(start), to_minutes(end));

    let mut slots = Vec::new();
    let mut current = first;
    while current < last {
        let hour = u32::try_from(current / 60).map_err(|_| Error::TimestampOutOfRange)?;
        let minute = u32::try_from(current % 60).map_err(|_| Error::TimestampOutOfRange)?;
        let slot = NaiveTime::from_hms_opt(hour, minute, 0).ok_or(Error::TimestampOutOfRange)?;
        slots.push(slot);
        let Some(next) = current.checked_add(step_minutes) else {
            break;
        };
        current = next;
    }
    Ok(slots)
}
