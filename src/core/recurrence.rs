//! Recurring class expansion.
//!
//! Turns a base class plus a [`RecurrencePattern`] into the concrete dates on
//! which it happens. Occurrence `k` is always computed from the base start
//! (`base + k × interval` units) rather than from the previous occurrence, so
//! a monthly class on the 31st clamps to shorter months without drifting:
//! Jan 31, Feb 28, Mar 31, Apr 30.

use crate::{
    core::datetime,
    errors::Result,
    models::{Event, EventStatus, Frequency, RecurrencePattern, event::validate_duration},
};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

/// Upper bound on generated occurrences, whatever the pattern says.
pub const MAX_OCCURRENCES: usize = 365;

/// One dated instance of a recurring class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    /// Start of this instance
    pub start: NaiveDateTime,
    /// Start plus the class duration
    pub end: NaiveDateTime,
}

/// Lazy, finite sequence of occurrence start times produced by [`expand`].
///
/// Holds no shared state: cloning gives an independent iterator that resumes
/// from the same position, and calling [`expand`] again with the same inputs
/// yields the same sequence.
#[derive(Debug, Clone)]
pub struct Occurrences {
    base: NaiveDateTime,
    frequency: Frequency,
    interval: i64,
    duration_minutes: i64,
    last_day: Option<NaiveDate>,
    produced: usize,
    exhausted: bool,
}

impl Occurrences {
    /// Pairs every start with its end time.
    pub fn spans(self) -> impl Iterator<Item = Occurrence> {
        let duration = self.duration_minutes;
        self.map_while(move |start| {
            datetime::add_minutes(start, duration)
                .ok()
                .map(|end| Occurrence { start, end })
        })
    }

    fn nth_start(&self, index: usize) -> Option<NaiveDateTime> {
        let steps = i64::try_from(index).ok()?.checked_mul(self.interval)?;
        // Overflow means the date is beyond anything chrono can represent,
        // and therefore beyond any valid range end.
        self.frequency.advance(self.base, steps).ok()
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let Some(last_day) = self.last_day else {
            self.exhausted = true;
            return None;
        };

        let candidate = self
            .nth_start(self.produced)
            .filter(|start| start.date() <= last_day);

        match candidate {
            Some(_) if self.produced >= MAX_OCCURRENCES => {
                debug!(
                    base = %self.base,
                    frequency = %self.frequency,
                    interval = self.interval,
                    "Recurrence expansion stopped at {MAX_OCCURRENCES} occurrences"
                );
                self.exhausted = true;
                None
            }
            Some(start) => {
                self.produced += 1;
                Some(start)
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted || self.last_day.is_none() {
            (0, Some(0))
        } else {
            (0, Some(MAX_OCCURRENCES.saturating_sub(self.produced)))
        }
    }
}

/// Expands a recurring class into its occurrence start times.
///
/// The sequence starts at `base_start` and stops at the first occurrence whose
/// calendar day is after `range_end`'s calendar day (or after the pattern's
/// own end date, whichever is earlier), or after [`MAX_OCCURRENCES`].
/// A `range_end` earlier than `base_start` gives an empty sequence.
///
/// # Errors
/// - [`crate::errors::Error::InvalidDuration`] if `duration_minutes <= 0`
/// - [`crate::errors::Error::InvalidPattern`] if the interval is below 1
pub fn expand(
    base_start: NaiveDateTime,
    duration_minutes: i64,
    pattern: &RecurrencePattern,
    range_end: NaiveDateTime,
) -> Result<Occurrences> {
    validate_duration(duration_minutes)?;
    pattern.validate()?;

    let last_day = if range_end < base_start {
        None
    } else {
        let range_day = range_end.date();
        Some(pattern.end_date.map_or(range_day, |end| end.min(range_day)))
    };

    Ok(Occurrences {
        base: base_start,
        frequency: pattern.frequency,
        interval: pattern.interval,
        duration_minutes,
        last_day,
        produced: 0,
        exhausted: false,
    })
}

/// Produces one concrete class per occurrence up to `range_end`.
///
/// Instances get the id `<base id>_<yyyy-mm-dd>`, status scheduled and no
/// recurrence of their own. A class without a recurrence rule comes back
/// unchanged when it starts on or before `range_end`'s day.
pub fn materialize(event: &Event, range_end: NaiveDateTime) -> Result<Vec<Event>> {
    let Some(pattern) = &event.recurrence else {
        let in_range = event.start <= range_end || datetime::is_same_day(event.start, range_end);
        return Ok(if in_range { vec![event.clone()] } else { Vec::new() });
    };

    let instances = expand(event.start, event.duration_minutes, pattern, range_end)?
        .map(|start| Event {
            id: format!("{}_{}", event.id, start.format("%Y-%m-%d")),
            title: event.title.clone(),
            start,
            duration_minutes: event.duration_minutes,
            status: EventStatus::Scheduled,
            recurrence: None,
            location: event.location.clone(),
        })
        .collect();

    Ok(instances)
}
