//! Core scheduling logic - pure, synchronous and clock-free.
//!
//! Every function that depends on the current time takes it as a `now`
//! argument, so results are deterministic for a given input.

/// Parsing, calendar arithmetic and day-level comparisons
pub mod datetime;
/// Payment display status, days overdue and totals
pub mod payment;
/// Recurring class expansion
pub mod recurrence;
/// Reminder fire times, generation and classification
pub mod reminder;
/// Ordering, filtering and weekly views over classes
pub mod schedule;
/// Login sessions and their expiry
pub mod session;
