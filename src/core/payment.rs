//! Payment due-date classification and totals.
//!
//! "Overdue" is never written back to a record; it is recomputed from the
//! stored status, the due day and the caller's `now` every time a payment is
//! displayed.

use crate::{
    errors::{Error, Result},
    models::{DisplayStatus, Payment, PaymentStatus},
};
use chrono::{Days, NaiveDate, NaiveDateTime};

/// Days between a completed class and its payment due date.
pub const DEFAULT_DUE_AFTER_DAYS: u64 = 7;

/// Status to show for a payment at `now`.
///
/// A pending payment whose due day is before `now`'s day is overdue. Paid
/// and cancelled payments are returned as-is whatever the due date.
#[must_use]
pub fn display_status(stored: PaymentStatus, due_date: NaiveDate, now: NaiveDateTime) -> DisplayStatus {
    match stored {
        PaymentStatus::Pending if due_date < now.date() => DisplayStatus::Overdue,
        other => other.into(),
    }
}

/// Whole days a payment is past due, `0` if it is not overdue.
#[must_use]
pub fn days_overdue(payment: &Payment, now: NaiveDateTime) -> i64 {
    if display_status(payment.status, payment.due_date, now) == DisplayStatus::Overdue {
        (now.date() - payment.due_date).num_days()
    } else {
        0
    }
}

/// Default due date for a class held at `class_start`: one week later.
pub fn default_due_date(class_start: NaiveDateTime) -> Result<NaiveDate> {
    class_start
        .date()
        .checked_add_days(Days::new(DEFAULT_DUE_AFTER_DAYS))
        .ok_or(Error::TimestampOutOfRange)
}

/// Payments that should be flagged overdue at `now`, oldest due date first.
#[must_use]
pub fn overdue_payments(payments: &[Payment], now: NaiveDateTime) -> Vec<&Payment> {
    let mut overdue: Vec<&Payment> = payments
        .iter()
        .filter(|p| display_status(p.status, p.due_date, now) == DisplayStatus::Overdue)
        .collect();
    overdue.sort_by_key(|p| p.due_date);
    overdue
}

/// Amount totals grouped by display status.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PaymentTotals {
    /// Pending and not yet due
    pub pending: f64,
    /// Pending and past due
    pub overdue: f64,
    /// Settled
    pub paid: f64,
    /// Number of payments considered (cancelled ones are counted but not summed)
    pub count: usize,
}

impl PaymentTotals {
    /// Sums `payments` by their display status at `now`.
    #[must_use]
    pub fn from_payments(payments: &[Payment], now: NaiveDateTime) -> Self {
        payments.iter().fold(Self::default(), |mut totals, payment| {
            match display_status(payment.status, payment.due_date, now) {
                DisplayStatus::Pending => totals.pending += payment.amount,
                DisplayStatus::Overdue => totals.overdue += payment.amount,
                DisplayStatus::Paid => totals.paid += payment.amount,
                DisplayStatus::Cancelled => {}
            }
            totals.count += 1;
            totals
        })
    }

    /// Everything still owed (pending + overdue).
    #[must_use]
    pub fn outstanding(&self) -> f64 {
        self.pending + self.overdue
    }
}
