//! Reminder scheduling and classification.
//!
//! Fire times are derived from the class start (minus a lead in minutes) or
//! the payment due day (minus a lead in days, at midnight). Classification is
//! a three-way partition against a caller-supplied `now`:
//!
//! | sent flag | fire time     | status   |
//! |-----------|---------------|----------|
//! | true      | any           | Sent     |
//! | false     | `<= now`      | Overdue  |
//! | false     | `> now`       | Upcoming |
//!
//! The notification-center list narrows Upcoming to the next 24 hours, see
//! [`upcoming_reminders`].

use crate::{
    core::{
        datetime, recurrence,
        session::{is_valid_email, is_valid_phone},
    },
    errors::{Error, Result},
    models::{
        Event, EventStatus, NotificationSettings, Payment, PaymentStatus, Reminder, ReminderKind,
    },
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use std::fmt;

/// Window, in hours, used by the "upcoming reminders" view.
pub const UPCOMING_HORIZON_HOURS: i64 = 24;

/// Where a reminder's notification would be delivered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipient {
    /// Email address
    pub email: Option<String>,
    /// Phone number for SMS
    pub phone: Option<String>,
}

impl Recipient {
    /// Checks whichever contact details are present.
    ///
    /// # Errors
    /// - [`Error::InvalidEmail`] for a malformed address
    /// - [`Error::InvalidPhone`] for a malformed phone number
    pub fn validate(&self) -> Result<()> {
        if let Some(email) = self.email.as_deref().filter(|e| !is_valid_email(e)) {
            return Err(Error::InvalidEmail {
                email: email.to_string(),
            });
        }
        if let Some(phone) = self.phone.as_deref().filter(|p| !is_valid_phone(p)) {
            return Err(Error::InvalidPhone {
                phone: phone.to_string(),
            });
        }
        Ok(())
    }
}

/// Read-time state of a reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderStatus {
    /// Not sent, fires in the future
    Upcoming,
    /// Not sent, fire time has been reached
    Overdue,
    /// Already sent; final regardless of fire time
    Sent,
}

impl fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Upcoming => "upcoming",
            Self::Overdue => "overdue",
            Self::Sent => "sent",
        })
    }
}

/// Fire time for a class reminder: `event_start - lead_minutes`.
///
/// # Errors
/// Returns [`Error::InvalidLeadTime`] for a negative lead.
pub fn schedule_reminder(event_start: NaiveDateTime, lead_minutes: i64) -> Result<NaiveDateTime> {
    if lead_minutes < 0 {
        return Err(Error::InvalidLeadTime {
            value: lead_minutes,
        });
    }
    datetime::add_minutes(event_start, -lead_minutes)
}

/// Fire time for a payment reminder: midnight, `lead_days` before the due day.
///
/// # Errors
/// Returns [`Error::InvalidLeadTime`] for a negative lead.
pub fn schedule_payment_reminder(due_date: NaiveDate, lead_days: i64) -> Result<NaiveDateTime> {
    if lead_days < 0 {
        return Err(Error::InvalidLeadTime { value: lead_days });
    }
    datetime::add_days(due_date.and_time(NaiveTime::MIN), -lead_days)
}

/// Classifies a reminder relative to `now`.
#[must_use]
pub fn classify(reminder: &Reminder, now: NaiveDateTime) -> ReminderStatus {
    if reminder.sent {
        ReminderStatus::Sent
    } else if reminder.fire_at <= now {
        ReminderStatus::Overdue
    } else {
        ReminderStatus::Upcoming
    }
}

/// Upcoming and firing before `now + horizon`.
#[must_use]
pub fn is_upcoming_within(reminder: &Reminder, now: NaiveDateTime, horizon: TimeDelta) -> bool {
    classify(reminder, now) == ReminderStatus::Upcoming
        && now
            .checked_add_signed(horizon)
            .is_none_or(|limit| reminder.fire_at < limit)
}

/// Unsent reminders firing within the next 24 hours, soonest first.
#[must_use]
pub fn upcoming_reminders(reminders: &[Reminder], now: NaiveDateTime) -> Vec<&Reminder> {
    let mut upcoming: Vec<&Reminder> = reminders
        .iter()
        .filter(|r| is_upcoming_within(r, now, TimeDelta::hours(UPCOMING_HORIZON_HOURS)))
        .collect();
    upcoming.sort_by_key(|r| r.fire_at);
    upcoming
}

/// Unsent reminders whose fire time has been reached, oldest first.
#[must_use]
pub fn overdue_reminders(reminders: &[Reminder], now: NaiveDateTime) -> Vec<&Reminder> {
    let mut overdue: Vec<&Reminder> = reminders
        .iter()
        .filter(|r| classify(r, now) == ReminderStatus::Overdue)
        .collect();
    overdue.sort_by_key(|r| r.fire_at);
    overdue
}

/// Builds the reminder for one concrete class instance.
///
/// Returns `None` when class reminders are switched off or the class is no
/// longer going ahead (completed or cancelled).
pub fn session_reminder(
    instance: &Event,
    settings: &NotificationSettings,
    recipient: &Recipient,
) -> Result<Option<Reminder>> {
    settings.validate()?;
    recipient.validate()?;
    if !settings.session_reminders
        || matches!(
            instance.status,
            EventStatus::Completed | EventStatus::Cancelled
        )
    {
        return Ok(None);
    }

    let fire_at = schedule_reminder(instance.start, settings.reminder_minutes_before)?;
    Ok(Some(build(
        format!("{}_reminder", instance.id),
        ReminderKind::Session,
        instance.id.clone(),
        format!(
            "{} starts at {}",
            instance.title,
            datetime::format_date_time(instance.start)
        ),
        fire_at,
        settings,
        recipient,
    )))
}

/// Expands a (possibly recurring) class up to `range_end` and builds a
/// reminder for every occurrence.
///
/// A completed or cancelled class yields nothing, even though
/// [`recurrence::materialize`] marks every instance scheduled.
pub fn reminders_for_class(
    event: &Event,
    range_end: NaiveDateTime,
    settings: &NotificationSettings,
    recipient: &Recipient,
) -> Result<Vec<Reminder>> {
    if matches!(event.status, EventStatus::Completed | EventStatus::Cancelled) {
        return Ok(Vec::new());
    }

    let mut reminders = Vec::new();
    for instance in recurrence::materialize(event, range_end)? {
        if let Some(reminder) = session_reminder(&instance, settings, recipient)? {
            reminders.push(reminder);
        }
    }
    Ok(reminders)
}

/// Builds the due-date reminder for a pending payment.
///
/// Returns `None` when payment reminders are switched off or the payment is
/// already paid or cancelled.
pub fn payment_reminder(
    payment: &Payment,
    settings: &NotificationSettings,
    recipient: &Recipient,
) -> Result<Option<Reminder>> {
    settings.validate()?;
    recipient.validate()?;
    if !settings.payment_reminders || payment.status != PaymentStatus::Pending {
        return Ok(None);
    }

    let fire_at = schedule_payment_reminder(payment.due_date, settings.payment_reminder_days_before)?;
    Ok(Some(build(
        format!("{}_reminder", payment.id),
        ReminderKind::Payment,
        payment.id.clone(),
        format!(
            "Payment of ${:.2} due {}",
            payment.amount,
            payment.due_date.format("%b %d, %Y")
        ),
        fire_at,
        settings,
        recipient,
    )))
}

fn build(
    id: String,
    kind: ReminderKind,
    reference_id: String,
    message: String,
    fire_at: NaiveDateTime,
    settings: &NotificationSettings,
    recipient: &Recipient,
) -> Reminder {
    Reminder {
        id,
        kind,
        reference_id,
        message,
        fire_at,
        sent: false,
        sent_at: None,
        recipient_email: recipient
            .email
            .clone()
            .filter(|_| settings.email_notifications),
        recipient_phone: recipient
            .phone
            .clone()
            .filter(|_| settings.sms_notifications),
    }
}
