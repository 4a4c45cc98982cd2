//! Domain records: classes, recurrence rules, reminders, payments,
//! availability slots and notification settings. Statuses are closed enums
//! validated at construction; everything is serde-serializable for the store.

pub mod event;
pub mod payment;
pub mod recurrence;
pub mod reminder;
pub mod settings;
pub mod time_slot;

pub use event::{Event, EventStatus};
pub use payment::{DisplayStatus, Payment, PaymentStatus};
pub use recurrence::{Frequency, RecurrencePattern};
pub use reminder::{Reminder, ReminderKind};
pub use settings::NotificationSettings;
pub use time_slot::TimeSlot;
