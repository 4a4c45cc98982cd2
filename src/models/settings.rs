//! Per-user notification preferences.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// Which reminders to generate and how far ahead they fire.
///
/// Missing fields take the defaults the app ships with, so partial
/// `[notifications]` tables in config.toml are fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Generate reminders before classes
    pub session_reminders: bool,
    /// Generate reminders before payment due dates
    pub payment_reminders: bool,
    /// Attach the user's email as a recipient
    pub email_notifications: bool,
    /// Attach the user's phone as a recipient
    pub sms_notifications: bool,
    /// Lead time for class reminders
    pub reminder_minutes_before: i64,
    /// Lead time for payment reminders
    pub payment_reminder_days_before: i64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            session_reminders: true,
            payment_reminders: true,
            email_notifications: false,
            sms_notifications: false,
            reminder_minutes_before: 15,
            payment_reminder_days_before: 3,
        }
    }
}

impl NotificationSettings {
    /// Lead times must be non-negative.
    ///
    /// # Errors
    /// Returns [`Error::InvalidLeadTime`] naming the first offending value.
    pub const fn validate(&self) -> Result<()> {
        if self.reminder_minutes_before < 0 {
            return Err(Error::InvalidLeadTime {
                value: self.reminder_minutes_before,
            });
        }
        if self.payment_reminder_days_before < 0 {
            return Err(Error::InvalidLeadTime {
                value: self.payment_reminder_days_before,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: NotificationSettings = toml::from_str("reminder_minutes_before = 30").unwrap();
        assert_eq!(settings.reminder_minutes_before, 30);
        assert_eq!(settings.payment_reminder_days_before, 3);
        assert!(settings.session_reminders);
        assert!(!settings.sms_notifications);
    }

    #[test]
    fn test_validate_rejects_negative_lead_times() {
        let settings = NotificationSettings {
            payment_reminder_days_before: -1,
            ..NotificationSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(Error::InvalidLeadTime { value: -1 })
        ));
        assert!(NotificationSettings::default().validate().is_ok());
    }
}
