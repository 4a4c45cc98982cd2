//! Reminder poller - the periodic job behind the notification center.
//!
//! Each cycle reads the clock once and then, for every user in the store:
//! 1. signs the user out if their login session has expired
//! 2. dispatches every overdue, unsent reminder whose kind is enabled in the
//!    user's settings (logged, then marked sent so it never fires twice)
//!
//! A failure for one user is logged and does not stop the cycle.

use crate::{
    config::AppConfig,
    core::reminder::{self, ReminderStatus},
    errors::Result,
    models::{NotificationSettings, Reminder, ReminderKind},
    store::{self, Collection},
};
use chrono::{Local, NaiveDateTime, TimeDelta};
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Outcome of one poll cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollReport {
    /// Sessions found expired and cleared
    pub sessions_expired: usize,
    /// Users whose reminders were examined
    pub users_checked: usize,
    /// Reminders dispatched and marked sent this cycle
    pub reminders_dispatched: usize,
    /// Unsent reminders due within the configured horizon
    pub upcoming: usize,
    /// Users skipped because of an error
    pub failures: usize,
}

/// Runs one cycle at `now`.
#[instrument(skip(db, config))]
pub async fn run_poll_cycle(
    db: &DatabaseConnection,
    config: &AppConfig,
    now: NaiveDateTime,
) -> Result<PollReport> {
    let mut report = PollReport::default();

    for user in store::users_with(db, Collection::UserSession).await? {
        match expire_session(db, &user, now).await {
            Ok(true) => report.sessions_expired += 1,
            Ok(false) => {}
            Err(e) => {
                warn!("Session check failed for {}: {}", user, e);
                report.failures += 1;
            }
        }
    }

    let horizon = TimeDelta::try_hours(config.poller.horizon_hours).unwrap_or(TimeDelta::MAX);
    for user in store::users_with(db, Collection::Reminders).await? {
        match dispatch_due_reminders(db, &user, &config.notifications, now, horizon).await {
            Ok((dispatched, upcoming)) => {
                report.users_checked += 1;
                report.reminders_dispatched += dispatched;
                report.upcoming += upcoming;
            }
            Err(e) => {
                warn!("Reminder dispatch failed for {}: {}", user, e);
                report.failures += 1;
            }
        }
    }

    Ok(report)
}

/// Polls every `config.poller.interval_seconds` until Ctrl-C.
///
/// # Errors
/// Returns the validation error for an out-of-range config before polling starts.
pub async fn run(db: &DatabaseConnection, config: &AppConfig) -> Result<()> {
    config.validate()?;
    let mut ticker = tokio::time::interval(Duration::from_secs(config.poller.interval_seconds));
    info!(
        "Reminder poller started, checking every {}s",
        config.poller.interval_seconds
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Local::now().naive_local();
                match run_poll_cycle(db, config, now).await {
                    Ok(report) => info!(
                        expired = report.sessions_expired,
                        dispatched = report.reminders_dispatched,
                        upcoming = report.upcoming,
                        failures = report.failures,
                        "Poll cycle finished"
                    ),
                    Err(e) => error!("Poll cycle failed: {}", e),
                }
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    error!("Failed to listen for shutdown signal: {}", e);
                }
                info!("Shutting down reminder poller");
                return Ok(());
            }
        }
    }
}

async fn expire_session(db: &DatabaseConnection, user: &str, now: NaiveDateTime) -> Result<bool> {
    let Some(session) = store::load_session(db, user).await? else {
        return Ok(false);
    };
    if !session.is_expired(now) {
        return Ok(false);
    }
    store::clear_session(db, user).await?;
    info!("Session expired for {}", user);
    Ok(true)
}

/// Returns `(dispatched, upcoming)` for one user.
async fn dispatch_due_reminders(
    db: &DatabaseConnection,
    user: &str,
    defaults: &NotificationSettings,
    now: NaiveDateTime,
    horizon: TimeDelta,
) -> Result<(usize, usize)> {
    // Read-modify-write of the reminder list happens inside one transaction
    let txn = db.begin().await?;

    let settings = store::load_settings(&txn, user, defaults).await?;
    let mut reminders = store::load_reminders(&txn, user).await?;

    let mut dispatched = 0;
    for item in &mut reminders {
        if reminder::classify(item, now) != ReminderStatus::Overdue {
            continue;
        }
        if !kind_enabled(&settings, item.kind) {
            debug!("Skipping {} for {}: reminders of this kind are off", item.id, user);
            continue;
        }
        deliver(user, item);
        if item.mark_sent(now) {
            dispatched += 1;
        }
    }

    let upcoming = reminders
        .iter()
        .filter(|r| reminder::is_upcoming_within(r, now, horizon))
        .count();

    if dispatched > 0 {
        store::save_reminders(&txn, user, &reminders).await?;
    }
    txn.commit().await?;

    Ok((dispatched, upcoming))
}

const fn kind_enabled(settings: &NotificationSettings, kind: ReminderKind) -> bool {
    match kind {
        ReminderKind::Session => settings.session_reminders,
        ReminderKind::Payment => settings.payment_reminders,
    }
}

// Delivery is a log line; the email/SMS transports live outside this crate.
fn deliver(user: &str, item: &Reminder) {
    info!(
        user,
        reminder = %item.id,
        email = item.recipient_email.as_deref().unwrap_or("-"),
        phone = item.recipient_phone.as_deref().unwrap_or("-"),
        "Reminder due: {}",
        item.message
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::PollerConfig,
        core::session::UserSession,
        errors::Error,
        models::Payment,
        test_utils::{PARENT, day, sample_reminder, setup_test_db, ts},
    };

    #[tokio::test]
    async fn test_cycle_dispatches_overdue_reminders_once() -> Result<()> {
        let db = setup_test_db().await?;
        let config = AppConfig::default();
        let now = ts("2025-06-01T12:00:00");

        store::save_reminders(
            &db,
            PARENT,
            &[
                sample_reminder("due", ts("2025-06-01T11:45:00")),
                sample_reminder("soon", ts("2025-06-01T18:00:00")),
                sample_reminder("next-week", ts("2025-06-08T18:00:00")),
            ],
        )
        .await?;

        let report = run_poll_cycle(&db, &config, now).await?;
        assert_eq!(report.users_checked, 1);
        assert_eq!(report.reminders_dispatched, 1);
        assert_eq!(report.upcoming, 1);
        assert_eq!(report.failures, 0);

        let stored = store::load_reminders(&db, PARENT).await?;
        let due = stored.iter().find(|r| r.id == "due").cloned();
        assert_eq!(due.as_ref().map(|r| r.sent), Some(true));
        assert_eq!(due.and_then(|r| r.sent_at), Some(now));
        assert!(stored.iter().filter(|r| r.id != "due").all(|r| !r.sent));

        let again = run_poll_cycle(&db, &config, ts("2025-06-01T12:05:00")).await?;
        assert_eq!(again.reminders_dispatched, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_disabled_kinds_are_not_dispatched() -> Result<()> {
        let db = setup_test_db().await?;
        let now = ts("2025-06-05T09:00:00");

        let payment = Payment::new("pay-1", "class-1", 30.0, day("2025-06-06"))?;
        let payment_reminder = reminder::payment_reminder(
            &payment,
            &NotificationSettings::default(),
            &reminder::Recipient::default(),
        )?;
        let mut reminders = vec![sample_reminder("class", ts("2025-06-05T08:00:00"))];
        reminders.extend(payment_reminder);
        store::save_reminders(&db, PARENT, &reminders).await?;

        store::save_settings(
            &db,
            PARENT,
            &NotificationSettings {
                payment_reminders: false,
                ..NotificationSettings::default()
            },
        )
        .await?;

        let report = run_poll_cycle(&db, &AppConfig::default(), now).await?;
        assert_eq!(report.reminders_dispatched, 1);

        let stored = store::load_reminders(&db, PARENT).await?;
        let sent: Vec<_> = stored.iter().filter(|r| r.sent).map(|r| r.id.as_str()).collect();
        assert_eq!(sent, ["class"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_cycle_clears_expired_sessions_only() -> Result<()> {
        let db = setup_test_db().await?;
        let login = ts("2025-06-01T09:00:00");

        store::save_session(&db, &UserSession::start(PARENT, login, 60)?).await?;
        store::save_session(&db, &UserSession::start("tutor@example.com", login, 24 * 60)?).await?;

        let report = run_poll_cycle(&db, &AppConfig::default(), ts("2025-06-01T10:00:00")).await?;
        assert_eq!(report.sessions_expired, 1);
        assert!(store::load_session(&db, PARENT).await?.is_none());
        assert!(store::load_session(&db, "tutor@example.com").await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_run_rejects_zero_interval() -> Result<()> {
        let db = setup_test_db().await?;
        let config = AppConfig {
            poller: PollerConfig {
                interval_seconds: 0,
                ..PollerConfig::default()
            },
            ..AppConfig::default()
        };

        assert!(matches!(run(&db, &config).await, Err(Error::Config { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_store() -> Result<()> {
        let db = setup_test_db().await?;
        let report = run_poll_cycle(&db, &AppConfig::default(), ts("2025-06-01T10:00:00")).await?;
        assert_eq!(report, PollReport::default());
        Ok(())
    }
}
