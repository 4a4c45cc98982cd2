//! User-scoped key-value storage.
//!
//! Each user's classes, payments, reminders, availability, settings and login
//! session are stored as JSON documents in the `kv_entries` table under the
//! key `<email>_<collection>` (email lowercased). Collections are written whole; there is no
//! per-record update.

use crate::{
    core::session::{UserSession, normalize_email},
    entities::{KvEntry, kv_entry},
    errors::Result,
    models::{Event, NotificationSettings, Payment, Reminder, TimeSlot},
};
use chrono::Local;
use sea_orm::{Set, prelude::*};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

/// Kinds of per-user data kept in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// `Vec<Event>`
    Classes,
    /// `Vec<Payment>`
    Payments,
    /// `Vec<Reminder>`
    Reminders,
    /// `Vec<TimeSlot>`
    Availability,
    /// [`NotificationSettings`]
    NotificationSettings,
    /// [`UserSession`]
    UserSession,
}

impl Collection {
    /// Every collection, used when clearing a user's data
    pub const ALL: [Self; 6] = [
        Self::Classes,
        Self::Payments,
        Self::Reminders,
        Self::Availability,
        Self::NotificationSettings,
        Self::UserSession,
    ];

    /// Suffix appended to the user's email to form the storage key
    #[must_use]
    pub const fn key_suffix(self) -> &'static str {
        match self {
            Self::Classes => "classes",
            Self::Payments => "payments",
            Self::Reminders => "reminders",
            Self::Availability => "availability",
            Self::NotificationSettings => "notification_settings",
            Self::UserSession => "user_session",
        }
    }
}

/// `Parent@Example.com` + `Reminders` → `parent@example.com_reminders`
///
/// The email is normalized the same way [`UserSession::start`] does it, so a
/// user's records and session always share a prefix.
#[must_use]
pub fn storage_key(user: &str, collection: Collection) -> String {
    format!("{}_{}", normalize_email(user), collection.key_suffix())
}

/// Serializes `value` and writes it under the user's key, replacing any previous value.
#[instrument(skip(db, value))]
pub async fn save_value<C, T>(db: &C, user: &str, collection: Collection, value: &T) -> Result<()>
where
    C: ConnectionTrait,
    T: Serialize + ?Sized,
{
    let key = storage_key(user, collection);
    let json = serde_json::to_string(value)?;
    let now = Local::now().naive_local();

    if let Some(existing) = KvEntry::find_by_id(key.clone()).one(db).await? {
        let mut active_model: kv_entry::ActiveModel = existing.into();
        active_model.value = Set(json);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let entry = kv_entry::ActiveModel {
            key: Set(key.clone()),
            value: Set(json),
            updated_at: Set(now),
        };
        entry.insert(db).await?;
    }

    debug!("Saved {}", key);
    Ok(())
}

/// Reads and deserializes the user's value, `None` if nothing is stored.
#[instrument(skip(db))]
pub async fn load_value<C, T>(db: &C, user: &str, collection: Collection) -> Result<Option<T>>
where
    C: ConnectionTrait,
    T: DeserializeOwned,
{
    let key = storage_key(user, collection);
    match KvEntry::find_by_id(key).one(db).await? {
        Some(entry) => Ok(Some(serde_json::from_str(&entry.value)?)),
        None => Ok(None),
    }
}

/// Writes a whole collection.
pub async fn save_collection<C, T>(
    db: &C,
    user: &str,
    collection: Collection,
    items: &[T],
) -> Result<()>
where
    C: ConnectionTrait,
    T: Serialize,
{
    save_value(db, user, collection, items).await
}

/// Reads a whole collection; an absent key is an empty collection.
pub async fn load_collection<C, T>(db: &C, user: &str, collection: Collection) -> Result<Vec<T>>
where
    C: ConnectionTrait,
    T: DeserializeOwned,
{
    Ok(load_value(db, user, collection).await?.unwrap_or_default())
}

/// Deletes one of the user's entries. Returns whether anything was removed.
#[instrument(skip(db))]
pub async fn remove<C>(db: &C, user: &str, collection: Collection) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = KvEntry::delete_by_id(storage_key(user, collection))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Deletes everything stored for `user`. Returns the number of entries removed.
#[instrument(skip(db))]
pub async fn clear_user<C>(db: &C, user: &str) -> Result<u64>
where
    C: ConnectionTrait,
{
    let keys = Collection::ALL.map(|collection| storage_key(user, collection));
    let result = KvEntry::delete_many()
        .filter(kv_entry::Column::Key.is_in(keys))
        .exec(db)
        .await?;
    debug!("Cleared {} entries for {}", result.rows_affected, user);
    Ok(result.rows_affected)
}

/// Users that have an entry for `collection`, sorted.
pub async fn users_with<C>(db: &C, collection: Collection) -> Result<Vec<String>>
where
    C: ConnectionTrait,
{
    let suffix = format!("_{}", collection.key_suffix());
    let entries = KvEntry::find()
        .filter(kv_entry::Column::Key.ends_with(suffix.as_str()))
        .all(db)
        .await?;

    let mut users: Vec<String> = entries
        .into_iter()
        .filter_map(|entry| entry.key.strip_suffix(suffix.as_str()).map(str::to_string))
        .filter(|user| !user.is_empty())
        .collect();
    users.sort();
    Ok(users)
}

/// The user's classes
pub async fn load_classes<C: ConnectionTrait>(db: &C, user: &str) -> Result<Vec<Event>> {
    load_collection(db, user, Collection::Classes).await
}

/// Replaces the user's classes
pub async fn save_classes<C: ConnectionTrait>(db: &C, user: &str, classes: &[Event]) -> Result<()> {
    save_collection(db, user, Collection::Classes, classes).await
}

/// The user's payments
pub async fn load_payments<C: ConnectionTrait>(db: &C, user: &str) -> Result<Vec<Payment>> {
    load_collection(db, user, Collection::Payments).await
}

/// Replaces the user's payments
pub async fn save_payments<C: ConnectionTrait>(
    db: &C,
    user: &str,
    payments: &[Payment],
) -> Result<()> {
    save_collection(db, user, Collection::Payments, payments).await
}

/// The user's reminders
pub async fn load_reminders<C: ConnectionTrait>(db: &C, user: &str) -> Result<Vec<Reminder>> {
    load_collection(db, user, Collection::Reminders).await
}

/// Replaces the user's reminders
pub async fn save_reminders<C: ConnectionTrait>(
    db: &C,
    user: &str,
    reminders: &[Reminder],
) -> Result<()> {
    save_collection(db, user, Collection::Reminders, reminders).await
}

/// The user's weekly availability
pub async fn load_availability<C: ConnectionTrait>(db: &C, user: &str) -> Result<Vec<TimeSlot>> {
    load_collection(db, user, Collection::Availability).await
}

/// Replaces the user's weekly availability after validating every slot
pub async fn save_availability<C: ConnectionTrait>(
    db: &C,
    user: &str,
    slots: &[TimeSlot],
) -> Result<()> {
    slots.iter().try_for_each(TimeSlot::validate)?;
    save_collection(db, user, Collection::Availability, slots).await
}

/// The user's notification settings, or `defaults` if they never saved any
pub async fn load_settings<C: ConnectionTrait>(
    db: &C,
    user: &str,
    defaults: &NotificationSettings,
) -> Result<NotificationSettings> {
    Ok(load_value(db, user, Collection::NotificationSettings)
        .await?
        .unwrap_or_else(|| defaults.clone()))
}

/// Stores the user's notification settings after validating them
pub async fn save_settings<C: ConnectionTrait>(
    db: &C,
    user: &str,
    settings: &NotificationSettings,
) -> Result<()> {
    settings.validate()?;
    save_value(db, user, Collection::NotificationSettings, settings).await
}

/// Stores a login session under its own email
pub async fn save_session<C: ConnectionTrait>(db: &C, session: &UserSession) -> Result<()> {
    save_value(db, &session.email, Collection::UserSession, session).await
}

/// The user's login session, if any
pub async fn load_session<C: ConnectionTrait>(db: &C, user: &str) -> Result<Option<UserSession>> {
    load_value(db, user, Collection::UserSession).await
}

/// Signs the user out. Returns whether a session existed.
pub async fn clear_session<C: ConnectionTrait>(db: &C, user: &str) -> Result<bool> {
    remove(db, user, Collection::UserSession).await
}
