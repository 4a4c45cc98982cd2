//! Database configuration module.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. The
//! schema is generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the table always matches the Rust
//! model.

use crate::entities::KvEntry;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::debug;

/// Used when `DATABASE_URL` is not set. `mode=rwc` creates the file on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/schedule_buddy.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or
/// falls back to [`DEFAULT_DATABASE_URL`].
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Opens the database at `database_url` and makes sure the schema exists.
///
/// For file-backed `SQLite` URLs the parent directory is created first.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(dir) = sqlite_parent_dir(database_url) {
        debug!("Ensuring database directory {:?} exists", dir);
        std::fs::create_dir_all(dir)?;
    }

    let db = Database::connect(database_url).await?;
    create_tables(&db).await?;
    Ok(db)
}

/// Creates all tables that do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut kv_table = schema.create_table_from_entity(KvEntry);
    kv_table.if_not_exists();

    db.execute(builder.build(&kv_table)).await?;

    Ok(())
}

/// `sqlite://data/app.sqlite?mode=rwc` → `data`. `None` for in-memory
/// databases, non-`SQLite` URLs and files in the working directory.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::KvEntryModel;
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let _: Vec<KvEntryModel> = KvEntry::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_connection_in_memory() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        let _: Vec<KvEntryModel> = KvEntry::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[test]
    fn test_sqlite_parent_dir() {
        assert_eq!(
            sqlite_parent_dir("sqlite://data/schedule_buddy.sqlite?mode=rwc"),
            Some(Path::new("data"))
        );
        assert_eq!(sqlite_parent_dir("sqlite::memory:"), None);
        assert_eq!(sqlite_parent_dir("sqlite://local.sqlite"), None);
        assert_eq!(sqlite_parent_dir("postgres://localhost/db"), None);
    }
}
