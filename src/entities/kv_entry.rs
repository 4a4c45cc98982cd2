//! Key-value entry entity - one serialized collection or record per row.
//!
//! Keys are `<user email>_<collection>`, values are JSON documents.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Key-value database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kv_entries")]
pub struct Model {
    /// Storage key, e.g. `"parent@example.com_reminders"`
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// JSON-encoded value
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When the value was last written
    pub updated_at: DateTime,
}

/// `KvEntry` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
