use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An uploaded object; `key` is its location inside the storage bucket.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    pub id: Uuid,
    pub key: String,
    pub name: String,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
}

impl File {
    pub const TABLE: &'static str = "files";
}
