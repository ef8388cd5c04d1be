use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sermon {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub preacher: String,
    pub date_preached: DateTime<Utc>,
    pub scripture_text: Option<String>,
    pub audio_file_id: Option<Uuid>,
    pub video_file_id: Option<Uuid>,
    pub thumbnail_file_id: Option<Uuid>,
    pub uploaded_by_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sermon {
    pub const TABLE: &'static str = "sermons";
}
