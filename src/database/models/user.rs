use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A member account. The password hash column exists in the table but is
/// never part of this projection.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: String,
    pub profile_image_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub const TABLE: &'static str = "users";

    pub const COLUMNS: [&'static str; 11] = [
        "id",
        "first_name",
        "last_name",
        "email",
        "phone",
        "address",
        "role",
        "profile_image_id",
        "department_id",
        "created_at",
        "updated_at",
    ];

    pub fn columns() -> Vec<String> {
        Self::COLUMNS.iter().map(|c| c.to_string()).collect()
    }
}
