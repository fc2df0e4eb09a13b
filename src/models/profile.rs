use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Personal details of a registered user. `id` equals the user id.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}
