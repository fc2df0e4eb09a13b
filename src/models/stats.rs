use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SiteCounts {
    pub sermons: i64,
    pub photos: i64,
    pub events: i64,
    pub members: i64,
    pub total_cents: i64,
}
