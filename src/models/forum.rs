use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const FORUM_TITLE_MAX: usize = 200;

/// A forum post with its like and comment counts.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ForumPost {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub likes: i64,
    pub comments: i64,
}

impl ForumPost {
    pub fn posted_label(&self) -> String {
        self.created_at.format("%b %-d, %Y %H:%M").to_string()
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ForumComment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ForumComment {
    pub fn posted_label(&self) -> String {
        self.created_at.format("%b %-d, %Y %H:%M").to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumPostCreate {
    pub author_id: Uuid,
    pub author_name: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumCommentCreate {
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub content: String,
}
