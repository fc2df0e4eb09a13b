use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::common::format_date;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Sermon {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Sermon {
    pub fn date_label(&self) -> String {
        format_date(self.date)
    }

    pub fn date_input(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SermonCreate {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SermonUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl SermonUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.date.is_none()
    }
}
