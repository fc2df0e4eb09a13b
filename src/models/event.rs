use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::EventType;
use crate::common::{format_date, format_date_time};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub event_type: EventType,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn date_label(&self) -> String {
        format_date(self.date)
    }

    pub fn when_label(&self) -> String {
        format_date_time(self.date, Some(&self.time_range()))
    }

    pub fn time_range(&self) -> String {
        format!(
            "{} - {}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }

    pub fn date_input(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn start_input(&self) -> String {
        self.start_time.format("%H:%M").to_string()
    }

    pub fn end_input(&self) -> String {
        self.end_time.format("%H:%M").to_string()
    }

    pub fn type_label(&self) -> &'static str {
        self.event_type.label()
    }
}

/// Full set of event fields; used for both insert and update.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct EventCreate {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub event_type: EventType,
}
