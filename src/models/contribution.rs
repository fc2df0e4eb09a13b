use chrono::{DateTime, Utc};
use field_names::FieldNames;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::common::{format_currency, format_date};
use crate::services::calendar::format_week;

pub const WEEKLY_DESCRIPTION: &str = "Weekly contribution";

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Contribution {
    pub id: Uuid,
    pub member_id: Uuid,
    pub amount_cents: i64,
    pub date: DateTime<Utc>,
    pub week: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A contribution joined with the member it belongs to.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ContributionRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub member_name: String,
    pub member_email: String,
    pub amount_cents: i64,
    pub date: DateTime<Utc>,
    pub week: String,
    pub description: Option<String>,
}

impl ContributionRow {
    pub fn amount_label(&self) -> String {
        format_currency(self.amount_cents)
    }

    pub fn date_label(&self) -> String {
        format_date(self.date.date_naive())
    }

    pub fn week_label(&self) -> String {
        format_week(&self.week).unwrap_or_else(|| self.week.clone())
    }

    pub fn description_label(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionCreate {
    pub member_id: Uuid,
    pub amount_cents: i64,
    pub date: DateTime<Utc>,
    pub week: String,
    pub description: Option<String>,
}

/// Filters for listing contributions. `date` and `amount_cents` are lower bounds.
#[derive(Debug, Clone, FieldNames, Default, Serialize)]
#[field_names(vis = "pub")]
pub struct ContributionQuery {
    pub member_id: Option<Uuid>,
    pub week: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub amount_cents: Option<i64>,
    //------------------------------------
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<Vec<Option<bool>>>,
}

impl ContributionQuery {
    pub fn fields() -> &'static [&'static str] {
        &Self::FIELDS
    }

    /// Number of leading fields that name sortable columns.
    pub fn sortable_len() -> usize {
        Self::fields().len().saturating_sub(3)
    }

    pub fn is_empty(&self) -> bool {
        matches!(
            self,
            Self {
                member_id: None,
                week: None,
                date: None,
                amount_cents: None,
                ..
            }
        )
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// `YYYY-MM`
    pub month: String,
    pub total_cents: i64,
}

impl MonthlyTotal {
    pub fn total_label(&self) -> String {
        format_currency(self.total_cents)
    }
}
