use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use youthhub::common::parse_amount_cents;
use youthhub::models::{
    ContributionCreate, ContributionQuery, EventCreate, EventType, FORUM_TITLE_MAX, MemberCreate,
    MemberUpdate, SermonUpdate, WEEKLY_DESCRIPTION,
};
use youthhub::services::calendar::week_label;

use crate::web::security::{PasswordValidator, validate_email, validate_phone};

pub const DEFAULT_START_TIME: &str = "18:00";
pub const DEFAULT_END_TIME: &str = "20:00";

/// A rejected form field. Redirects carry [`FormError::code`], never the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("Please enter a valid date")]
    Date,
    #[error("Please enter a valid time")]
    Time,
    #[error("Please choose a valid event type")]
    EventType,
    #[error("End time cannot be before start time")]
    EndBeforeStart,
    #[error("Please enter a valid email address")]
    Email,
    #[error("Nothing to update")]
    NothingToUpdate,
    #[error("Please choose a member")]
    Member,
    #[error("Amounts must be numbers greater than zero")]
    Amount,
    #[error("Contributions cannot be sorted that way")]
    Sort,
    #[error("Invalid page")]
    Page,
    #[error("Title must be at most {} characters", FORUM_TITLE_MAX)]
    TitleTooLong,
}

impl FormError {
    const CODED: [FormError; 11] = [
        Self::Date,
        Self::Time,
        Self::EventType,
        Self::EndBeforeStart,
        Self::Email,
        Self::NothingToUpdate,
        Self::Member,
        Self::Amount,
        Self::Sort,
        Self::Page,
        Self::TitleTooLong,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing(_) => "missing",
            Self::Date => "bad_date",
            Self::Time => "bad_time",
            Self::EventType => "bad_event_type",
            Self::EndBeforeStart => "end_before_start",
            Self::Email => "bad_email",
            Self::NothingToUpdate => "nothing_to_update",
            Self::Member => "bad_member",
            Self::Amount => "bad_amount",
            Self::Sort => "bad_sort",
            Self::Page => "bad_page",
            Self::TitleTooLong => "title_too_long",
        }
    }

    /// `missing` has no field name to restore, so it is not decoded here.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::CODED.into_iter().find(|e| e.code() == code)
    }
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct AuthQuery {
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().chars().count() < 2 {
            return Err("Name must be at least 2 characters".into());
        }
        if !validate_email(&self.email) {
            return Err("Please enter a valid email address".into());
        }
        if !validate_phone(&self.phone) {
            return Err("Please enter a valid phone number".into());
        }
        PasswordValidator::validate(&self.password)?;
        if self.password != self.confirm_password {
            return Err("Passwords do not match".into());
        }
        Ok(())
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FormError::Missing(field));
    }
    Ok(value)
}

fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| FormError::Date)
}

fn parse_time(value: &str) -> Result<NaiveTime, FormError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| FormError::Time)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Deserialize)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub event_type: String,
}

impl EventForm {
    pub fn validate(&self) -> Result<EventCreate, FormError> {
        let title = required(&self.title, "Title")?;
        let description = required(&self.description, "Description")?;
        let date = parse_date(required(&self.date, "Date")?)?;
        let start_time = parse_time(required(&self.start_time, "Start time")?)?;
        let end_time = parse_time(required(&self.end_time, "End time")?)?;
        let location = required(&self.location, "Location")?;
        let event_type: EventType = required(&self.event_type, "Event type")?
            .parse()
            .map_err(|_| FormError::EventType)?;

        if end_time < start_time {
            return Err(FormError::EndBeforeStart);
        }

        Ok(EventCreate {
            title: title.to_string(),
            description: description.to_string(),
            date,
            start_time,
            end_time,
            location: location.to_string(),
            event_type,
        })
    }
}

#[derive(Deserialize)]
pub struct EventsQuery {
    pub category: Option<String>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(MultipartForm)]
pub struct SermonUploadForm {
    pub title: Text<String>,
    pub description: Text<String>,
    pub date: Text<String>,
    #[multipart(limit = "10MiB")]
    pub image: Option<TempFile>,
}

#[derive(Deserialize)]
pub struct SermonEditForm {
    pub title: String,
    pub description: String,
    pub date: String,
}

impl SermonEditForm {
    pub fn validate(&self) -> Result<SermonUpdate, FormError> {
        let title = required(&self.title, "Title")?;
        let description = required(&self.description, "Description")?;
        let date = parse_date(required(&self.date, "Date")?)?;

        Ok(SermonUpdate {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            date: Some(date),
        })
    }
}

/// Validates the text part of a sermon upload.
pub fn validate_sermon_fields(
    title: &str,
    description: &str,
    date: &str,
) -> Result<(String, String, NaiveDate), FormError> {
    let title = required(title, "Title")?;
    let description = required(description, "Description")?;
    let date = parse_date(required(date, "Date")?)?;
    Ok((title.to_string(), description.to_string(), date))
}

#[derive(MultipartForm)]
pub struct PhotoUploadForm {
    pub title: Text<String>,
    #[multipart(limit = "10MiB")]
    pub image: Option<TempFile>,
}

/// An upload part with no bytes is treated as no file at all.
pub fn present_file(file: Option<TempFile>) -> Option<TempFile> {
    file.filter(|f| f.size > 0)
}

#[derive(Deserialize)]
pub struct MemberForm {
    pub name: String,
    pub email: String,
}

impl MemberForm {
    pub fn validate(&self) -> Result<MemberCreate, FormError> {
        let name = required(&self.name, "Name")?;
        let email = required(&self.email, "Email")?;
        if !validate_email(email) {
            return Err(FormError::Email);
        }
        Ok(MemberCreate {
            name: name.to_string(),
            email: email.to_lowercase(),
        })
    }

    /// Blank fields are left unchanged.
    pub fn to_update(&self, id: Uuid) -> Result<MemberUpdate, FormError> {
        let email = non_empty(Some(&self.email));
        if email.as_deref().is_some_and(|e| !validate_email(e)) {
            return Err(FormError::Email);
        }
        let update = MemberUpdate {
            id,
            name: non_empty(Some(&self.name)),
            email: email.map(|e| e.to_lowercase()),
        };
        if update.is_empty() {
            return Err(FormError::NothingToUpdate);
        }
        Ok(update)
    }
}

#[derive(Deserialize)]
pub struct SingleContributionForm {
    pub member_id: String,
    pub amount: String,
    pub description: Option<String>,
}

impl SingleContributionForm {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<ContributionCreate, FormError> {
        let member_id = Uuid::parse_str(required(&self.member_id, "Member")?)
            .map_err(|_| FormError::Member)?;
        let amount_cents = parse_amount_cents(required(&self.amount, "Amount")?)
            .filter(|cents| *cents > 0)
            .ok_or(FormError::Amount)?;

        Ok(ContributionCreate {
            member_id,
            amount_cents,
            date: now,
            week: week_label(now.date_naive()),
            description: non_empty(self.description.as_deref()),
        })
    }
}

pub const WEEKLY_AMOUNT_PREFIX: &str = "amount:";

/// Turns `amount:<member id>=<dollars>` pairs into contributions.
///
/// Blank and zero amounts are skipped. Any malformed key or amount rejects
/// the whole submission.
pub fn parse_weekly_amounts(
    pairs: &[(String, String)],
    now: DateTime<Utc>,
) -> Result<Vec<ContributionCreate>, FormError> {
    let week = week_label(now.date_naive());
    let mut entries = Vec::new();

    for (key, value) in pairs {
        let Some(id) = key.strip_prefix(WEEKLY_AMOUNT_PREFIX) else {
            continue;
        };
        let member_id = Uuid::parse_str(id).map_err(|_| FormError::Member)?;

        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        let amount_cents = parse_amount_cents(value).ok_or(FormError::Amount)?;
        if amount_cents == 0 {
            continue;
        }

        entries.push(ContributionCreate {
            member_id,
            amount_cents,
            date: now,
            week: week.clone(),
            description: Some(WEEKLY_DESCRIPTION.to_string()),
        });
    }

    Ok(entries)
}

#[derive(Deserialize, Default)]
pub struct ContributionsFilterQuery {
    pub member_id: Option<String>,
    pub week: Option<String>,
    pub from: Option<String>,
    pub min_amount: Option<String>,
    /// `<column>:<asc|desc>`
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl ContributionsFilterQuery {
    pub const PAGE_SIZE: i64 = 50;

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn to_query(&self) -> Result<ContributionQuery, FormError> {
        let member_id = non_empty(self.member_id.as_deref())
            .map(|id| Uuid::parse_str(&id).map_err(|_| FormError::Member))
            .transpose()?;

        let date = non_empty(self.from.as_deref())
            .map(|d| parse_date(&d))
            .transpose()?
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|d| d.and_utc());

        let amount_cents = non_empty(self.min_amount.as_deref())
            .map(|a| parse_amount_cents(&a).ok_or(FormError::Amount))
            .transpose()?;

        let offset = (self.page() - 1)
            .checked_mul(Self::PAGE_SIZE)
            .ok_or(FormError::Page)?;

        Ok(ContributionQuery {
            member_id,
            week: non_empty(self.week.as_deref()),
            date,
            amount_cents,
            offset: Some(offset),
            limit: Some(Self::PAGE_SIZE),
            sort_by: self.sort_flags()?,
        })
    }

    fn sort_flags(&self) -> Result<Option<Vec<Option<bool>>>, FormError> {
        let Some(sort) = non_empty(self.sort.as_deref()) else {
            return Ok(None);
        };

        let (column, direction) = sort.split_once(':').unwrap_or((sort.as_str(), "asc"));
        let is_asc = match direction {
            "asc" => true,
            "desc" => false,
            _ => return Err(FormError::Sort),
        };

        let sortable = &ContributionQuery::fields()[..ContributionQuery::sortable_len()];
        let index = sortable
            .iter()
            .position(|c| *c == column)
            .ok_or(FormError::Sort)?;

        let mut flags = vec![None; index + 1];
        flags[index] = Some(is_asc);
        Ok(Some(flags))
    }
}

#[derive(Deserialize)]
pub struct ForumPostForm {
    pub title: String,
    pub content: String,
}

impl ForumPostForm {
    pub fn validate(&self) -> Result<(String, String), FormError> {
        let title = required(&self.title, "Title")?;
        let content = required(&self.content, "Message")?;
        if title.chars().count() > FORUM_TITLE_MAX {
            return Err(FormError::TitleTooLong);
        }
        Ok((title.to_string(), content.to_string()))
    }
}

#[derive(Deserialize)]
pub struct ForumCommentForm {
    pub content: String,
}

#[derive(Deserialize)]
pub struct NoticeQuery {
    pub error: Option<String>,
    pub notice: Option<String>,
}
