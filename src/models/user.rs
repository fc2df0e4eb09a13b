use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use std::fmt;

/// An authenticated account. Personal details live in [`super::Profile`].
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub edited_at: DateTime<Utc>,
}

/// Sign-up payload: the account plus the profile created alongside it.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum UserIden {
    Id(Uuid),
    Email(String),
}

impl fmt::Display for UserIden {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserIden::Id(id) => write!(f, "ID {}", id),
            UserIden::Email(email) => write!(f, "email '{}'", email),
        }
    }
}

impl From<Uuid> for UserIden {
    fn from(id: Uuid) -> Self {
        UserIden::Id(id)
    }
}

impl From<String> for UserIden {
    fn from(email: String) -> Self {
        UserIden::Email(email)
    }
}

impl From<&String> for UserIden {
    fn from(email: &String) -> Self {
        UserIden::Email(email.clone())
    }
}

impl From<&str> for UserIden {
    fn from(email: &str) -> Self {
        UserIden::Email(email.to_string())
    }
}
