use thiserror::Error;
use uuid::Uuid;

use crate::models::UserIden;

#[derive(Error, Debug)]
pub enum GeneralError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Environment variable {0} must be set")]
    Missing(&'static str),

    #[error("Environment variable {name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum UserError {
    #[error("User with {0} not found")]
    NotFound(UserIden),

    #[error("User with {0} already exists")]
    AlreadyExists(UserIden),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum MemberError {
    #[error("Member {0} not found")]
    NotFound(Uuid),

    #[error("Member with email '{0}' already exists")]
    AlreadyExists(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("An unexpected error occurred")]
    Internal,
}

#[derive(Error, Debug)]
pub enum ContributionError {
    #[error("Member {0} not found")]
    MemberNotFound(Uuid),

    #[error("Contribution amount must be positive, got {0} cents")]
    InvalidAmount(i64),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Unknown storage bucket '{0}'")]
    UnknownBucket(String),

    #[error("Invalid object name '{0}'")]
    InvalidObjectName(String),

    #[error("Object of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error("Unsupported content type '{0}'")]
    UnsupportedContentType(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
