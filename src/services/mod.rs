pub use access::{Access, Denial};
pub use auth::PasswordManager;
pub use storage::{Bucket, Storage, StoredObject};

pub mod access;
pub mod auth;
pub mod calendar;
pub mod reports;
pub mod storage;
