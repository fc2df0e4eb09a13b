use sqlx::PgPool;
use std::sync::Arc;

use youthhub::config::AppConfig;
use youthhub::db::Database;
use youthhub::services::Storage;

use crate::web::security::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub rate_limiter: Arc<RateLimiter>,
    pub storage: Arc<Storage>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn db(&self) -> Database {
        Database::from_pool(self.pool.clone())
    }
}
