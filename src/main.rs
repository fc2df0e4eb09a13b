mod web;

use actix_files::Files;
use actix_multipart::form::MultipartFormConfig;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use std::sync::Arc;

use youthhub::config::AppConfig;
use youthhub::db::{self, Database};
use youthhub::services::Storage;
use youthhub::services::storage::FILE_SIZE_LIMIT;

use web::middleware::SecurityHeaders;
use web::security::RateLimiter;

/// Room for the text fields that travel with an upload.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let db = Database::new(&config.database_url)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to connect to database: {e}")))?;

    match db::purge_expired_sessions(&db.pool).await {
        Ok(0) => {}
        Ok(n) => log::info!("Purged {} expired sessions", n),
        Err(e) => log::warn!("Could not purge expired sessions: {}", e),
    }

    let storage = Storage::new(&config.storage_dir, &config.storage_url_prefix);
    let created = storage
        .ensure_buckets()
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to prepare storage: {e}")))?;
    if !created.is_empty() {
        log::info!("Created {} storage buckets", created.len());
    }

    let bind_addr = config.bind_addr.clone();
    let state = Data::new(web::AppState {
        pool: db.pool,
        rate_limiter: Arc::new(RateLimiter::new()),
        storage: Arc::new(storage),
        config: Arc::new(config),
    });

    log::info!("Listening on {}", bind_addr);

    HttpServer::new(move || {
        let config = &state.config;

        App::new()
            .wrap(SecurityHeaders)
            .app_data(state.clone())
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(FILE_SIZE_LIMIT as usize + MULTIPART_OVERHEAD),
            )
            .configure(web::handlers::configure)
            .service(Files::new(&config.storage_url_prefix, &config.storage_dir))
            .service(Files::new("/static", "./static").prefer_utf8(true))
            .default_service(actix_web::web::route().to(web::handlers::public::not_found))
    })
    .bind(bind_addr)?
    .run()
    .await
}
