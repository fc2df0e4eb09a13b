use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::web::Data;
use actix_web::{App, test};
use sqlx::PgPool;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use youthhub::config::AppConfig;
use youthhub::db;
use youthhub::services::{PasswordManager, Storage};

use crate::web::AppState;
use crate::web::handlers;
use crate::web::helpers::SESSION_COOKIE;
use crate::web::security::RateLimiter;

const ADMIN_EMAIL: &str = "admin@test.com";
const MEMBER_EMAIL: &str = "member@test.com";
const PASSWORD: &str = "secret1";

fn admin_id() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-000000000000").unwrap()
}

fn member_user_id() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap()
}

fn alice_id() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-0000000000a0").unwrap()
}

fn state(pool: PgPool, storage_dir: &Path) -> AppState {
    AppState {
        pool,
        rate_limiter: Arc::new(RateLimiter::new()),
        storage: Arc::new(Storage::new(storage_dir, "/storage")),
        config: Arc::new(AppConfig {
            database_url: "postgres://unused".into(),
            bind_addr: AppConfig::DEFAULT_BIND_ADDR.into(),
            storage_dir: storage_dir.to_path_buf(),
            storage_url_prefix: "/storage".into(),
            admin_emails: Vec::new(),
            session_ttl_hours: 1,
            secure_cookies: false,
        }),
    }
}

/// Seed passwords are placeholders, so give the user a real hash.
async fn set_password(pool: &PgPool, user_id: Uuid) {
    let hash = PasswordManager::hash_password(PASSWORD).unwrap();
    sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
        .bind(hash)
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
}

async fn session_for(pool: &PgPool, user_id: Uuid) -> Cookie<'static> {
    let session = db::create_session(pool, user_id, chrono::Duration::hours(1))
        .await
        .unwrap();
    Cookie::new(SESSION_COOKIE, session.token.to_string())
}

async fn session_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
        .fetch_one(pool)
        .await
        .unwrap()
}

fn location<B>(resp: &ServiceResponse<B>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn session_cookie_set<B>(resp: &ServiceResponse<B>) -> bool {
    resp.response()
        .cookies()
        .any(|c| c.name() == SESSION_COOKIE && !c.value().is_empty())
}

#[sqlx::test(
    migrations = "./migrations",
    fixtures(path = "../../tests/fixtures", scripts("seed"))
)]
async fn admin_login_refuses_members(pool: PgPool) {
    set_password(&pool, member_user_id()).await;
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(Data::new(state(pool.clone(), dir.path())))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/admin/login")
        .set_form(vec![("email", MEMBER_EMAIL), ("password", PASSWORD)])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/login?error=not_admin");
    assert!(!session_cookie_set(&resp));
    assert_eq!(session_count(&pool).await, 0);

    // The same credentials still work on the member login.
    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(vec![("email", MEMBER_EMAIL), ("password", PASSWORD)])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/");
    assert!(session_cookie_set(&resp));
}

#[sqlx::test(
    migrations = "./migrations",
    fixtures(path = "../../tests/fixtures", scripts("seed"))
)]
async fn admin_login_opens_the_dashboard(pool: PgPool) {
    set_password(&pool, admin_id()).await;
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(Data::new(state(pool.clone(), dir.path())))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/admin/login")
        .set_form(vec![("email", ADMIN_EMAIL), ("password", "wrong-password")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/admin/login?error=invalid");
    assert!(!session_cookie_set(&resp));

    let req = test::TestRequest::post()
        .uri("/admin/login")
        .set_form(vec![("email", ADMIN_EMAIL), ("password", PASSWORD)])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin");

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
        .unwrap();

    let req = test::TestRequest::get().uri("/admin").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("<span>2</span> sermons"));
    assert!(html.contains("<span>3</span> events"));
    assert!(html.contains("<span>2</span> members"));
}

#[sqlx::test(
    migrations = "./migrations",
    fixtures(path = "../../tests/fixtures", scripts("seed"))
)]
async fn anonymous_visitors_are_sent_to_sign_in(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(Data::new(state(pool, dir.path())))
            .configure(handlers::configure),
    )
    .await;

    for (uri, target) in [
        ("/sermons", "/login?error=signin"),
        ("/gallery", "/login?error=signin"),
        ("/admin", "/admin/login"),
        ("/admin/members", "/admin/login"),
        ("/admin/contributions", "/admin/login"),
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&resp), target, "{uri}");
    }

    let req = test::TestRequest::get()
        .uri("/admin")
        .insert_header(("HX-Request", "true"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("HX-Redirect").unwrap(), "/admin/login");
}

#[sqlx::test(
    migrations = "./migrations",
    fixtures(path = "../../tests/fixtures", scripts("seed"))
)]
async fn members_cannot_use_admin_pages(pool: PgPool) {
    let cookie = session_for(&pool, member_user_id()).await;
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(Data::new(state(pool.clone(), dir.path())))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/sermons")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/admin")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/?error=admin");

    let req = test::TestRequest::post()
        .uri(&format!("/admin/members/{}/delete", alice_id()))
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/?error=admin");

    let alice = db::get_member(&pool, alice_id()).await.unwrap();
    assert!(alice.is_some());
}

#[sqlx::test(
    migrations = "./migrations",
    fixtures(path = "../../tests/fixtures", scripts("seed"))
)]
async fn contributions_page_survives_huge_page_numbers(pool: PgPool) {
    let cookie = session_for(&pool, admin_id()).await;
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(Data::new(state(pool, dir.path())))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!("/admin/contributions?page={}", i64::MAX))
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("Invalid page"));
    assert!(!html.contains(">Next</a>"));
}
