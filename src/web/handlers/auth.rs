use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use std::time::Duration;

use youthhub::common::UserError;
use youthhub::db;
use youthhub::models::{Registration, User};
use youthhub::services::{Access, PasswordManager};

use crate::web::forms::{AuthQuery, LoginForm, RegisterForm};
use crate::web::helpers::{
    Nav, client_ip, current_viewer, describe_error, describe_notice, redirect, redirect_with_error,
    removal_cookie, render, session_cookie, session_token,
};
use crate::web::security::generic_error_message;
use crate::web::state::AppState;
use crate::web::templates::{AdminLoginTemplate, LoginTemplate, RegisterTemplate};

const LOGIN_ATTEMPTS: usize = 5;
const LOGIN_WINDOW: Duration = Duration::from_secs(300);
const REGISTER_ATTEMPTS: usize = 3;
const REGISTER_WINDOW: Duration = Duration::from_secs(3600);

/// Outcome of checking an email and password.
enum Authenticated {
    Ok(User),
    Invalid,
    Failed,
}

/// Verifies credentials, hashing against a dummy when the user is unknown so
/// both paths take the same time.
async fn authenticate(state: &AppState, form: &LoginForm) -> Authenticated {
    let user = match state.db().get_user(&form.email.as_str().into()).await {
        Ok(u) => Some(u),
        Err(UserError::NotFound(_)) => None,
        Err(e) => {
            log::error!("Database error during login: {}", e);
            return Authenticated::Failed;
        }
    };

    let stored_hash = user
        .as_ref()
        .map_or(PasswordManager::dummy_hash(), |u| u.password_hash.as_str());

    let password_valid =
        PasswordManager::verify_password(&form.password, stored_hash).unwrap_or(false);

    match user {
        Some(u) if password_valid => Authenticated::Ok(u),
        _ => Authenticated::Invalid,
    }
}

/// Creates the session row and the response carrying its cookie.
async fn start_session(
    state: &AppState,
    req: &HttpRequest,
    user: &User,
    location: &str,
    error_location: &str,
) -> HttpResponse {
    let ttl = chrono::Duration::hours(state.config.session_ttl_hours);

    match db::create_session(&state.pool, user.id, ttl).await {
        Ok(session) => {
            log::info!("User {} signed in", user.id);
            let mut resp = redirect(req, location);
            if let Err(e) = resp.add_cookie(&session_cookie(
                session.token,
                state.config.session_ttl_hours,
                state.config.secure_cookies,
            )) {
                log::error!("Failed to set session cookie: {}", e);
                return redirect_with_error(req, error_location, "internal");
            }
            resp
        }
        Err(e) => {
            log::error!("Failed to create session: {}", e);
            redirect_with_error(req, error_location, "internal")
        }
    }
}

fn rate_limited(
    state: &AppState,
    req: &HttpRequest,
    action: &str,
    max: usize,
    window: Duration,
) -> bool {
    let key = format!("{}:{}", action, client_ip(req));
    !state.rate_limiter.check_rate_limit(&key, max, window)
}

#[get("/login")]
pub async fn login_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<AuthQuery>,
) -> impl Responder {
    let viewer = current_viewer(&state, &req).await;

    render(LoginTemplate {
        nav: Nav::for_viewer(viewer.as_ref()),
        error: describe_error(query.error.as_deref()),
        notice: describe_notice(query.notice.as_deref()),
    })
}

#[post("/login")]
pub async fn login_submit(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<LoginForm>,
) -> impl Responder {
    if rate_limited(&state, &req, "login", LOGIN_ATTEMPTS, LOGIN_WINDOW) {
        return redirect_with_error(&req, "/login", "rate_limit");
    }

    if form.email.trim().is_empty() || form.password.is_empty() {
        return redirect_with_error(&req, "/login", "missing");
    }

    match authenticate(&state, &form).await {
        Authenticated::Ok(user) => start_session(&state, &req, &user, "/", "/login").await,
        Authenticated::Invalid => redirect_with_error(&req, "/login", "invalid"),
        Authenticated::Failed => redirect_with_error(&req, "/login", "internal"),
    }
}

#[get("/register")]
pub async fn register_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<AuthQuery>,
) -> impl Responder {
    let viewer = current_viewer(&state, &req).await;

    render(RegisterTemplate {
        nav: Nav::for_viewer(viewer.as_ref()),
        error: describe_error(query.error.as_deref()),
        name: String::new(),
        email: String::new(),
        phone: String::new(),
    })
}

#[post("/register")]
pub async fn register_submit(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<RegisterForm>,
) -> impl Responder {
    let form = form.into_inner();
    let rerender = |error: String| {
        render(RegisterTemplate {
            nav: Nav::default(),
            error: Some(error),
            name: form.name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
        })
    };

    // Validate before hashing
    if let Err(e) = form.validate() {
        return rerender(e);
    }

    if rate_limited(&state, &req, "register", REGISTER_ATTEMPTS, REGISTER_WINDOW) {
        return redirect_with_error(&req, "/register", "rate_limit");
    }

    let password_hash = match PasswordManager::hash_password(&form.password) {
        Ok(h) => h,
        Err(e) => {
            log::error!("Password hashing error: {}", e);
            return rerender(generic_error_message("registration"));
        }
    };

    let registration = Registration {
        name: form.name.clone(),
        email: form.email.clone(),
        phone: form.phone.clone(),
        password_hash,
    };

    match state.db().register(&registration).await {
        Ok((user, _)) => {
            log::info!("Registered user {}", user.id);
            redirect(&req, "/login?notice=registered")
        }
        Err(UserError::AlreadyExists(_)) => {
            rerender("An account with this email already exists".to_string())
        }
        Err(e) => {
            log::error!("Database error during registration: {}", e);
            rerender(generic_error_message("registration"))
        }
    }
}

#[post("/logout")]
pub async fn logout(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Some(token) = session_token(&req) {
        if let Err(e) = db::delete_session(&state.pool, token).await {
            log::error!("Failed to delete session: {}", e);
        }
    }

    let mut resp = redirect(&req, "/login?notice=signed_out");
    if let Err(e) = resp.add_removal_cookie(&removal_cookie(state.config.secure_cookies)) {
        log::error!("Failed to clear session cookie: {}", e);
    }
    resp
}

#[get("/admin/login")]
pub async fn admin_login_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<AuthQuery>,
) -> impl Responder {
    let viewer = current_viewer(&state, &req).await;
    if viewer.as_ref().is_some_and(|v| v.access.is_admin()) {
        return redirect(&req, "/admin");
    }

    render(AdminLoginTemplate {
        nav: Nav::for_viewer(viewer.as_ref()),
        error: describe_error(query.error.as_deref()),
    })
}

#[post("/admin/login")]
pub async fn admin_login_submit(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<LoginForm>,
) -> impl Responder {
    if rate_limited(&state, &req, "login", LOGIN_ATTEMPTS, LOGIN_WINDOW) {
        return redirect_with_error(&req, "/admin/login", "rate_limit");
    }

    if form.email.trim().is_empty() || form.password.is_empty() {
        return redirect_with_error(&req, "/admin/login", "missing");
    }

    let user = match authenticate(&state, &form).await {
        Authenticated::Ok(user) => user,
        Authenticated::Invalid => return redirect_with_error(&req, "/admin/login", "invalid"),
        Authenticated::Failed => return redirect_with_error(&req, "/admin/login", "internal"),
    };

    let profile = match db::get_profile(&state.pool, user.id).await {
        Ok(p) => p,
        Err(e) => {
            log::error!("Failed to load profile for {}: {}", user.id, e);
            return redirect_with_error(&req, "/admin/login", "internal");
        }
    };

    let access = Access::resolve(Some(&user.email), profile.as_ref(), &state.config.admin_emails);
    if !access.is_admin() {
        log::warn!("Non-admin {} tried the admin login", user.id);
        return redirect_with_error(&req, "/admin/login", "not_admin");
    }

    start_session(&state, &req, &user, "/admin", "/admin/login").await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login_form)
        .service(login_submit)
        .service(register_form)
        .service(register_submit)
        .service(logout)
        .service(admin_login_form)
        .service(admin_login_submit);
}
