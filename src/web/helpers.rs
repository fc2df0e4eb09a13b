use actix_multipart::form::tempfile::TempFile;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponse};
use askama::Template;
use uuid::Uuid;

use youthhub::common::StorageError;
use youthhub::db;
use youthhub::services::storage::ensure_image;
use youthhub::services::{Access, Bucket, Denial, Storage, StoredObject};

use crate::web::forms::FormError;
use crate::web::state::AppState;

pub const SESSION_COOKIE: &str = "yh_session";

/// The signed-in user behind a request, if any.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub access: Access,
}

/// What the page chrome needs to know about the viewer.
#[derive(Debug, Clone, Default)]
pub struct Nav {
    pub signed_in: bool,
    pub is_admin: bool,
    pub name: String,
}

impl Nav {
    pub fn for_viewer(viewer: Option<&Viewer>) -> Self {
        match viewer {
            Some(v) => Self {
                signed_in: true,
                is_admin: v.access.is_admin(),
                name: v.name.clone(),
            },
            None => Self::default(),
        }
    }
}

pub fn is_htmx(req: &HttpRequest) -> bool {
    req.headers()
        .get("HX-Request")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|s| s.eq_ignore_ascii_case("true"))
}

pub fn session_token(req: &HttpRequest) -> Option<Uuid> {
    req.cookie(SESSION_COOKIE)
        .map(|c| c.value().trim().to_string())
        .filter(|s| !s.is_empty())
        .and_then(|s| Uuid::parse_str(&s).ok())
}

/// Resolves the session cookie to a viewer. Lookup failures count as signed out.
pub async fn current_viewer(state: &AppState, req: &HttpRequest) -> Option<Viewer> {
    let token = session_token(req)?;

    let session = match db::get_active_session(&state.pool, token).await {
        Ok(s) => s?,
        Err(e) => {
            log::error!("Session lookup failed: {}", e);
            return None;
        }
    };

    let user = match state.db().get_user(&session.user_id.into()).await {
        Ok(u) => u,
        Err(e) => {
            log::warn!("Session {} points at a missing user: {}", token, e);
            return None;
        }
    };

    let profile = db::get_profile(&state.pool, user.id).await.unwrap_or_else(|e| {
        log::warn!("Could not fetch profile for {}: {}", user.id, e);
        None
    });

    let access = Access::resolve(Some(&user.email), profile.as_ref(), &state.config.admin_emails);
    let name = profile
        .map(|p| p.name)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| user.email.split('@').next().unwrap_or("member").to_string());

    Some(Viewer {
        user_id: user.id,
        email: user.email,
        name,
        access,
    })
}

/// Resolves the viewer and enforces `required`, or returns the redirect to send.
pub async fn require_access(
    state: &AppState,
    req: &HttpRequest,
    required: Access,
) -> Result<Option<Viewer>, HttpResponse> {
    let viewer = current_viewer(state, req).await;
    let access = viewer.as_ref().map_or(Access::Anonymous, |v| v.access);

    match access.check(required) {
        Ok(()) => Ok(viewer),
        Err(denial) => Err(deny(req, denial)),
    }
}

pub async fn require_member(state: &AppState, req: &HttpRequest) -> Result<Viewer, HttpResponse> {
    match require_access(state, req, Access::Member).await? {
        Some(v) => Ok(v),
        None => Err(deny(req, Denial::SignInRequired { admin_area: false })),
    }
}

pub async fn require_admin(state: &AppState, req: &HttpRequest) -> Result<Viewer, HttpResponse> {
    match require_access(state, req, Access::Admin).await? {
        Some(v) => Ok(v),
        None => Err(deny(req, Denial::SignInRequired { admin_area: true })),
    }
}

fn deny(req: &HttpRequest, denial: Denial) -> HttpResponse {
    log::debug!("{} denied: {}", req.path(), denial.message());
    redirect(req, denial.redirect_target())
}

pub fn redirect(req: &HttpRequest, location: &str) -> HttpResponse {
    if is_htmx(req) {
        HttpResponse::Ok()
            .insert_header(("HX-Redirect", location.to_string()))
            .finish()
    } else {
        HttpResponse::SeeOther()
            .insert_header(("Location", location.to_string()))
            .finish()
    }
}

/// Redirects with `?error=<message>` appended, url-encoded.
pub fn redirect_with_error(req: &HttpRequest, location: &str, error: &str) -> HttpResponse {
    redirect(req, &with_query(location, "error", error))
}

pub fn redirect_with_notice(req: &HttpRequest, location: &str, notice: &str) -> HttpResponse {
    redirect(req, &with_query(location, "notice", notice))
}

pub fn with_query(location: &str, key: &str, value: &str) -> String {
    let sep = if location.contains('?') { '&' } else { '?' };
    format!("{location}{sep}{key}={}", urlencoding::encode(value))
}

pub fn session_cookie(token: Uuid, ttl_hours: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(actix_web::cookie::time::Duration::hours(ttl_hours))
        .finish()
}

pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();
    cookie
}

pub fn client_ip(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string()
}

pub fn render<T: Template>(t: T) -> HttpResponse {
    match t.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Template error: {}", e);
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body(format!("Template error: {e}"))
        }
    }
}

/// Checks that an upload is an image and copies it into `bucket`.
pub async fn store_image(
    storage: &Storage,
    bucket: Bucket,
    file: &TempFile,
) -> Result<StoredObject, StorageError> {
    ensure_image(file.content_type.as_ref().map(|m| m.essence_str()))?;
    storage
        .put_file(bucket, file.file_name.as_deref(), file.file.path())
        .await
}

pub fn describe_storage_error(err: &StorageError) -> String {
    match err {
        StorageError::TooLarge { .. } => "Image must be 10 MB or smaller".to_string(),
        StorageError::UnsupportedContentType(_) => "Only image files can be uploaded".to_string(),
        _ => "The file could not be saved. Please try again.".to_string(),
    }
}

/// Turns an `?error=` code into the message shown on the page. Unknown codes show nothing.
pub fn describe_error(code: Option<&str>) -> Option<String> {
    let message = match code? {
        "missing" => "Please fill in all required fields",
        "invalid" => "Invalid email or password",
        "signin" => "Please sign in to access this page",
        "admin" => "You need admin access to view this page",
        "not_admin" => "You do not have admin privileges",
        "rate_limit" => "Too many attempts. Please try again later.",
        "exists" => "An account with this email already exists",
        "member_exists" => "A member with this email already exists",
        "member_gone" => "That member no longer exists",
        "not_found" => "That item could not be found",
        "empty_weekly" => "Enter at least one amount",
        "empty_comment" => "Comment cannot be empty",
        "self_admin" => "You cannot change your own admin access",
        "db" => "Database error. Please try again.",
        "internal" => "An internal error occurred. Please try again.",
        other => {
            return FormError::from_code(other).map(|e| e.to_string()).or_else(|| {
                log::debug!("Ignoring unknown error code {:?}", other);
                None
            });
        }
    };
    Some(message.to_string())
}

pub fn describe_notice(code: Option<&str>) -> Option<String> {
    let message = match code? {
        "registered" => "Your account has been created. You can now sign in.",
        "signed_out" => "You have been signed out successfully",
        "saved" => "Saved successfully",
        "deleted" => "Deleted successfully",
        "member_added" => "Member added successfully",
        "member_updated" => "Member updated successfully",
        "contributions_saved" => "Weekly contributions saved",
        "contribution_added" => "Contribution added",
        "event_created" => "Event created successfully",
        "event_updated" => "Event updated successfully",
        "sermon_uploaded" => "Sermon uploaded successfully",
        "photo_uploaded" => "Photo uploaded successfully",
        _ => return None,
    };
    Some(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn query_is_appended_and_encoded() {
        assert_eq!(with_query("/login", "error", "invalid"), "/login?error=invalid");
        assert_eq!(
            with_query("/admin/events?category=service", "notice", "Event saved"),
            "/admin/events?category=service&notice=Event%20saved"
        );
    }

    #[test]
    fn session_token_needs_a_uuid() {
        let token = Uuid::new_v4();
        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, token.to_string()))
            .to_http_request();
        assert_eq!(session_token(&req), Some(token));

        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, "admin=true"))
            .to_http_request();
        assert_eq!(session_token(&req), None);

        let req = TestRequest::default().to_http_request();
        assert_eq!(session_token(&req), None);
    }

    #[test]
    fn htmx_redirects_use_header() {
        let req = TestRequest::default()
            .insert_header(("HX-Request", "true"))
            .to_http_request();
        let resp = redirect(&req, "/admin");
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        assert_eq!(resp.headers().get("HX-Redirect").unwrap(), "/admin");

        let req = TestRequest::default().to_http_request();
        let resp = redirect(&req, "/admin");
        assert_eq!(resp.status(), actix_web::http::StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get("Location").unwrap(), "/admin");
    }

    #[test]
    fn nav_reflects_access() {
        let viewer = Viewer {
            user_id: Uuid::new_v4(),
            email: "a@b.co".into(),
            name: "Ann".into(),
            access: Access::Admin,
        };
        let nav = Nav::for_viewer(Some(&viewer));
        assert!(nav.signed_in && nav.is_admin);
        assert_eq!(nav.name, "Ann");
        assert!(!Nav::for_viewer(None).signed_in);
    }

    #[test]
    fn removal_cookie_expires() {
        let c = removal_cookie(true);
        assert_eq!(c.value(), "");
        assert_eq!(c.max_age(), Some(actix_web::cookie::time::Duration::ZERO));
    }

    #[test]
    fn error_codes_have_messages() {
        assert_eq!(
            describe_error(Some("not_admin")).as_deref(),
            Some("You do not have admin privileges")
        );
        assert_eq!(
            describe_error(Some("bad_amount")).as_deref(),
            Some("Amounts must be numbers greater than zero")
        );
        assert_eq!(describe_error(None), None);
    }

    #[test]
    fn unknown_codes_are_not_echoed() {
        assert_eq!(describe_error(Some("Custom text")), None);
        assert_eq!(describe_error(Some("<b>Call 555-0100</b>")), None);
        assert_eq!(describe_notice(Some("Your account was suspended")), None);
        assert_eq!(
            describe_notice(Some("member_added")).as_deref(),
            Some("Member added successfully")
        );
    }
}
