use actix_web::{HttpRequest, Responder, get, post, web};
use serde::Deserialize;
use uuid::Uuid;

use youthhub::db;

use crate::web::forms::NoticeQuery;
use crate::web::helpers::{
    Nav, describe_error, describe_notice, redirect_with_error, redirect_with_notice, render,
    require_admin,
};
use crate::web::state::AppState;
use crate::web::templates::AdminProfilesTemplate;

#[derive(Deserialize)]
pub struct AdminFlagForm {
    pub is_admin: bool,
}

#[get("/admin/profiles")]
pub async fn profiles_list(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<NoticeQuery>,
) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let profiles = db::list_profiles(&state.pool).await.unwrap_or_else(|e| {
        log::error!("Failed to load profiles: {}", e);
        Vec::new()
    });

    render(AdminProfilesTemplate {
        nav: Nav::for_viewer(Some(&viewer)),
        profiles,
        current_user_id: viewer.user_id,
        error: describe_error(query.error.as_deref()),
        notice: describe_notice(query.notice.as_deref()),
    })
}

#[post("/admin/profiles/{id}/admin")]
pub async fn profiles_set_admin(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    form: web::Form<AdminFlagForm>,
) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let id = path.into_inner();

    if id == viewer.user_id {
        return redirect_with_error(&req, "/admin/profiles", "self_admin");
    }

    match db::set_profile_admin(&state.pool, id, form.is_admin).await {
        Ok(Some(profile)) => {
            log::info!(
                "{} set is_admin={} on {}",
                viewer.user_id,
                profile.is_admin,
                profile.id
            );
            redirect_with_notice(&req, "/admin/profiles", "saved")
        }
        Ok(None) => redirect_with_error(&req, "/admin/profiles", "not_found"),
        Err(e) => {
            log::error!("Failed to update profile {}: {}", id, e);
            redirect_with_error(&req, "/admin/profiles", "db")
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(profiles_list).service(profiles_set_admin);
}
