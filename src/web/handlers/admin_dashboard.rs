use actix_web::{HttpRequest, Responder, get, web};

use youthhub::common::format_currency;
use youthhub::db;
use youthhub::models::SiteCounts;

use crate::web::helpers::{Nav, render, require_admin};
use crate::web::state::AppState;
use crate::web::templates::DashboardTemplate;

const RECENT_CONTRIBUTIONS: i64 = 10;

#[get("/admin")]
pub async fn dashboard(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let counts = db::site_counts(&state.pool).await.unwrap_or_else(|e| {
        log::error!("Failed to count site content: {}", e);
        SiteCounts::default()
    });
    let recent = db::recent_contribution_rows(&state.pool, RECENT_CONTRIBUTIONS, 0)
        .await
        .unwrap_or_else(|e| {
            log::error!("Failed to load recent contributions: {}", e);
            Vec::new()
        });

    render(DashboardTemplate {
        nav: Nav::for_viewer(Some(&viewer)),
        sermon_count: counts.sermons,
        photo_count: counts.photos,
        event_count: counts.events,
        member_count: counts.members,
        total_label: format_currency(counts.total_cents),
        recent,
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard);
}
