use actix_web::{HttpRequest, Responder, get, web};

use youthhub::db;

use crate::web::helpers::{Nav, render, require_member};
use crate::web::state::AppState;
use crate::web::templates::{GalleryTemplate, SermonsTemplate};

#[get("/sermons")]
pub async fn sermons(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let viewer = match require_member(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let sermons = db::list_sermons(&state.pool, None).await.unwrap_or_else(|e| {
        log::error!("Failed to load sermons: {}", e);
        Vec::new()
    });

    render(SermonsTemplate {
        nav: Nav::for_viewer(Some(&viewer)),
        sermons,
    })
}

#[get("/gallery")]
pub async fn gallery(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let viewer = match require_member(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let photos = db::list_photos(&state.pool).await.unwrap_or_else(|e| {
        log::error!("Failed to load photos: {}", e);
        Vec::new()
    });

    render(GalleryTemplate {
        nav: Nav::for_viewer(Some(&viewer)),
        photos,
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(sermons).service(gallery);
}
