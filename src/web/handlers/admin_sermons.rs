use actix_multipart::form::MultipartForm;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use uuid::Uuid;

use youthhub::db;
use youthhub::models::SermonCreate;
use youthhub::services::Bucket;

use crate::web::forms::{
    NoticeQuery, SermonEditForm, SermonUploadForm, present_file, validate_sermon_fields,
};
use crate::web::helpers::{
    Nav, Viewer, describe_error, describe_notice, describe_storage_error, redirect,
    redirect_with_error, redirect_with_notice, render, require_admin, store_image,
};
use crate::web::state::AppState;
use crate::web::templates::{AdminSermonsTemplate, SermonEditTemplate, SermonNewTemplate};

fn render_new(viewer: &Viewer, error: String) -> HttpResponse {
    render(SermonNewTemplate {
        nav: Nav::for_viewer(Some(viewer)),
        error: Some(error),
    })
}

#[get("/admin/sermons")]
pub async fn sermons_list(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<NoticeQuery>,
) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let sermons = db::list_sermons(&state.pool, None).await.unwrap_or_else(|e| {
        log::error!("Failed to load sermons: {}", e);
        Vec::new()
    });

    render(AdminSermonsTemplate {
        nav: Nav::for_viewer(Some(&viewer)),
        sermons,
        error: describe_error(query.error.as_deref()),
        notice: describe_notice(query.notice.as_deref()),
    })
}

#[get("/admin/sermons/new")]
pub async fn sermons_new(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    render(SermonNewTemplate {
        nav: Nav::for_viewer(Some(&viewer)),
        error: None,
    })
}

#[post("/admin/sermons/new")]
pub async fn sermons_create(
    state: web::Data<AppState>,
    req: HttpRequest,
    MultipartForm(form): MultipartForm<SermonUploadForm>,
) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let (title, description, date) =
        match validate_sermon_fields(&form.title, &form.description, &form.date) {
            Ok(fields) => fields,
            Err(e) => return render_new(&viewer, e.to_string()),
        };

    let image_url = match present_file(form.image) {
        Some(file) => match store_image(&state.storage, Bucket::Sermons, &file).await {
            Ok(object) => Some(object.url),
            Err(e) => {
                log::warn!("Sermon image rejected: {}", e);
                return render_new(&viewer, describe_storage_error(&e));
            }
        },
        None => None,
    };

    let data = SermonCreate {
        title,
        description,
        date,
        image_url,
    };

    match db::create_sermon(&state.pool, &data).await {
        Ok(sermon) => {
            log::info!("Sermon {} created by {}", sermon.id, viewer.user_id);
            redirect_with_notice(&req, "/admin/sermons", "sermon_uploaded")
        }
        Err(e) => {
            log::error!("Failed to create sermon: {}", e);
            // Do not leave an orphaned image behind.
            if let Some(url) = &data.image_url {
                if let Err(e) = state.storage.remove_by_url(Bucket::Sermons, url).await {
                    log::warn!("Failed to remove {}: {}", url, e);
                }
            }
            render_new(&viewer, "Database error. Please try again.".to_string())
        }
    }
}

#[get("/admin/sermons/{id}/edit")]
pub async fn sermons_edit(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let id = path.into_inner();

    match db::get_sermon(&state.pool, id).await {
        Ok(Some(sermon)) => render(SermonEditTemplate {
            nav: Nav::for_viewer(Some(&viewer)),
            sermon,
            error: None,
        }),
        Ok(None) => redirect_with_error(&req, "/admin/sermons", "not_found"),
        Err(e) => {
            log::error!("Failed to load sermon {}: {}", id, e);
            redirect_with_error(&req, "/admin/sermons", "db")
        }
    }
}

#[post("/admin/sermons/{id}/edit")]
pub async fn sermons_update(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    form: web::Form<SermonEditForm>,
) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let id = path.into_inner();

    let update = match form.validate() {
        Ok(u) => u,
        Err(e) => {
            return match db::get_sermon(&state.pool, id).await {
                Ok(Some(sermon)) => render(SermonEditTemplate {
                    nav: Nav::for_viewer(Some(&viewer)),
                    sermon,
                    error: Some(e.to_string()),
                }),
                _ => redirect_with_error(&req, "/admin/sermons", e.code()),
            };
        }
    };

    match db::update_sermon(&state.pool, id, &update).await {
        Ok(Some(_)) => redirect_with_notice(&req, "/admin/sermons", "saved"),
        Ok(None) => redirect_with_error(&req, "/admin/sermons", "not_found"),
        Err(e) => {
            log::error!("Failed to update sermon {}: {}", id, e);
            redirect_with_error(&req, "/admin/sermons", "db")
        }
    }
}

#[post("/admin/sermons/{id}/delete")]
pub async fn sermons_delete(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }
    let id = path.into_inner();

    match db::delete_sermon(&state.pool, id).await {
        Ok(Some(sermon)) => {
            if let Some(url) = &sermon.image_url {
                if let Err(e) = state.storage.remove_by_url(Bucket::Sermons, url).await {
                    log::warn!("Failed to remove sermon image {}: {}", url, e);
                }
            }
            redirect_with_notice(&req, "/admin/sermons", "deleted")
        }
        Ok(None) => redirect(&req, "/admin/sermons"),
        Err(e) => {
            log::error!("Failed to delete sermon {}: {}", id, e);
            redirect_with_error(&req, "/admin/sermons", "db")
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(sermons_list)
        .service(sermons_new)
        .service(sermons_create)
        .service(sermons_edit)
        .service(sermons_update)
        .service(sermons_delete);
}
