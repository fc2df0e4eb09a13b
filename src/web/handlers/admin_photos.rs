use actix_multipart::form::MultipartForm;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use uuid::Uuid;

use youthhub::db;
use youthhub::models::PhotoCreate;
use youthhub::services::Bucket;

use crate::web::forms::{NoticeQuery, PhotoUploadForm, present_file};
use crate::web::helpers::{
    Nav, Viewer, describe_error, describe_notice, describe_storage_error, redirect,
    redirect_with_error, redirect_with_notice, render, require_admin, store_image,
};
use crate::web::state::AppState;
use crate::web::templates::{AdminPhotosTemplate, PhotoNewTemplate};

const PHOTO_BUCKET: Bucket = Bucket::GalleryImages;

fn render_new(viewer: &Viewer, error: &str) -> HttpResponse {
    render(PhotoNewTemplate {
        nav: Nav::for_viewer(Some(viewer)),
        error: Some(error.to_string()),
    })
}

#[get("/admin/photos")]
pub async fn photos_list(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<NoticeQuery>,
) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let photos = db::list_photos(&state.pool).await.unwrap_or_else(|e| {
        log::error!("Failed to load photos: {}", e);
        Vec::new()
    });

    render(AdminPhotosTemplate {
        nav: Nav::for_viewer(Some(&viewer)),
        photos,
        error: describe_error(query.error.as_deref()),
        notice: describe_notice(query.notice.as_deref()),
    })
}

#[get("/admin/photos/new")]
pub async fn photos_new(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    render(PhotoNewTemplate {
        nav: Nav::for_viewer(Some(&viewer)),
        error: None,
    })
}

#[post("/admin/photos/new")]
pub async fn photos_create(
    state: web::Data<AppState>,
    req: HttpRequest,
    MultipartForm(form): MultipartForm<PhotoUploadForm>,
) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let title = form.title.trim().to_string();
    if title.is_empty() {
        return render_new(&viewer, "Title is required");
    }

    let Some(file) = present_file(form.image) else {
        return render_new(&viewer, "Please choose an image to upload");
    };

    let object = match store_image(&state.storage, PHOTO_BUCKET, &file).await {
        Ok(o) => o,
        Err(e) => {
            log::warn!("Photo rejected: {}", e);
            return render_new(&viewer, &describe_storage_error(&e));
        }
    };

    let data = PhotoCreate {
        title,
        image_url: object.url,
    };

    match db::create_photo(&state.pool, &data).await {
        Ok(photo) => {
            log::info!("Photo {} uploaded by {}", photo.id, viewer.user_id);
            redirect_with_notice(&req, "/admin/photos", "photo_uploaded")
        }
        Err(e) => {
            log::error!("Failed to save photo: {}", e);
            if let Err(e) = state.storage.remove(PHOTO_BUCKET, &object.name).await {
                log::warn!("Failed to remove {}: {}", object.name, e);
            }
            render_new(&viewer, "Database error. Please try again.")
        }
    }
}

#[post("/admin/photos/{id}/delete")]
pub async fn photos_delete(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }
    let id = path.into_inner();

    match db::delete_photo(&state.pool, id).await {
        Ok(Some(photo)) => {
            if let Err(e) = state.storage.remove_by_url(PHOTO_BUCKET, &photo.image_url).await {
                log::warn!("Failed to remove photo object {}: {}", photo.image_url, e);
            }
            redirect_with_notice(&req, "/admin/photos", "deleted")
        }
        Ok(None) => redirect(&req, "/admin/photos"),
        Err(e) => {
            log::error!("Failed to delete photo {}: {}", id, e);
            redirect_with_error(&req, "/admin/photos", "db")
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(photos_list)
        .service(photos_new)
        .service(photos_create)
        .service(photos_delete);
}
