use actix_web::{HttpRequest, Responder, get, post, web};
use uuid::Uuid;

use youthhub::db;
use youthhub::models::{FORUM_TITLE_MAX, ForumCommentCreate, ForumPostCreate};

use crate::web::forms::{ForumCommentForm, ForumPostForm, NoticeQuery};
use crate::web::helpers::{
    Nav, current_viewer, describe_error, redirect, redirect_with_error, render, require_member,
};
use crate::web::state::AppState;
use crate::web::templates::{ForumPostTemplate, ForumTemplate};

use super::public::not_found;

#[get("/forum")]
pub async fn forum_index(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<NoticeQuery>,
) -> impl Responder {
    let viewer = current_viewer(&state, &req).await;
    let posts = db::list_posts(&state.pool, None).await.unwrap_or_else(|e| {
        log::error!("Failed to load forum posts: {}", e);
        Vec::new()
    });

    render(ForumTemplate {
        nav: Nav::for_viewer(viewer.as_ref()),
        posts,
        error: describe_error(query.error.as_deref()),
        title_max: FORUM_TITLE_MAX,
    })
}

#[post("/forum")]
pub async fn forum_create(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<ForumPostForm>,
) -> impl Responder {
    let viewer = match require_member(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let (title, content) = match form.validate() {
        Ok(fields) => fields,
        Err(e) => return redirect_with_error(&req, "/forum", e.code()),
    };

    let data = ForumPostCreate {
        author_id: viewer.user_id,
        author_name: viewer.name,
        title,
        content,
    };

    match db::create_post(&state.pool, &data).await {
        Ok(post) => redirect(&req, &format!("/forum/{}", post.id)),
        Err(e) => {
            log::error!("Failed to create forum post: {}", e);
            redirect_with_error(&req, "/forum", "db")
        }
    }
}

#[get("/forum/{id}")]
pub async fn forum_post(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    query: web::Query<NoticeQuery>,
) -> impl Responder {
    let id = path.into_inner();
    let viewer = current_viewer(&state, &req).await;

    let post = match db::get_post(&state.pool, id).await {
        Ok(Some(p)) => p,
        Ok(None) => return not_found(state, req).await,
        Err(e) => {
            log::error!("Failed to load forum post {}: {}", id, e);
            return redirect_with_error(&req, "/forum", "db");
        }
    };

    let comments = db::list_comments(&state.pool, id).await.unwrap_or_default();
    let can_delete = viewer
        .as_ref()
        .is_some_and(|v| v.access.is_admin() || v.user_id == post.author_id);

    render(ForumPostTemplate {
        nav: Nav::for_viewer(viewer.as_ref()),
        post,
        comments,
        can_delete,
        error: describe_error(query.error.as_deref()),
    })
}

#[post("/forum/{id}/comments")]
pub async fn forum_comment(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    form: web::Form<ForumCommentForm>,
) -> impl Responder {
    let viewer = match require_member(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let id = path.into_inner();
    let location = format!("/forum/{id}");

    let content = form.content.trim();
    if content.is_empty() {
        return redirect_with_error(&req, &location, "empty_comment");
    }

    let data = ForumCommentCreate {
        post_id: id,
        author_id: viewer.user_id,
        author_name: viewer.name,
        content: content.to_string(),
    };

    match db::add_comment(&state.pool, &data).await {
        Ok(_) => redirect(&req, &location),
        Err(e) => {
            log::error!("Failed to add comment to {}: {}", id, e);
            redirect_with_error(&req, &location, "db")
        }
    }
}

#[post("/forum/{id}/like")]
pub async fn forum_like(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    let viewer = match require_member(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let id = path.into_inner();
    let location = format!("/forum/{id}");

    match db::like_post(&state.pool, id, viewer.user_id).await {
        Ok(true) => redirect(&req, &location),
        Ok(false) => {
            log::debug!("User {} already liked {}", viewer.user_id, id);
            redirect(&req, &location)
        }
        Err(e) => {
            log::error!("Failed to like {}: {}", id, e);
            redirect_with_error(&req, &location, "db")
        }
    }
}

#[post("/forum/{id}/delete")]
pub async fn forum_delete(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    let viewer = match require_member(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let id = path.into_inner();

    let post = match db::get_post(&state.pool, id).await {
        Ok(Some(p)) => p,
        Ok(None) => return redirect(&req, "/forum"),
        Err(e) => {
            log::error!("Failed to load forum post {}: {}", id, e);
            return redirect_with_error(&req, "/forum", "db");
        }
    };

    if !viewer.access.is_admin() && viewer.user_id != post.author_id {
        log::warn!("User {} tried to delete post {}", viewer.user_id, id);
        return redirect_with_error(&req, &format!("/forum/{id}"), "not_admin");
    }

    match db::delete_post(&state.pool, id).await {
        Ok(_) => redirect(&req, "/forum"),
        Err(e) => {
            log::error!("Failed to delete post {}: {}", id, e);
            redirect_with_error(&req, "/forum", "db")
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(forum_index)
        .service(forum_create)
        .service(forum_post)
        .service(forum_comment)
        .service(forum_like)
        .service(forum_delete);
}
