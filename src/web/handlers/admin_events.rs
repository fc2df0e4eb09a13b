use actix_web::{HttpRequest, Responder, get, post, web};
use uuid::Uuid;

use youthhub::db;

use crate::web::forms::{EventForm, NoticeQuery};
use crate::web::helpers::{
    Nav, describe_error, describe_notice, redirect, redirect_with_error, redirect_with_notice,
    render, require_admin,
};
use crate::web::state::AppState;
use crate::web::templates::{AdminEventsTemplate, EventFormTemplate, EventFormValues};

#[get("/admin/events")]
pub async fn events_list(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<NoticeQuery>,
) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let events = db::list_events(&state.pool).await.unwrap_or_else(|e| {
        log::error!("Failed to load events: {}", e);
        Vec::new()
    });

    render(AdminEventsTemplate {
        nav: Nav::for_viewer(Some(&viewer)),
        events,
        error: describe_error(query.error.as_deref()),
        notice: describe_notice(query.notice.as_deref()),
    })
}

#[get("/admin/events/new")]
pub async fn events_new(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    render(EventFormTemplate::new(
        Nav::for_viewer(Some(&viewer)),
        "Add event",
        "/admin/events/new".to_string(),
        EventFormValues::default(),
        None,
    ))
}

#[post("/admin/events/new")]
pub async fn events_create(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<EventForm>,
) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let data = match form.validate() {
        Ok(d) => d,
        Err(e) => {
            return render(EventFormTemplate::new(
                Nav::for_viewer(Some(&viewer)),
                "Add event",
                "/admin/events/new".to_string(),
                EventFormValues::from(&*form),
                Some(e.to_string()),
            ));
        }
    };

    match db::create_event(&state.pool, &data).await {
        Ok(event) => {
            log::info!("Event {} created by {}", event.id, viewer.user_id);
            redirect_with_notice(&req, "/admin/events", "event_created")
        }
        Err(e) => {
            log::error!("Failed to create event: {}", e);
            redirect_with_error(&req, "/admin/events", "db")
        }
    }
}

#[get("/admin/events/{id}/edit")]
pub async fn events_edit(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let id = path.into_inner();

    match db::get_event(&state.pool, id).await {
        Ok(Some(event)) => render(EventFormTemplate::new(
            Nav::for_viewer(Some(&viewer)),
            "Edit event",
            format!("/admin/events/{id}/edit"),
            EventFormValues::from(&event),
            None,
        )),
        Ok(None) => redirect_with_error(&req, "/admin/events", "not_found"),
        Err(e) => {
            log::error!("Failed to load event {}: {}", id, e);
            redirect_with_error(&req, "/admin/events", "db")
        }
    }
}

#[post("/admin/events/{id}/edit")]
pub async fn events_update(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    form: web::Form<EventForm>,
) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let id = path.into_inner();

    let data = match form.validate() {
        Ok(d) => d,
        Err(e) => {
            return render(EventFormTemplate::new(
                Nav::for_viewer(Some(&viewer)),
                "Edit event",
                format!("/admin/events/{id}/edit"),
                EventFormValues::from(&*form),
                Some(e.to_string()),
            ));
        }
    };

    match db::update_event(&state.pool, id, &data).await {
        Ok(Some(_)) => redirect_with_notice(&req, "/admin/events", "event_updated"),
        Ok(None) => redirect_with_error(&req, "/admin/events", "not_found"),
        Err(e) => {
            log::error!("Failed to update event {}: {}", id, e);
            redirect_with_error(&req, "/admin/events", "db")
        }
    }
}

#[post("/admin/events/{id}/delete")]
pub async fn events_delete(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }
    let id = path.into_inner();

    match db::delete_event(&state.pool, id).await {
        Ok(true) => redirect_with_notice(&req, "/admin/events", "deleted"),
        Ok(false) => redirect(&req, "/admin/events"),
        Err(e) => {
            log::error!("Failed to delete event {}: {}", id, e);
            redirect_with_error(&req, "/admin/events", "db")
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(events_list)
        .service(events_new)
        .service(events_create)
        .service(events_edit)
        .service(events_update)
        .service(events_delete);
}
