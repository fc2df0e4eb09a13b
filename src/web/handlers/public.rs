use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use chrono::Utc;

use youthhub::db;
use youthhub::models::EventFilter;

use crate::web::forms::{EventsQuery, NoticeQuery};
use crate::web::helpers::{Nav, current_viewer, describe_error, render};
use crate::web::state::AppState;
use crate::web::templates::{CategoryTab, EventsTemplate, HomeTemplate, NotFoundTemplate};

const HOME_LIMIT: i64 = 3;

#[get("/")]
pub async fn home(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<NoticeQuery>,
) -> impl Responder {
    let viewer = current_viewer(&state, &req).await;
    let today = Utc::now().date_naive();

    let upcoming = db::upcoming_events(&state.pool, today, HOME_LIMIT)
        .await
        .unwrap_or_else(|e| {
            log::error!("Failed to load upcoming events: {}", e);
            Vec::new()
        });
    let sermons = db::list_sermons(&state.pool, Some(HOME_LIMIT))
        .await
        .unwrap_or_default();
    let posts = db::list_posts(&state.pool, Some(HOME_LIMIT))
        .await
        .unwrap_or_default();

    render(HomeTemplate {
        nav: Nav::for_viewer(viewer.as_ref()),
        events: upcoming,
        sermons,
        posts,
        error: describe_error(query.error.as_deref()),
    })
}

#[get("/events")]
pub async fn events(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<EventsQuery>,
) -> impl Responder {
    let viewer = current_viewer(&state, &req).await;
    let filter = EventFilter::parse(query.category.as_deref());

    let events = db::list_events(&state.pool)
        .await
        .unwrap_or_else(|e| {
            log::error!("Failed to load events: {}", e);
            Vec::new()
        })
        .into_iter()
        .filter(|e| filter.matches(e.event_type))
        .collect();

    let heading = match filter {
        EventFilter::All => "All Events",
        EventFilter::Only(t) => t.plural_label(),
    };

    render(EventsTemplate {
        nav: Nav::for_viewer(viewer.as_ref()),
        tabs: CategoryTab::all(filter),
        heading: heading.to_string(),
        events,
    })
}

pub async fn not_found(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let viewer = current_viewer(&state, &req).await;
    let mut resp = render(NotFoundTemplate {
        nav: Nav::for_viewer(viewer.as_ref()),
    });
    *resp.status_mut() = actix_web::http::StatusCode::NOT_FOUND;
    resp
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home).service(events);
}
