use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use chrono::Utc;
use uuid::Uuid;

use youthhub::common::{ContributionError, MemberError, format_currency};
use youthhub::db;
use youthhub::services::calendar::week_label;
use youthhub::services::reports;

use crate::web::forms::{
    ContributionsFilterQuery, FormError, MemberForm, NoticeQuery, SingleContributionForm,
    parse_weekly_amounts,
};
use crate::web::helpers::{
    Nav, describe_error, describe_notice, redirect, redirect_with_error, redirect_with_notice,
    render, require_admin,
};
use crate::web::state::AppState;
use crate::web::templates::{
    AdminContributionsTemplate, AdminMembersTemplate, MemberEditTemplate, ReportTemplate,
    SelectOption,
};

fn contribution_error_code(err: &ContributionError) -> &'static str {
    match err {
        ContributionError::MemberNotFound(_) => "member_gone",
        ContributionError::InvalidAmount(_) => FormError::Amount.code(),
        ContributionError::InvalidRequest(msg) => {
            log::warn!("Contribution request rejected: {}", msg);
            "missing"
        }
        ContributionError::Database(e) => {
            log::error!("Contribution database error: {}", e);
            "db"
        }
    }
}

fn member_error_code(err: &MemberError) -> &'static str {
    match err {
        MemberError::AlreadyExists(_) => "member_exists",
        MemberError::NotFound(_) => "not_found",
        MemberError::InvalidRequest(msg) => {
            log::warn!("Member request rejected: {}", msg);
            "missing"
        }
        MemberError::Database(e) => {
            log::error!("Member database error: {}", e);
            "db"
        }
        MemberError::Internal => "internal",
    }
}

// -------------------------------------------------------------- members

#[get("/admin/members")]
pub async fn members_list(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<NoticeQuery>,
) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let members = db::list_members_with_totals(&state.pool)
        .await
        .unwrap_or_else(|e| {
            log::error!("Failed to load members: {}", e);
            Vec::new()
        });
    let total: i64 = members.iter().map(|m| m.total_cents).sum();

    render(AdminMembersTemplate {
        nav: Nav::for_viewer(Some(&viewer)),
        members,
        week: week_label(Utc::now().date_naive()),
        total_label: format_currency(total),
        error: describe_error(query.error.as_deref()),
        notice: describe_notice(query.notice.as_deref()),
    })
}

#[post("/admin/members")]
pub async fn members_create(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<MemberForm>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }

    let data = match form.validate() {
        Ok(d) => d,
        Err(e) => return redirect_with_error(&req, "/admin/members", e.code()),
    };

    match state.db().add_member(&data).await {
        Ok(member) => {
            log::info!("Member {} added", member.id);
            redirect_with_notice(&req, "/admin/members", "member_added")
        }
        Err(e) => redirect_with_error(&req, "/admin/members", member_error_code(&e)),
    }
}

#[get("/admin/members/{id}/edit")]
pub async fn members_edit(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    query: web::Query<NoticeQuery>,
) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let id = path.into_inner();

    match db::get_member(&state.pool, id).await {
        Ok(Some(member)) => render(MemberEditTemplate {
            nav: Nav::for_viewer(Some(&viewer)),
            member,
            error: describe_error(query.error.as_deref()),
        }),
        Ok(None) => redirect_with_error(&req, "/admin/members", "not_found"),
        Err(e) => {
            log::error!("Failed to load member {}: {}", id, e);
            redirect_with_error(&req, "/admin/members", "db")
        }
    }
}

#[post("/admin/members/{id}/edit")]
pub async fn members_update(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    form: web::Form<MemberForm>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }
    let id = path.into_inner();
    let edit_location = format!("/admin/members/{id}/edit");

    let update = match form.to_update(id) {
        Ok(u) => u,
        Err(e) => return redirect_with_error(&req, &edit_location, e.code()),
    };

    match state.db().update_member(&update).await {
        Ok(_) => redirect_with_notice(&req, "/admin/members", "member_updated"),
        Err(MemberError::NotFound(_)) => redirect_with_error(&req, "/admin/members", "not_found"),
        Err(e) => redirect_with_error(&req, &edit_location, member_error_code(&e)),
    }
}

#[post("/admin/members/{id}/delete")]
pub async fn members_delete(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }
    let id = path.into_inner();

    match db::delete_member(&state.pool, id).await {
        Ok(true) => {
            log::info!("Member {} deleted with their contributions", id);
            redirect_with_notice(&req, "/admin/members", "deleted")
        }
        Ok(false) => redirect(&req, "/admin/members"),
        Err(e) => {
            log::error!("Failed to delete member {}: {}", id, e);
            redirect_with_error(&req, "/admin/members", "db")
        }
    }
}

// -------------------------------------------------------- contributions

#[post("/admin/contributions/weekly")]
pub async fn contributions_weekly(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let entries = match parse_weekly_amounts(&form, Utc::now()) {
        Ok(e) => e,
        Err(e) => return redirect_with_error(&req, "/admin/members", e.code()),
    };

    if entries.is_empty() {
        return redirect_with_error(&req, "/admin/members", "empty_weekly");
    }

    match state.db().record_contributions(&entries).await {
        Ok(saved) => {
            log::info!(
                "{} weekly contributions recorded by {}",
                saved.len(),
                viewer.user_id
            );
            redirect_with_notice(&req, "/admin/members", "contributions_saved")
        }
        Err(e) => redirect_with_error(&req, "/admin/members", contribution_error_code(&e)),
    }
}

#[post("/admin/contributions")]
pub async fn contributions_create(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<SingleContributionForm>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }

    let data = match form.validate(Utc::now()) {
        Ok(d) => d,
        Err(e) => return redirect_with_error(&req, "/admin/contributions", e.code()),
    };

    match state.db().add_contribution(&data).await {
        Ok(_) => redirect_with_notice(&req, "/admin/contributions", "contribution_added"),
        Err(e) => redirect_with_error(&req, "/admin/contributions", contribution_error_code(&e)),
    }
}

#[get("/admin/contributions")]
pub async fn contributions_list(
    state: web::Data<AppState>,
    req: HttpRequest,
    filter: web::Query<ContributionsFilterQuery>,
) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let members = db::list_members_with_totals(&state.pool)
        .await
        .unwrap_or_default();

    let (rows, error) = match filter.to_query() {
        // One extra row tells whether a next page exists.
        Ok(query) if query.is_empty() => {
            let limit = query.limit.unwrap_or(ContributionsFilterQuery::PAGE_SIZE);
            let offset = query.offset.unwrap_or(0);
            let rows = db::recent_contribution_rows(&state.pool, limit + 1, offset)
                .await
                .map_err(|e| {
                    log::error!("Failed to load contributions: {}", e);
                    "db"
                });
            match rows {
                Ok(r) => (r, None),
                Err(code) => (Vec::new(), describe_error(Some(code))),
            }
        }
        Ok(mut query) => {
            query.limit = query.limit.map(|l| l + 1);
            match state.db().get_contributions(&query).await {
                Ok(r) => (r, None),
                Err(e) => (Vec::new(), describe_error(Some(contribution_error_code(&e)))),
            }
        }
        Err(e) => (Vec::new(), Some(e.to_string())),
    };

    let page = filter.page();
    let mut rows = rows;
    let has_next = rows.len() as i64 > ContributionsFilterQuery::PAGE_SIZE;
    rows.truncate(ContributionsFilterQuery::PAGE_SIZE as usize);

    let field = |v: &Option<String>| v.clone().unwrap_or_default();
    let mut filter_query = String::new();
    for (key, value) in [
        ("member_id", &filter.member_id),
        ("week", &filter.week),
        ("from", &filter.from),
        ("min_amount", &filter.min_amount),
        ("sort", &filter.sort),
    ] {
        if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
            filter_query.push_str(&format!("{}={}&", key, urlencoding::encode(v)));
        }
    }

    render(AdminContributionsTemplate {
        nav: Nav::for_viewer(Some(&viewer)),
        rows,
        members: SelectOption::members(&members, filter.member_id.as_deref()),
        week: field(&filter.week),
        from: field(&filter.from),
        min_amount: field(&filter.min_amount),
        filter_query,
        page,
        prev_page: (page > 1).then(|| page - 1),
        next_page: if has_next { page.checked_add(1) } else { None },
        error: error.or_else(|| describe_error(filter.error.as_deref())),
        notice: describe_notice(filter.notice.as_deref()),
    })
}

#[get("/admin/contributions/report")]
pub async fn contributions_report(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let viewer = match require_admin(&state, &req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let rows = match db::list_contribution_rows(&state.pool).await {
        Ok(r) => r,
        Err(e) => {
            log::error!("Failed to load contributions for report: {}", e);
            return redirect_with_error(&req, "/admin/contributions", "db");
        }
    };

    let totals = reports::monthly_totals(&rows);
    let grand_total = format_currency(reports::grand_total(&totals));

    render(ReportTemplate {
        nav: Nav::for_viewer(Some(&viewer)),
        totals,
        grand_total,
    })
}

#[get("/admin/contributions/export.csv")]
pub async fn contributions_export(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }

    let rows = match db::list_contribution_rows(&state.pool).await {
        Ok(r) => r,
        Err(e) => {
            log::error!("Failed to load contributions for export: {}", e);
            return redirect_with_error(&req, "/admin/contributions", "db");
        }
    };

    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename("contributions.csv".to_string())],
        })
        .body(reports::contributions_csv(&rows))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(members_list)
        .service(members_create)
        .service(members_edit)
        .service(members_update)
        .service(members_delete)
        .service(contributions_weekly)
        .service(contributions_create)
        .service(contributions_report)
        .service(contributions_export)
        .service(contributions_list);
}
