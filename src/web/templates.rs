use askama::Template;
use uuid::Uuid;

use youthhub::models::{
    ContributionRow, Event, EventFilter, EventType, ForumComment, ForumPost, Member,
    MemberWithTotal, MonthlyTotal, Photo, Profile, Sermon,
};

use crate::web::forms::{DEFAULT_END_TIME, DEFAULT_START_TIME, EventForm};
use crate::web::helpers::Nav;

/// One `<option>` of a select box.
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn event_types(selected: &str) -> Vec<Self> {
        EventType::ALL
            .iter()
            .map(|t| Self {
                value: t.as_str().to_string(),
                label: t.label().to_string(),
                selected: t.as_str() == selected,
            })
            .collect()
    }

    pub fn members(members: &[MemberWithTotal], selected: Option<&str>) -> Vec<Self> {
        members
            .iter()
            .map(|m| {
                let value = m.id.to_string();
                Self {
                    selected: selected == Some(value.as_str()),
                    value,
                    label: m.name.clone(),
                }
            })
            .collect()
    }
}

/// Category tab on the events page.
pub struct CategoryTab {
    pub key: &'static str,
    pub label: &'static str,
    pub active: bool,
}

impl CategoryTab {
    pub fn all(active: EventFilter) -> Vec<Self> {
        std::iter::once(EventFilter::All)
            .chain(EventType::ALL.into_iter().map(EventFilter::Only))
            .map(|filter| Self {
                key: filter.as_str(),
                label: match filter {
                    EventFilter::All => "All Events",
                    EventFilter::Only(t) => t.plural_label(),
                },
                active: filter == active,
            })
            .collect()
    }
}

// ---------------------------------------------------------------- public

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: Nav,
    pub events: Vec<Event>,
    pub sermons: Vec<Sermon>,
    pub posts: Vec<ForumPost>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "events.html")]
pub struct EventsTemplate {
    pub nav: Nav,
    pub tabs: Vec<CategoryTab>,
    pub heading: String,
    pub events: Vec<Event>,
}

#[derive(Template)]
#[template(path = "forum.html")]
pub struct ForumTemplate {
    pub nav: Nav,
    pub posts: Vec<ForumPost>,
    pub error: Option<String>,
    pub title_max: usize,
}

#[derive(Template)]
#[template(path = "forum_post.html")]
pub struct ForumPostTemplate {
    pub nav: Nav,
    pub post: ForumPost,
    pub comments: Vec<ForumComment>,
    pub can_delete: bool,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "sermons.html")]
pub struct SermonsTemplate {
    pub nav: Nav,
    pub sermons: Vec<Sermon>,
}

#[derive(Template)]
#[template(path = "gallery.html")]
pub struct GalleryTemplate {
    pub nav: Nav,
    pub photos: Vec<Photo>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub nav: Nav,
}

// ----------------------------------------------------------------- admin

#[derive(Template)]
#[template(path = "admin/login.html")]
pub struct AdminLoginTemplate {
    pub nav: Nav,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub nav: Nav,
    pub sermon_count: i64,
    pub photo_count: i64,
    pub event_count: i64,
    pub member_count: i64,
    pub total_label: String,
    pub recent: Vec<ContributionRow>,
}

#[derive(Template)]
#[template(path = "admin/sermons.html")]
pub struct AdminSermonsTemplate {
    pub nav: Nav,
    pub sermons: Vec<Sermon>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/sermon_new.html")]
pub struct SermonNewTemplate {
    pub nav: Nav,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/sermon_edit.html")]
pub struct SermonEditTemplate {
    pub nav: Nav,
    pub sermon: Sermon,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/photos.html")]
pub struct AdminPhotosTemplate {
    pub nav: Nav,
    pub photos: Vec<Photo>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/photo_new.html")]
pub struct PhotoNewTemplate {
    pub nav: Nav,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/events.html")]
pub struct AdminEventsTemplate {
    pub nav: Nav,
    pub events: Vec<Event>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

/// Values shown in the event form, either blank defaults, an existing event
/// or a rejected submission.
pub struct EventFormValues {
    pub title: String,
    pub description: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub event_type: String,
}

impl Default for EventFormValues {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            date: String::new(),
            start_time: DEFAULT_START_TIME.to_string(),
            end_time: DEFAULT_END_TIME.to_string(),
            location: String::new(),
            event_type: EventType::default().as_str().to_string(),
        }
    }
}

impl From<&Event> for EventFormValues {
    fn from(e: &Event) -> Self {
        Self {
            title: e.title.clone(),
            description: e.description.clone(),
            date: e.date_input(),
            start_time: e.start_input(),
            end_time: e.end_input(),
            location: e.location.clone(),
            event_type: e.event_type.as_str().to_string(),
        }
    }
}

impl From<&EventForm> for EventFormValues {
    fn from(f: &EventForm) -> Self {
        Self {
            title: f.title.clone(),
            description: f.description.clone(),
            date: f.date.clone(),
            start_time: f.start_time.clone(),
            end_time: f.end_time.clone(),
            location: f.location.clone(),
            event_type: f.event_type.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/event_form.html")]
pub struct EventFormTemplate {
    pub nav: Nav,
    pub heading: String,
    pub action: String,
    pub values: EventFormValues,
    pub types: Vec<SelectOption>,
    pub error: Option<String>,
}

impl EventFormTemplate {
    pub fn new(
        nav: Nav,
        heading: &str,
        action: String,
        values: EventFormValues,
        error: Option<String>,
    ) -> Self {
        Self {
            nav,
            heading: heading.to_string(),
            action,
            types: SelectOption::event_types(&values.event_type),
            values,
            error,
        }
    }
}

#[derive(Template)]
#[template(path = "admin/members.html")]
pub struct AdminMembersTemplate {
    pub nav: Nav,
    pub members: Vec<MemberWithTotal>,
    pub week: String,
    pub total_label: String,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/member_edit.html")]
pub struct MemberEditTemplate {
    pub nav: Nav,
    pub member: Member,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/contributions.html")]
pub struct AdminContributionsTemplate {
    pub nav: Nav,
    pub rows: Vec<ContributionRow>,
    pub members: Vec<SelectOption>,
    pub week: String,
    pub from: String,
    pub min_amount: String,
    /// Current filters as `key=value&` pairs, for the pager links.
    pub filter_query: String,
    pub page: i64,
    pub prev_page: Option<i64>,
    pub next_page: Option<i64>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/report.html")]
pub struct ReportTemplate {
    pub nav: Nav,
    pub totals: Vec<MonthlyTotal>,
    pub grand_total: String,
}

#[derive(Template)]
#[template(path = "admin/profiles.html")]
pub struct AdminProfilesTemplate {
    pub nav: Nav,
    pub profiles: Vec<Profile>,
    pub current_user_id: Uuid,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_mark_the_active_category() {
        let tabs = CategoryTab::all(EventFilter::Only(EventType::Service));
        assert_eq!(tabs.len(), EventType::ALL.len() + 1);
        assert_eq!(tabs[0].key, "all");
        let active: Vec<_> = tabs.iter().filter(|t| t.active).map(|t| t.key).collect();
        assert_eq!(active, vec!["service"]);
    }

    #[test]
    fn blank_event_form_uses_default_times() {
        let values = EventFormValues::default();
        assert_eq!(values.start_time, "18:00");
        assert_eq!(values.end_time, "20:00");

        let options = SelectOption::event_types(&values.event_type);
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
    }

    #[test]
    fn login_page_renders_messages() {
        let html = LoginTemplate {
            nav: Nav::default(),
            error: Some("Invalid email or password".into()),
            notice: None,
        }
        .render()
        .unwrap();
        assert!(html.contains("Invalid email or password"));
        assert!(html.contains("action=\"/login\""));
    }

    fn members_page(members: Vec<MemberWithTotal>) -> String {
        AdminMembersTemplate {
            nav: Nav::default(),
            members,
            week: "2025-W3".into(),
            total_label: "$35.00".into(),
            error: None,
            notice: None,
        }
        .render()
        .unwrap()
    }

    #[test]
    fn weekly_form_defaults_to_save() {
        let id = Uuid::new_v4();
        let html = members_page(vec![MemberWithTotal {
            id,
            name: "Alice".into(),
            email: "alice@test.com".into(),
            created_at: chrono::Utc::now(),
            total_cents: 3500,
        }]);

        let start = html.find("action=\"/admin/contributions/weekly\"").unwrap();
        let weekly = &html[start..];
        let weekly = &weekly[..weekly.find("</form>").unwrap()];

        // Enter in an amount input submits with the first submit button.
        let first = &weekly[weekly.find("type=\"submit\"").unwrap()..];
        let first = &first[..first.find("</button>").unwrap()];
        assert!(first.ends_with(">Save weekly contributions"), "{first}");
        assert!(!weekly.contains("formaction"));

        let delete = format!("form=\"delete-{id}\"");
        assert!(weekly.contains(&delete));
        let form = format!("id=\"delete-{id}\" action=\"/admin/members/{id}/delete\"");
        assert!(html[start + weekly.len()..].contains(&form));
        assert!(html.contains("hx-confirm=\"Delete Alice and all of their contributions?\""));
    }

    #[test]
    fn empty_members_page_has_no_save_button() {
        let html = members_page(Vec::new());
        assert!(html.contains("No members yet."));
        assert!(!html.contains("Save weekly contributions"));
    }

    #[test]
    fn pager_links_come_from_neighbours() {
        let html = AdminContributionsTemplate {
            nav: Nav::default(),
            rows: Vec::new(),
            members: Vec::new(),
            week: String::new(),
            from: String::new(),
            min_amount: String::new(),
            filter_query: "week=2025-W3&".into(),
            page: 1,
            prev_page: None,
            next_page: Some(2),
            error: None,
            notice: None,
        }
        .render()
        .unwrap();
        assert!(html.contains("/admin/contributions?week=2025-W3&amp;page=2"));
        assert!(!html.contains("Previous"));
    }

    #[test]
    fn user_content_is_escaped() {
        let html = SermonsTemplate {
            nav: Nav::default(),
            sermons: vec![Sermon {
                id: Uuid::new_v4(),
                title: "<script>alert(1)</script>".into(),
                description: "Faith".into(),
                date: chrono::NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
                image_url: None,
                created_at: chrono::Utc::now(),
            }],
        }
        .render()
        .unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("Jan 5, 2025"));
    }
}
