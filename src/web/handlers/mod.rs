pub mod admin_dashboard;
pub mod admin_events;
pub mod admin_members;
pub mod admin_photos;
pub mod admin_profiles;
pub mod admin_sermons;
pub mod auth;
pub mod forum;
pub mod members_area;
pub mod public;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    public::configure(cfg);
    auth::configure(cfg);
    forum::configure(cfg);
    members_area::configure(cfg);
    admin_dashboard::configure(cfg);
    admin_sermons::configure(cfg);
    admin_photos::configure(cfg);
    admin_events::configure(cfg);
    admin_members::configure(cfg);
    admin_profiles::configure(cfg);
}
