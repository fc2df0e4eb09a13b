pub use contribution::*;
pub use event::*;
pub use event_type::*;
pub use forum::*;
pub use member::*;
pub use photo::*;
pub use profile::*;
pub use sermon::*;
pub use session::*;
pub use stats::*;
pub use user::*;

mod contribution;
mod event;
mod event_type;
mod forum;
mod member;
mod photo;
mod profile;
mod sermon;
mod session;
mod stats;
mod user;
