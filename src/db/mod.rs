pub use contributions::*;
pub use db::*;
pub use events::*;
pub use forum::*;
pub use members::*;
pub use photos::*;
pub use profiles::*;
pub use sermons::*;
pub use sessions::*;
pub use stats::*;

mod contributions;
mod db;
mod events;
mod forum;
mod members;
mod photos;
mod profiles;
mod sermons;
mod sessions;
mod stats;
