pub use errors::*;
pub use format::*;

mod errors;
mod format;
mod macros;
