//! API request handlers.

mod analysis;
mod datasets;
mod health;
mod upload;

pub use analysis::*;
pub use datasets::*;
pub use health::*;
pub use upload::*;
