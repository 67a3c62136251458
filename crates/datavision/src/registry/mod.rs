//! In-memory dataset storage.

mod dataset;
mod store;

pub use dataset::{Dataset, DatasetSummary, Row};
pub use store::{DatasetId, Registry};
