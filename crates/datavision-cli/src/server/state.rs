//! Application state for the web server.

use std::sync::Arc;

use datavision::DataVision;

/// Default request body limit for uploads (50 MiB).
pub const DEFAULT_UPLOAD_LIMIT: usize = 50 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Registry and query engine shared by every handler.
    pub service: Arc<DataVision>,
    /// Maximum accepted request body size in bytes.
    pub upload_limit: usize,
}

impl AppState {
    /// Create new application state.
    pub fn new(service: Arc<DataVision>) -> Self {
        Self {
            service,
            upload_limit: DEFAULT_UPLOAD_LIMIT,
        }
    }

    /// Override the request body limit.
    pub fn with_upload_limit(mut self, bytes: usize) -> Self {
        self.upload_limit = bytes;
        self
    }
}
