use crate::config::Config;
use crate::store::ItemStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
    /// Expose unhandled error detail to clients
    pub development: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn ItemStore>, config: &Config) -> Self {
        Self {
            store,
            development: config.is_development(),
        }
    }
}
