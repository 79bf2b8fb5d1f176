use std::sync::Arc;

use crate::services::SearchService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchService>,
}

impl AppState {
    pub fn new(search: SearchService) -> Self {
        Self {
            search: Arc::new(search),
        }
    }
}
