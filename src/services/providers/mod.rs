//! Streaming availability data sources
//!
//! The search algorithm only needs one operation from the outside world: "run
//! a title search for this country/provider and give me the decoded body".
//! Keeping that behind a trait lets the scanner run against the live API or a
//! scripted source in tests.

use crate::{error::AppResult, models::ShowType};

pub mod streaming_availability;

pub use streaming_availability::StreamingAvailabilityProvider;

/// Parameters of one `/shows/search/title` request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShowQuery {
    pub title: String,
    pub country: String,
    pub show_type: ShowType,
    /// Platform id sent as the `provider` parameter
    pub provider: String,
}

impl ShowQuery {
    pub fn new(title: &str, country: &str, show_type: ShowType, provider: &str) -> Self {
        Self {
            title: title.to_string(),
            country: country.to_string(),
            show_type,
            provider: provider.to_string(),
        }
    }
}

/// Trait for availability data sources
///
/// Implementations return the raw decoded JSON body; shape handling is left to
/// [`crate::services::normalizer`]. Any failure (status, timeout, decoding)
/// should come back as [`crate::error::AppError::Transport`].
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AvailabilitySource: Send + Sync {
    async fn search_shows(&self, query: &ShowQuery) -> AppResult<serde_json::Value>;

    /// Source name for logging and debugging
    fn name(&self) -> &'static str;
}
