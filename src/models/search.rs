use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ScanResult, ShowType};
use crate::error::{AppError, AppResult};

/// What the caller is looking for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub title: String,
    /// Selected platform ids, probed in this order
    pub platforms: Vec<String>,
    #[serde(default, alias = "show_type")]
    pub show_type: ShowType,
}

impl SearchRequest {
    pub fn new<T: Into<String>>(title: T, platforms: Vec<String>, show_type: ShowType) -> Self {
        Self {
            title: title.into(),
            platforms,
            show_type,
        }
    }

    /// Rejects blank titles and empty platform selections; trims the title
    pub fn validated(&self) -> AppResult<SearchRequest> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
        }

        let platforms: Vec<String> = self
            .platforms
            .iter()
            .map(|platform| platform.trim())
            .filter(|platform| !platform.is_empty())
            .map(str::to_string)
            .collect();
        if platforms.is_empty() {
            return Err(AppError::InvalidInput(
                "Select at least one platform".to_string(),
            ));
        }

        Ok(SearchRequest::new(title, platforms, self.show_type))
    }
}

/// Progress emitted while a search runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SearchEvent {
    #[serde(rename_all = "camelCase")]
    Started { search_id: Uuid },
    /// Existence check request against the reference country
    Probing { platform: String },
    #[serde(rename_all = "camelCase")]
    ScanStarted { total_countries: usize },
    /// Emitted before any request for `country` goes out
    #[serde(rename_all = "camelCase")]
    CountryTested {
        country: String,
        country_name: String,
    },
}

impl SearchEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SearchEvent::Started { .. } => "started",
            SearchEvent::Probing { .. } => "probing",
            SearchEvent::ScanStarted { .. } => "scanStarted",
            SearchEvent::CountryTested { .. } => "countryTested",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SearchOutcome {
    Found { result: ScanResult },
    Failed { error: String, message: String },
}

impl SearchOutcome {
    pub fn from_error(err: &AppError) -> Self {
        SearchOutcome::Failed {
            error: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Serializable summary of one finished search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub search_id: Uuid,
    #[serde(flatten)]
    pub outcome: SearchOutcome,
    /// Countries the scan started probing, kept on failure too
    pub tested_countries: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
