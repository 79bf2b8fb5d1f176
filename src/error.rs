use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
///
/// Every failure of a search collapses into one of these categories before it
/// reaches a caller.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// A required credential is missing; raised before any request is made.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The title did not show up in the reference-country pre-check.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The title exists but no country/platform pair streams it by subscription.
    #[error("No availability: {0}")]
    NoAvailability(String),

    #[error("Search cancelled")]
    Cancelled,

    /// Any network or API failure: non-2xx, timeout, undecodable body.
    #[error("Search failed: {0}")]
    Transport(String),

    /// Platform catalog or country list is missing or malformed.
    #[error("Reference data error: {0}")]
    ReferenceData(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl AppError {
    /// Stable machine-readable name of the category
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "configuration",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::NotFound(_) => "not_found",
            AppError::NoAvailability(_) => "no_availability",
            AppError::Cancelled => "cancelled",
            AppError::Transport(_) => "transport",
            AppError::ReferenceData(_) => "reference_data",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::NoAvailability(_) => StatusCode::NOT_FOUND,
            AppError::Cancelled => StatusCode::CONFLICT,
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_) | AppError::ReferenceData(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
