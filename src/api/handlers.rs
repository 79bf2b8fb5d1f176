use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event as SseEvent, KeepAlive},
        IntoResponse, Response, Sse,
    },
    Json,
};
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::convert::Infallible;
use tokio_stream::{wrappers::UnboundedReceiverStream, StreamExt};

use crate::models::{CountryMap, PlatformRef, SearchRequest, ShowType};
use crate::services::Progress;

use super::AppState;

/// Query string of the streaming search endpoint
///
/// `platforms` is a comma-separated list of platform ids.
#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub title: String,
    pub platforms: String,
    #[serde(default)]
    pub show_type: ShowType,
}

impl StreamQuery {
    pub fn into_request(self) -> SearchRequest {
        let platforms = self
            .platforms
            .split(',')
            .map(str::trim)
            .filter(|platform| !platform.is_empty())
            .map(str::to_string)
            .collect();
        SearchRequest::new(self.title, platforms, self.show_type)
    }
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Platform catalog
pub async fn get_platforms(State(state): State<AppState>) -> Json<Vec<PlatformRef>> {
    Json(state.search.reference().platforms.clone())
}

/// Countries in scan order
pub async fn get_countries(State(state): State<AppState>) -> Json<CountryMap> {
    Json(state.search.reference().countries.clone())
}

/// Runs a search to completion and returns its report.
///
/// Failures keep the report body (with the countries tested so far) and use
/// the error's status code.
pub async fn run_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Response {
    let run = state.search.search(&request, &Progress::silent()).await;
    let status = match &run.outcome {
        Ok(_) => StatusCode::OK,
        Err(e) => e.status_code(),
    };

    (status, Json(run.into_report())).into_response()
}

/// Runs a search and streams its progress as Server-Sent Events.
///
/// Every [`crate::models::SearchEvent`] becomes one event named after its
/// kind; a final `result` event carries the report.
pub async fn stream_search(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let request = query.into_request();
    let (progress, rx) = Progress::channel();
    let service = state.search.clone();

    // progress is dropped when the task ends, which closes the event stream
    let task = tokio::spawn(async move {
        service
            .search(&request, &progress)
            .await
            .into_report()
    });

    let events = UnboundedReceiverStream::new(rx)
        .map(|event| Ok::<_, Infallible>(sse_event(event.name(), &event)));

    let finished = stream::once(async move {
        let event = match task.await {
            Ok(report) => sse_event("result", &report),
            Err(e) => {
                tracing::error!(error = %e, "Search task failed");
                SseEvent::default().event("error").data(e.to_string())
            }
        };
        Ok::<_, Infallible>(event)
    });

    Sse::new(events.chain(finished)).keep_alive(KeepAlive::default())
}

/// Cancels the active search
pub async fn cancel_search(State(state): State<AppState>) -> Json<Value> {
    let cancelled = state.search.cancel();
    Json(json!({ "cancelled": cancelled }))
}

fn sse_event<T: Serialize>(name: &str, payload: &T) -> SseEvent {
    let data = serde_json::to_string(payload).unwrap_or_default();
    SseEvent::default().event(name).data(data)
}
