use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{ScanResult, SearchEvent, SearchOutcome, SearchReport, SearchRequest},
    reference::ReferenceData,
    services::{
        cancellation::SearchController,
        prober::title_exists,
        progress::Progress,
        providers::{AvailabilitySource, StreamingAvailabilityProvider},
        scanner::{scan_countries, ScanState},
    },
};

/// Result of one [`SearchService::search`] call
///
/// `tested_countries` survives failures so callers can show how far the scan
/// got.
#[derive(Debug)]
pub struct SearchRun {
    pub search_id: Uuid,
    pub outcome: AppResult<ScanResult>,
    pub tested_countries: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SearchRun {
    fn failed(err: AppError) -> Self {
        let now = Utc::now();
        Self {
            search_id: Uuid::new_v4(),
            outcome: Err(err),
            tested_countries: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    pub fn into_report(self) -> SearchReport {
        let outcome = match &self.outcome {
            Ok(result) => SearchOutcome::Found {
                result: result.clone(),
            },
            Err(err) => SearchOutcome::from_error(err),
        };

        SearchReport {
            search_id: self.search_id,
            outcome,
            tested_countries: self.tested_countries,
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}

/// Entry point for searches: existence check, then the country scan
///
/// Only one search runs at a time; starting another cancels the active one.
pub struct SearchService {
    source: Option<Arc<dyn AvailabilitySource>>,
    reference: Arc<ReferenceData>,
    controller: SearchController,
}

impl SearchService {
    /// `source` is `None` when no API credential is configured; every search
    /// then fails with [`AppError::Configuration`].
    pub fn new(
        source: Option<Arc<dyn AvailabilitySource>>,
        reference: Arc<ReferenceData>,
    ) -> Self {
        Self {
            source,
            reference,
            controller: SearchController::new(),
        }
    }

    pub fn from_config(config: &Config, reference: Arc<ReferenceData>) -> AppResult<Self> {
        let source = match config.api_key() {
            Some(api_key) => {
                let provider = StreamingAvailabilityProvider::new(
                    api_key.to_string(),
                    config.streaming_api_url.clone(),
                    config.streaming_api_host.clone(),
                    config.request_timeout(),
                )?;
                Some(Arc::new(provider) as Arc<dyn AvailabilitySource>)
            }
            None => {
                tracing::warn!("STREAMING_API_KEY is not set, searches will fail");
                None
            }
        };

        Ok(Self::new(source, reference))
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Cancels the active search, if any
    pub fn cancel(&self) -> bool {
        self.controller.cancel()
    }

    pub fn is_searching(&self) -> bool {
        self.controller.is_active()
    }

    pub async fn search(&self, request: &SearchRequest, progress: &Progress) -> SearchRun {
        let Some(source) = self.source.as_deref() else {
            return SearchRun::failed(AppError::Configuration(
                "Missing Streaming Availability API key".to_string(),
            ));
        };
        let request = match request.validated() {
            Ok(request) => request,
            Err(err) => return SearchRun::failed(err),
        };

        let search = self.controller.begin();
        let search_id = search.id();
        let started_at = Utc::now();
        let span = tracing::info_span!(
            "search",
            search_id = %search_id,
            title = %request.title,
            show_type = %request.show_type,
        );

        let mut state = ScanState::new(search.token().clone());
        let outcome = self
            .run(source, &request, &mut state, progress, search_id)
            .instrument(span)
            .await;
        let outcome = if search.finish() {
            Err(AppError::Cancelled)
        } else {
            outcome
        };

        SearchRun {
            search_id,
            outcome,
            tested_countries: state.into_tested_countries(),
            started_at,
            finished_at: Utc::now(),
        }
    }

    async fn run(
        &self,
        source: &dyn AvailabilitySource,
        request: &SearchRequest,
        state: &mut ScanState,
        progress: &Progress,
        search_id: Uuid,
    ) -> AppResult<ScanResult> {
        tracing::info!(
            platforms = ?request.platforms,
            source = source.name(),
            "Search started"
        );
        progress.emit(SearchEvent::Started { search_id });

        let outcome = self.probe_then_scan(source, request, state, progress).await;

        match &outcome {
            Ok(result) => tracing::info!(
                country = %result.country,
                platform = %result.platform,
                "Search finished with a match"
            ),
            Err(AppError::Cancelled) => tracing::info!(
                tested = state.tested_countries().len(),
                "Search cancelled"
            ),
            Err(AppError::NotFound(_)) | Err(AppError::NoAvailability(_)) => tracing::info!(
                tested = state.tested_countries().len(),
                "Search finished without a match"
            ),
            Err(e) => tracing::warn!(error = %e, "Search failed"),
        }

        outcome
    }

    async fn probe_then_scan(
        &self,
        source: &dyn AvailabilitySource,
        request: &SearchRequest,
        state: &mut ScanState,
        progress: &Progress,
    ) -> AppResult<ScanResult> {
        if !title_exists(source, request, state.token(), progress).await? {
            return Err(AppError::NotFound(format!(
                "'{}' does not exist or was not found in the catalog",
                request.title
            )));
        }

        scan_countries(source, request, &self.reference.countries, state, progress)
            .await?
            .ok_or_else(|| {
                AppError::NoAvailability(format!(
                    "'{}' is not available by subscription on the selected platforms",
                    request.title
                ))
            })
    }
}
