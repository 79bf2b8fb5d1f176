use crate::{
    error::AppResult,
    models::{SearchEvent, SearchRequest},
    services::{
        cancellation::CancelToken,
        normalizer::normalize_shows,
        progress::Progress,
        providers::{AvailabilitySource, ShowQuery},
    },
};

/// Country used for the existence pre-check, independent of the scan list
pub const REFERENCE_COUNTRY: &str = "us";

/// Checks that the title exists at all before the full country scan.
///
/// Platforms are tried in selection order against [`REFERENCE_COUNTRY`]; the
/// first request returning any show settles it and the remaining platforms are
/// skipped. Availability type is irrelevant here.
pub async fn title_exists(
    source: &dyn AvailabilitySource,
    request: &SearchRequest,
    token: &CancelToken,
    progress: &Progress,
) -> AppResult<bool> {
    for platform in &request.platforms {
        token.check()?;
        progress.emit(SearchEvent::Probing {
            platform: platform.clone(),
        });

        let query = ShowQuery::new(
            &request.title,
            REFERENCE_COUNTRY,
            request.show_type,
            platform,
        );
        let body = token.guard(source.search_shows(&query)).await?;
        let shows = normalize_shows(body);

        if !shows.is_empty() {
            tracing::debug!(
                platform = %platform,
                shows = shows.len(),
                "Title confirmed in reference country"
            );
            return Ok(true);
        }
    }

    Ok(false)
}
