use crate::{
    error::AppResult,
    models::{CountryMap, ScanResult, SearchEvent, SearchRequest},
    services::{
        cancellation::CancelToken,
        classifier::subscription_matches,
        normalizer::normalize_shows,
        progress::Progress,
        providers::{AvailabilitySource, ShowQuery},
    },
};

/// Per-search scan bookkeeping: the cancellation token and the countries
/// probed so far, in order.
#[derive(Debug, Clone)]
pub struct ScanState {
    token: CancelToken,
    tested: Vec<String>,
}

impl ScanState {
    pub fn new(token: CancelToken) -> Self {
        Self {
            token,
            tested: Vec::new(),
        }
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn tested_countries(&self) -> &[String] {
        &self.tested
    }

    pub fn into_tested_countries(self) -> Vec<String> {
        self.tested
    }
}

/// Walks `countries` in order and, within each, the selected platforms in
/// order, returning the first pair that streams the title by subscription.
///
/// Each country is recorded as tested before its first request goes out.
/// `Ok(None)` means every pair was tried without a match; cancellation always
/// surfaces as an error, never as `None`.
pub async fn scan_countries(
    source: &dyn AvailabilitySource,
    request: &SearchRequest,
    countries: &CountryMap,
    state: &mut ScanState,
    progress: &Progress,
) -> AppResult<Option<ScanResult>> {
    progress.emit(SearchEvent::ScanStarted {
        total_countries: countries.len(),
    });

    for country in countries.iter() {
        state.token.check()?;
        state.tested.push(country.code.clone());
        progress.emit(SearchEvent::CountryTested {
            country: country.code.clone(),
            country_name: country.name.clone(),
        });

        for platform in &request.platforms {
            let query = ShowQuery::new(&request.title, &country.code, request.show_type, platform);
            let body = state.token.guard(source.search_shows(&query)).await?;
            let matched = subscription_matches(normalize_shows(body), &country.code, platform);

            if !matched.is_empty() {
                tracing::info!(
                    country = %country.code,
                    platform = %platform,
                    matches = matched.len(),
                    tested = state.tested.len(),
                    "Subscription availability found"
                );
                return Ok(Some(ScanResult {
                    country: country.code.clone(),
                    country_name: country.name.clone(),
                    platform: platform.clone(),
                    matched_records: matched,
                }));
            }
        }

        tracing::debug!(country = %country.code, "No subscription match");
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, models::ShowType, services::providers::MockAvailabilitySource};
    use mockall::Sequence;
    use serde_json::json;

    fn subscription_show(country: &str, platform: &str) -> serde_json::Value {
        json!([{
            "title": "Dark",
            "streamingOptions": { country: [{ "serviceId": platform, "type": "subscription" }] }
        }])
    }

    fn request(platforms: &[&str]) -> SearchRequest {
        SearchRequest::new(
            "Dark",
            platforms.iter().map(|p| p.to_string()).collect(),
            ShowType::Series,
        )
    }

    #[tokio::test]
    async fn test_match_in_second_country() {
        let mut source = MockAvailabilitySource::new();
        source
            .expect_search_shows()
            .returning(|q| match q.country.as_str() {
                "fr" => Ok(subscription_show("fr", "netflix")),
                _ => Ok(json!([])),
            });

        let countries = CountryMap::from_pairs([("us", "United States"), ("fr", "France")]);
        let mut state = ScanState::new(CancelToken::new());

        let result = scan_countries(
            &source,
            &request(&["netflix"]),
            &countries,
            &mut state,
            &Progress::silent(),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(state.tested_countries(), ["us", "fr"]);
        assert_eq!(result.country, "fr");
        assert_eq!(result.country_name, "France");
        assert_eq!(result.platform, "netflix");
        assert_eq!(result.matched_records.len(), 1);
    }

    #[tokio::test]
    async fn test_platforms_tried_in_selection_order() {
        let mut source = MockAvailabilitySource::new();
        let mut seq = Sequence::new();
        source
            .expect_search_shows()
            .withf(|q| q.country == "us" && q.provider == "netflix")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(json!([])));
        source
            .expect_search_shows()
            .withf(|q| q.country == "us" && q.provider == "prime")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(subscription_show("us", "prime")));

        let countries = CountryMap::from_pairs([("us", "United States"), ("fr", "France")]);
        let mut state = ScanState::new(CancelToken::new());

        let result = scan_countries(
            &source,
            &request(&["netflix", "prime"]),
            &countries,
            &mut state,
            &Progress::silent(),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(result.platform, "prime");
        assert_eq!(state.tested_countries(), ["us"]);
    }

    #[tokio::test]
    async fn test_non_subscription_results_do_not_match() {
        let mut source = MockAvailabilitySource::new();
        source.expect_search_shows().times(2).returning(|q| {
            Ok(json!({ "result": [{
                "title": "Dark",
                "streamingOptions": { q.country.clone(): [{ "serviceId": "netflix", "type": "buy" }] }
            }] }))
        });

        let countries = CountryMap::from_pairs([("us", "United States"), ("fr", "France")]);
        let mut state = ScanState::new(CancelToken::new());

        let result = scan_countries(
            &source,
            &request(&["netflix"]),
            &countries,
            &mut state,
            &Progress::silent(),
        )
        .await
        .unwrap();

        assert_eq!(result, None);
        assert_eq!(state.tested_countries(), ["us", "fr"]);
    }

    #[tokio::test]
    async fn test_only_positive_records_are_kept() {
        let mut source = MockAvailabilitySource::new();
        source.expect_search_shows().returning(|_| {
            Ok(json!([
                { "title": "Dark", "streamingOptions": { "de": [{ "serviceId": "netflix", "type": "subscription" }] } },
                { "title": "Dark Matter", "streamingOptions": { "de": [{ "serviceId": "netflix", "type": "rent" }] } },
                { "title": "Dark Places", "streamingOptions": { "de": [{ "serviceId": "netflix", "type": "subscription" }] } }
            ]))
        });

        let countries = CountryMap::from_pairs([("de", "Germany")]);
        let mut state = ScanState::new(CancelToken::new());

        let result = scan_countries(
            &source,
            &request(&["netflix"]),
            &countries,
            &mut state,
            &Progress::silent(),
        )
        .await
        .unwrap()
        .unwrap();

        let titles: Vec<_> = result.matched_records.iter().filter_map(|s| s.title()).collect();
        assert_eq!(titles, vec!["Dark", "Dark Places"]);
    }

    #[tokio::test]
    async fn test_cancelled_scan_reports_cancellation() {
        let mut source = MockAvailabilitySource::new();
        source.expect_search_shows().times(0);

        let token = CancelToken::new();
        token.cancel();
        let countries = CountryMap::from_pairs([("us", "United States")]);
        let mut state = ScanState::new(token);

        let result = scan_countries(
            &source,
            &request(&["netflix"]),
            &countries,
            &mut state,
            &Progress::silent(),
        )
        .await;

        assert!(matches!(result, Err(AppError::Cancelled)));
        assert!(state.tested_countries().is_empty());
    }

    #[tokio::test]
    async fn test_country_reported_before_request() {
        let (progress, mut rx) = Progress::channel();
        let mut source = MockAvailabilitySource::new();
        source
            .expect_search_shows()
            .returning(|_| Err(AppError::Transport("timeout".to_string())));

        let countries = CountryMap::from_pairs([("jp", "Japan"), ("kr", "South Korea")]);
        let mut state = ScanState::new(CancelToken::new());

        let result = scan_countries(
            &source,
            &request(&["netflix"]),
            &countries,
            &mut state,
            &progress,
        )
        .await;
        drop(progress);

        assert!(matches!(result, Err(AppError::Transport(_))));
        assert_eq!(state.tested_countries(), ["jp"]);

        assert_eq!(
            rx.recv().await,
            Some(SearchEvent::ScanStarted { total_countries: 2 })
        );
        assert_eq!(
            rx.recv().await,
            Some(SearchEvent::CountryTested {
                country: "jp".to_string(),
                country_name: "Japan".to_string(),
            })
        );
        assert_eq!(rx.recv().await, None);
    }
}
