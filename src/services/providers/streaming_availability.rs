//! Streaming Availability API provider (via RapidAPI)

use crate::{
    error::{AppError, AppResult},
    services::providers::{AvailabilitySource, ShowQuery},
};
use reqwest::{Client as HttpClient, RequestBuilder};
use std::time::Duration;

const OUTPUT_LANGUAGE: &str = "en";
const API_KEY_HEADER: &str = "X-RapidAPI-Key";
const API_HOST_HEADER: &str = "X-RapidAPI-Host";

#[derive(Clone)]
pub struct StreamingAvailabilityProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    api_host: String,
}

impl std::fmt::Debug for StreamingAvailabilityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingAvailabilityProvider")
            .field("api_url", &self.api_url)
            .field("api_host", &self.api_host)
            .finish_non_exhaustive()
    }
}

impl StreamingAvailabilityProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        api_host: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_host,
        })
    }

    fn build_request(&self, query: &ShowQuery) -> RequestBuilder {
        let url = format!("{}/shows/search/title", self.api_url);
        self.http_client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_HOST_HEADER, &self.api_host)
            .query(&[
                ("title", query.title.as_str()),
                ("country", query.country.as_str()),
                ("output_language", OUTPUT_LANGUAGE),
                ("provider", query.provider.as_str()),
                ("show_type", query.show_type.as_str()),
            ])
    }
}

#[async_trait::async_trait]
impl AvailabilitySource for StreamingAvailabilityProvider {
    async fn search_shows(&self, query: &ShowQuery) -> AppResult<serde_json::Value> {
        let response = self.build_request(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Transport(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        let body: serde_json::Value = response.json().await?;

        tracing::debug!(
            title = %query.title,
            country = %query.country,
            platform = %query.provider,
            provider = self.name(),
            "Title search completed"
        );

        Ok(body)
    }

    fn name(&self) -> &'static str {
        "streaming_availability"
    }
}
