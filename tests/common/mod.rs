#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use serde_json::{json, Value};
use streamscout::{
    error::{AppError, AppResult},
    models::{CountryMap, PlatformRef},
    reference::ReferenceData,
    services::{
        providers::{AvailabilitySource, ShowQuery},
        SearchService,
    },
};
use tokio::sync::Notify;

/// Deterministic stand-in for the availability API
///
/// Answers are keyed by `(country, provider)`; anything unscripted returns an
/// empty array. One call can be made to hang forever to exercise cancellation.
#[derive(Default)]
pub struct ScriptedSource {
    responses: HashMap<(String, String), AppResult<Value>>,
    calls: Mutex<Vec<ShowQuery>>,
    hang_at: Option<usize>,
    hung: Arc<Notify>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, country: &str, provider: &str, body: Value) -> Self {
        self.responses
            .insert((country.to_string(), provider.to_string()), Ok(body));
        self
    }

    pub fn fail(mut self, country: &str, provider: &str) -> Self {
        self.responses.insert(
            (country.to_string(), provider.to_string()),
            Err(AppError::Transport("API returned status 503".to_string())),
        );
        self
    }

    /// Call number `index` (0-based) never completes
    pub fn hang_at(mut self, index: usize) -> Self {
        self.hang_at = Some(index);
        self
    }

    /// Resolves once the hanging call has been issued
    pub fn hung(&self) -> Arc<Notify> {
        self.hung.clone()
    }

    pub fn calls(&self) -> Vec<ShowQuery> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called_pairs(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .map(|q| (q.country, q.provider))
            .collect()
    }
}

#[async_trait::async_trait]
impl AvailabilitySource for ScriptedSource {
    async fn search_shows(&self, query: &ShowQuery) -> AppResult<Value> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(query.clone());
            calls.len() - 1
        };

        if self.hang_at == Some(index) {
            self.hung.notify_one();
            std::future::pending::<()>().await;
        }

        match self
            .responses
            .get(&(query.country.clone(), query.provider.clone()))
        {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(e)) => Err(AppError::Transport(e.to_string())),
            None => Ok(json!([])),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// A show streaming by subscription on `provider` in `country`
pub fn subscription_hit(title: &str, country: &str, provider: &str) -> Value {
    json!({ "result": [{
        "title": title,
        "streamingOptions": {
            country: [
                { "service": { "id": provider }, "type": "rent" },
                { "service": { "id": provider }, "type": "subscription" }
            ]
        }
    }] })
}

/// A show that exists but is not on any subscription tier
pub fn rental_only(title: &str, country: &str, provider: &str) -> Value {
    json!([{
        "title": title,
        "streamingOptions": { country: [{ "serviceId": provider, "type": "rent" }] }
    }])
}

pub fn reference(countries: &[(&str, &str)]) -> Arc<ReferenceData> {
    let platforms = vec![
        PlatformRef {
            id: "netflix".to_string(),
            name: "Netflix".to_string(),
            icon: "🎬".to_string(),
        },
        PlatformRef {
            id: "prime".to_string(),
            name: "Prime Video".to_string(),
            icon: "📦".to_string(),
        },
    ];
    Arc::new(ReferenceData::new(
        platforms,
        CountryMap::from_pairs(countries.iter().copied()),
    ))
}

pub fn service(source: Arc<ScriptedSource>, countries: &[(&str, &str)]) -> SearchService {
    SearchService::new(
        Some(source as Arc<dyn AvailabilitySource>),
        reference(countries),
    )
}
