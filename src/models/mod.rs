use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt::Display, str::FromStr};

mod catalog;
mod search;

pub use catalog::{Country, CountryMap, PlatformRef};
pub use search::{SearchEvent, SearchOutcome, SearchReport, SearchRequest};

/// Kind of title being searched, sent as the `show_type` query parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowType {
    #[default]
    Movie,
    Series,
}

impl ShowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShowType::Movie => "movie",
            ShowType::Series => "series",
        }
    }
}

impl Display for ShowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShowType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" => Ok(ShowType::Movie),
            "series" => Ok(ShowType::Series),
            other => Err(format!("unknown show type '{}', expected movie or series", other)),
        }
    }
}

// ============================================================================
// Streaming Availability API Types
// ============================================================================

/// One show as returned by `/shows/search/title`
///
/// Only `streamingOptions` is interpreted; every other field is kept as-is so
/// the raw payload can be handed back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowRecord {
    /// Country code -> raw options, in API order
    #[serde(default)]
    pub streaming_options: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ShowRecord {
    pub fn title(&self) -> Option<&str> {
        self.extra.get("title").and_then(Value::as_str)
    }

    /// Options listed for `country`
    ///
    /// Entries are decoded one at a time; a malformed entry is skipped without
    /// affecting its neighbours or other countries.
    pub fn options_in(&self, country: &str) -> Vec<StreamingOption> {
        let Some(Value::Array(options)) = self.streaming_options.get(country) else {
            return Vec::new();
        };

        options
            .iter()
            .filter_map(|option| match StreamingOption::deserialize(option) {
                Ok(option) => Some(option),
                Err(e) => {
                    tracing::debug!(country, error = %e, "Skipping malformed streaming option");
                    None
                }
            })
            .collect()
    }
}

/// A single way to watch a show in one country
///
/// The service is identified either by a flat `serviceId` or by the nested
/// `service.id` object the live API emits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ApiService>,
    #[serde(rename = "type", default)]
    pub availability_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StreamingOption {
    pub fn service_id(&self) -> Option<&str> {
        self.service_id
            .as_deref()
            .or_else(|| self.service.as_ref().map(|service| service.id.as_str()))
    }

    pub fn availability(&self) -> Option<AvailabilityType> {
        AvailabilityType::parse(&self.availability_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiService {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityType {
    Subscription,
    Rent,
    Buy,
    Free,
    Addon,
}

impl AvailabilityType {
    /// Maps the API's `type` string; unknown tiers yield `None`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "subscription" => Some(AvailabilityType::Subscription),
            "rent" => Some(AvailabilityType::Rent),
            "buy" => Some(AvailabilityType::Buy),
            "free" => Some(AvailabilityType::Free),
            "addon" => Some(AvailabilityType::Addon),
            _ => None,
        }
    }
}

/// First country/platform pair found streaming the title by subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub country: String,
    pub country_name: String,
    pub platform: String,
    /// Every subscription-positive record for that platform in that country
    pub matched_records: Vec<ShowRecord>,
}
