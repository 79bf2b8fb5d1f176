use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Streaming Availability API key (RapidAPI). Searches fail without it.
    #[serde(default)]
    pub streaming_api_key: Option<String>,

    /// Streaming Availability API base URL
    #[serde(default = "default_streaming_api_url")]
    pub streaming_api_url: String,

    /// Value sent as the `X-RapidAPI-Host` header
    #[serde(default = "default_streaming_api_host")]
    pub streaming_api_host: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Platform catalog (JSON array of `{id, name, icon}`)
    #[serde(default = "default_platforms_path")]
    pub platforms_path: PathBuf,

    /// Country list (JSON object of code -> name, scanned in file order)
    #[serde(default = "default_countries_path")]
    pub countries_path: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_streaming_api_url() -> String {
    "https://streaming-availability.p.rapidapi.com".to_string()
}

fn default_streaming_api_host() -> String {
    "streaming-availability.p.rapidapi.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_platforms_path() -> PathBuf {
    PathBuf::from("data/platforms.json")
}

fn default_countries_path() -> PathBuf {
    PathBuf::from("data/countries.json")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// The API key, if one is set and not blank
    pub fn api_key(&self) -> Option<&str> {
        self.streaming_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_api_key() {
        let config = Config::from_vars(vars(&[])).unwrap();

        assert_eq!(config.api_key(), None);
        assert_eq!(
            config.streaming_api_url,
            "https://streaming-availability.p.rapidapi.com"
        );
        assert_eq!(
            config.streaming_api_host,
            "streaming-availability.p.rapidapi.com"
        );
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.countries_path, PathBuf::from("data/countries.json"));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = Config::from_vars(vars(&[("STREAMING_API_KEY", "   ")])).unwrap();
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(vars(&[
            ("STREAMING_API_KEY", "secret"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.api_key(), Some("secret"));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.port, 8080);
    }
}
