//! Static reference data: the platform catalog and the ordered country list.
//!
//! Both are loaded once before any search and never change afterwards. A
//! missing or malformed file is fatal.

use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::{CountryMap, PlatformRef},
};

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub platforms: Vec<PlatformRef>,
    /// Scan order is the order of this map
    pub countries: CountryMap,
}

impl ReferenceData {
    pub fn new(platforms: Vec<PlatformRef>, countries: CountryMap) -> Self {
        Self {
            platforms,
            countries,
        }
    }

    pub fn load(platforms_path: &Path, countries_path: &Path) -> AppResult<Self> {
        let platforms = read_file(platforms_path)?;
        let countries = read_file(countries_path)?;
        let data = Self::from_json(&platforms, &countries)?;

        tracing::info!(
            platforms = data.platforms.len(),
            countries = data.countries.len(),
            "Loaded reference data"
        );

        Ok(data)
    }

    pub fn from_json(platforms: &str, countries: &str) -> AppResult<Self> {
        let platforms: Vec<PlatformRef> = serde_json::from_str(platforms)
            .map_err(|e| AppError::ReferenceData(format!("Invalid platform catalog: {}", e)))?;
        let countries: CountryMap = serde_json::from_str(countries)
            .map_err(|e| AppError::ReferenceData(format!("Invalid country list: {}", e)))?;

        if countries.is_empty() {
            return Err(AppError::ReferenceData("Country list is empty".to_string()));
        }

        Ok(Self::new(platforms, countries))
    }

    pub fn platform(&self, id: &str) -> Option<&PlatformRef> {
        self.platforms.iter().find(|platform| platform.id == id)
    }

    /// The platform preselected when the caller picks none
    pub fn default_platform(&self) -> Option<&PlatformRef> {
        self.platforms.first()
    }
}

fn read_file(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| AppError::ReferenceData(format!("Cannot read {}: {}", path.display(), e)))
}
