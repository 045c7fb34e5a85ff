//! Pipeline configuration.
//!
//! The backend's wire format uses long, human-readable keys
//! (`"Wind (GWh)"`, `"Cebu Geothermal (GWh)"`). Those keys live here as
//! explicit alias tables rather than as literals scattered through the
//! pipeline, so the contract with the backend can be read and tested in one
//! place and overridden from a TOML file.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000"
//!
//! [retry]
//! max_retries = 2
//! delay_ms = 1000
//!
//! [aliases.wind]
//! value = ["value", "Wind (GWh)", "Predicted Production"]
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{EnergySource, Region};

/// Errors raised while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Prioritized wire-key aliases for every canonical [`EnergyRecord`] field.
///
/// The first key present in a raw record wins. The canonical camelCase key is
/// always tried first, which makes normalization idempotent.
///
/// [`EnergyRecord`]: crate::models::EnergyRecord
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldAliases {
    pub year: Vec<String>,
    pub value: Vec<String>,
    pub is_predicted: Vec<String>,
    pub id: Vec<String>,
    pub non_renewable_energy: Vec<String>,
    pub population: Vec<String>,
    pub gdp: Vec<String>,
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| k.to_string()).collect()
}

impl Default for FieldAliases {
    fn default() -> Self {
        Self {
            year: keys(&["year", "Year"]),
            value: keys(&["value", "Predicted Production"]),
            is_predicted: keys(&["isPredicted", "is_predicted"]),
            id: keys(&["id", "_id"]),
            non_renewable_energy: keys(&["nonRenewableEnergy", "Non-Renewable Energy (GWh)"]),
            population: keys(&["population", "Population (in millions)"]),
            gdp: keys(&["gdp", "Gross Domestic Product"]),
        }
    }
}

impl FieldAliases {
    /// Built-in table for one source: the source's `"<Source> (GWh)"` label is
    /// preferred over the generic `"Predicted Production"` key.
    pub fn for_source(source: EnergySource) -> Self {
        Self {
            value: keys(&["value", source.wire_label(), "Predicted Production"]),
            ..Self::default()
        }
    }

    /// Ensures each list starts with its canonical key.
    pub fn canonicalized(mut self) -> Self {
        fn lead(
            list: &mut Vec<String>,
            canonical: &str,
        ) {
            list.retain(|k| k != canonical);
            list.insert(0, canonical.to_string());
        }
        lead(&mut self.year, "year");
        lead(&mut self.value, "value");
        lead(&mut self.is_predicted, "isPredicted");
        lead(&mut self.id, "id");
        lead(&mut self.non_renewable_energy, "nonRenewableEnergy");
        lead(&mut self.population, "population");
        lead(&mut self.gdp, "gdp");
        self
    }
}

/// Builder for the long regional wire keys used by `/api/peertopeer/records`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionalKeys {
    pub year_key: String,
    /// Name of the grid the regions roll up into.
    pub grid: String,
    pub unit: String,
}

impl Default for RegionalKeys {
    fn default() -> Self {
        Self {
            year_key: "Year".to_string(),
            grid: "Visayas".to_string(),
            unit: "(GWh)".to_string(),
        }
    }
}

impl RegionalKeys {
    pub fn source(
        &self,
        region: Region,
        source: EnergySource,
    ) -> String {
        format!("{} {} {}", region.name(), source.name(), self.unit)
    }

    pub fn non_renewable(
        &self,
        region: Region,
    ) -> String {
        format!("{} Non-Renewable {}", region.name(), self.unit)
    }

    pub fn renewable_total(
        &self,
        region: Region,
    ) -> String {
        format!("{} Total Renewable {}", region.name(), self.unit)
    }

    pub fn region_total(
        &self,
        region: Region,
    ) -> String {
        format!("{} Total Power Generation {}", region.name(), self.unit)
    }

    pub fn grand_total(&self) -> String {
        format!("{} Total Power Generation {}", self.grid, self.unit)
    }

    pub fn consumption(&self) -> String {
        format!("{} Total Power Consumption {}", self.grid, self.unit)
    }
}

/// Bounded retry for transient transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay_ms: 1000,
        }
    }
}

/// Where the embedding application's transport should send requests, and
/// how long the dashboard waits for each attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl ApiConfig {
    /// Per-attempt limit applied by the dashboard around each fetch.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// `GET /api/predictions/{source}/?start_year=..&end_year=..`
    pub fn predictions_url(
        &self,
        source: EnergySource,
        start_year: i32,
        end_year: i32,
    ) -> String {
        format!(
            "{}/api/predictions/{}/?start_year={start_year}&end_year={end_year}",
            self.base_url.trim_end_matches('/'),
            source.slug()
        )
    }
}

/// Top-level configuration. Every section is optional in the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub api: ApiConfig,
    pub retry: RetryPolicy,
    pub regional: RegionalKeys,
    /// Alias overrides keyed by source slug (`wind`, `hydropower`, ...).
    pub aliases: BTreeMap<String, FieldAliases>,
}

impl PipelineConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Configured aliases for `source`, else the built-in table.
    pub fn aliases_for(
        &self,
        source: EnergySource,
    ) -> FieldAliases {
        self.aliases
            .get(source.slug())
            .cloned()
            .map(FieldAliases::canonicalized)
            .unwrap_or_else(|| FieldAliases::for_source(source))
    }
}
