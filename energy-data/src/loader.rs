use std::path::Path;

use energy_core::ApiError;
use energy_core::config::{FieldAliases, RegionalKeys};
use energy_core::models::{EnergyRecord, RegionalRecord};
use energy_core::pipeline::{PredictionResponse, decode_response, normalize, normalize_regional, sanitize_payload};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when loading a saved backend response.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("backend reported a failure: {0}")]
    Backend(#[from] ApiError),
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Reads a saved `/api/predictions/{source}/` body.
///
/// A file that is not JSON decodes to an empty response, the same way a
/// live body would.
pub fn load_payload(path: &Path) -> Result<PredictionResponse, LoadError> {
    let body = read(path)?;
    Ok(decode_response(&body))
}

/// Reads and normalizes a saved prediction body.
pub fn load_records(
    path: &Path,
    aliases: &FieldAliases,
) -> Result<Vec<EnergyRecord>, LoadError> {
    let raw = load_payload(path)?.into_predictions()?;
    let records = normalize(&raw, aliases);
    debug!(path = %path.display(), count = records.len(), "loaded energy records");
    Ok(records)
}

/// Reads a saved `/api/peertopeer/records` body: a JSON array of records.
///
/// Anything other than an array yields no records.
pub fn load_regional(
    path: &Path,
    keys: &RegionalKeys,
) -> Result<Vec<RegionalRecord>, LoadError> {
    let body = read(path)?;
    let raw = match serde_json::from_str::<Value>(&sanitize_payload(&body)) {
        Ok(Value::Array(items)) => items,
        Ok(_) | Err(_) => {
            warn!(path = %path.display(), "regional file is not a JSON array; treating as empty");
            Vec::new()
        }
    };
    let records = normalize_regional(&raw, keys);
    debug!(path = %path.display(), count = records.len(), "loaded regional records");
    Ok(records)
}
