//! Record normalizer.
//!
//! Turns raw backend objects with source-specific key names into canonical
//! [`EnergyRecord`]s and [`RegionalRecord`]s. Bad data never raises an error:
//! records without a usable year are dropped and unparseable numbers become
//! `None`.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::api::ApiError;
use crate::config::{FieldAliases, RegionalKeys};
use crate::models::{EnergyRecord, EnergySource, Region, RegionBreakdown, RegionalRecord};

static NAN_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bNaN\b").expect("NaN pattern is a valid regex"));

/// Body of `GET /api/predictions/{source}/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub predictions: Vec<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl PredictionResponse {
    pub fn success(predictions: Vec<Value>) -> Self {
        Self {
            status: Some("success".to_string()),
            predictions,
            message: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("error"))
    }

    /// Raw prediction objects, or the backend's own failure report.
    pub fn into_predictions(self) -> Result<Vec<Value>, ApiError> {
        if self.is_error() {
            return Err(ApiError::Backend {
                message: self.message,
            });
        }
        Ok(self.predictions)
    }
}

/// Rewrites bare `NaN` tokens to `null` so the payload is valid JSON.
///
/// ```
/// use energy_core::pipeline::normalize::sanitize_payload;
///
/// assert_eq!(sanitize_payload(r#"{"v": NaN}"#), r#"{"v": null}"#);
/// ```
pub fn sanitize_payload(body: &str) -> Cow<'_, str> {
    NAN_TOKEN.replace_all(body, "null")
}

/// Decodes a response body.
///
/// A bare JSON array is accepted as a list of records. Objects are read
/// field by field, so a malformed `predictions` never hides an error
/// `status`. Anything that is not JSON decodes to an empty successful
/// response.
pub fn decode_response(body: &str) -> PredictionResponse {
    let sanitized = sanitize_payload(body);
    match serde_json::from_str::<Value>(&sanitized) {
        Ok(Value::Array(items)) => PredictionResponse::success(items),
        Ok(Value::Object(mut obj)) => {
            let text = |v: Option<Value>| match v {
                Some(Value::String(s)) => Some(s),
                _ => None,
            };
            let status = text(obj.remove("status"));
            let message = text(obj.remove("message"));
            let predictions = match obj.remove("predictions") {
                Some(Value::Array(items)) => items,
                None | Some(Value::Null) => Vec::new(),
                Some(_) => {
                    warn!("predictions field is not an array; treating as empty");
                    Vec::new()
                }
            };
            PredictionResponse {
                status,
                predictions,
                message,
            }
        }
        Ok(_) => {
            warn!("response body is not an object or array; treating as empty");
            PredictionResponse::default()
        }
        Err(error) => {
            warn!(%error, "response body is not JSON; treating as empty");
            PredictionResponse::default()
        }
    }
}

/// Returns the value of the first alias present in `obj`.
///
/// A key holding `null` counts as present.
fn first_present<'a>(
    obj: &'a Map<String, Value>,
    aliases: &[String],
) -> Option<&'a Value> {
    aliases.iter().find_map(|key| obj.get(key))
}

/// Tolerant numeric parser: trims, strips thousands separators, and returns
/// `None` instead of failing.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let normalized = s.trim().replace(',', "");
            if normalized.is_empty() {
                return None;
            }
            normalized.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

/// Parses a year. Integral floats and integer strings are accepted.
pub fn parse_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i32::try_from(i).ok(),
            None => n.as_f64().and_then(integral_year),
        },
        Value::String(s) => {
            let trimmed = s.trim().replace(',', "");
            trimmed
                .parse::<i32>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(integral_year))
        }
        _ => None,
    }
}

fn integral_year(v: f64) -> Option<i32> {
    if v.is_finite() && v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64 {
        Some(v as i32)
    } else {
        None
    }
}

fn optional_number(
    obj: &Map<String, Value>,
    aliases: &[String],
) -> Option<f64> {
    first_present(obj, aliases).and_then(parse_number)
}

fn parse_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    }
}

fn parse_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Normalizes raw backend objects into canonical records.
///
/// For the primary metric the first present alias wins; when none is present
/// the value defaults to `0`. Records whose year does not parse to an integer
/// are dropped. Input order is preserved.
pub fn normalize(
    raw: &[Value],
    aliases: &FieldAliases,
) -> Vec<EnergyRecord> {
    let mut dropped = 0usize;
    let mut records = Vec::with_capacity(raw.len());

    for (index, item) in raw.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            dropped += 1;
            continue;
        };
        let Some(year) = first_present(obj, &aliases.year).and_then(parse_year) else {
            dropped += 1;
            continue;
        };

        let is_predicted = first_present(obj, &aliases.is_predicted).is_some_and(parse_flag);
        let value = match first_present(obj, &aliases.value) {
            Some(v) => parse_number(v),
            None => Some(0.0),
        };
        let id = first_present(obj, &aliases.id)
            .and_then(parse_id)
            .unwrap_or_else(|| {
                if is_predicted {
                    format!("predicted-{index}")
                } else {
                    format!("record-{index}")
                }
            });
        records.push(EnergyRecord {
            year,
            value,
            is_predicted,
            id,
            non_renewable_energy: optional_number(obj, &aliases.non_renewable_energy),
            population: optional_number(obj, &aliases.population),
            gdp: optional_number(obj, &aliases.gdp),
        });
    }

    if dropped > 0 {
        debug!(dropped, kept = records.len(), "dropped records without a usable year");
    }
    records
}

/// Normalizes raw peer-to-peer objects. Any totals present on the wire are
/// ignored; they are recomputed from the leaves when needed.
pub fn normalize_regional(
    raw: &[Value],
    keys: &RegionalKeys,
) -> Vec<RegionalRecord> {
    let year_keys = [keys.year_key.clone(), "year".to_string()];
    let id_keys = ["_id".to_string(), "id".to_string()];
    let mut dropped = 0usize;
    let mut records = Vec::with_capacity(raw.len());

    for item in raw {
        let Some(obj) = item.as_object() else {
            dropped += 1;
            continue;
        };
        let Some(year) = first_present(obj, &year_keys).and_then(parse_year) else {
            dropped += 1;
            continue;
        };

        let number = |key: String| obj.get(&key).and_then(parse_number);
        let regions = Region::ALL
            .into_iter()
            .map(|region| {
                let mut breakdown = RegionBreakdown {
                    non_renewable: number(keys.non_renewable(region)),
                    ..RegionBreakdown::default()
                };
                for source in EnergySource::ALL {
                    breakdown.set_source(source, number(keys.source(region, source)));
                }
                (region, breakdown)
            })
            .collect();

        records.push(RegionalRecord {
            id: first_present(obj, &id_keys).and_then(parse_id),
            year,
            regions,
            consumption: number(keys.consumption()),
        });
    }

    if dropped > 0 {
        debug!(dropped, kept = records.len(), "dropped regional records without a usable year");
    }
    records
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn wind() -> FieldAliases {
        FieldAliases::for_source(EnergySource::Wind)
    }

    // =========================================================================
    // sanitize / decode tests
    // =========================================================================

    #[test]
    fn sanitize_rewrites_every_nan_token() {
        let body = r#"[{"a": NaN, "b": [NaN, 1]}]"#;

        assert_eq!(sanitize_payload(body), r#"[{"a": null, "b": [null, 1]}]"#);
    }

    #[test]
    fn sanitize_leaves_words_containing_nan_alone() {
        let body = r#"{"name": "NaNa"}"#;

        assert_eq!(sanitize_payload(body), body);
    }

    #[test]
    fn decode_response_with_nan_literal() {
        let body = r#"{"status": "success", "predictions": [{"Year": 2030, "Predicted Production": NaN, "isPredicted": true}]}"#;

        let response = decode_response(body);
        let records = normalize(&response.into_predictions().unwrap(), &wind());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, None);
    }

    #[test]
    fn decode_non_json_body_is_empty() {
        let response = decode_response("<html>502 Bad Gateway</html>");

        assert!(response.predictions.is_empty());
        assert!(!response.is_error());
    }

    #[test]
    fn decode_bare_array() {
        let response = decode_response(r#"[{"Year": 2020}]"#);

        assert_eq!(response.predictions.len(), 1);
    }

    #[test]
    fn error_status_becomes_backend_error() {
        let response = decode_response(r#"{"status": "error", "message": "model not trained"}"#);

        assert_eq!(
            response.into_predictions(),
            Err(ApiError::Backend {
                message: Some("model not trained".to_string())
            })
        );
    }

    #[test]
    fn error_status_survives_null_predictions() {
        let response = decode_response(
            r#"{"status": "error", "message": "model not trained", "predictions": null}"#,
        );

        assert_eq!(response.status.as_deref(), Some("error"));
        assert_eq!(
            response.into_predictions(),
            Err(ApiError::Backend {
                message: Some("model not trained".to_string())
            })
        );
    }

    #[test]
    fn non_array_predictions_decode_as_empty() {
        let response = decode_response(r#"{"status": "success", "predictions": {"Year": 2020}}"#);

        assert_eq!(response.into_predictions(), Ok(Vec::new()));
    }

    // =========================================================================
    // parser tests
    // =========================================================================

    #[test]
    fn parse_number_strips_thousands_separators() {
        assert_eq!(parse_number(&json!("1,234.5")), Some(1234.5));
        assert_eq!(parse_number(&json!(" 42 ")), Some(42.0));
        assert_eq!(parse_number(&json!(7)), Some(7.0));
    }

    #[test]
    fn parse_number_failure_is_none() {
        assert_eq!(parse_number(&json!("n/a")), None);
        assert_eq!(parse_number(&json!("")), None);
        assert_eq!(parse_number(&json!("NaN")), None);
        assert_eq!(parse_number(&Value::Null), None);
        assert_eq!(parse_number(&json!(true)), None);
    }

    #[test]
    fn parse_year_accepts_integral_forms() {
        assert_eq!(parse_year(&json!(2020)), Some(2020));
        assert_eq!(parse_year(&json!(2020.0)), Some(2020));
        assert_eq!(parse_year(&json!("2021")), Some(2021));
        assert_eq!(parse_year(&json!("2022.0")), Some(2022));
    }

    #[test]
    fn parse_year_rejects_non_integers() {
        assert_eq!(parse_year(&json!(2020.5)), None);
        assert_eq!(parse_year(&json!("twenty")), None);
        assert_eq!(parse_year(&Value::Null), None);
    }

    // =========================================================================
    // normalize tests
    // =========================================================================

    #[test]
    fn normalize_end_to_end_scenario() {
        let raw = vec![
            json!({"Year": 2020, "Wind (GWh)": 100, "isPredicted": false, "_id": "abc"}),
            json!({"Year": 2025, "Predicted Production": 150, "isPredicted": true}),
        ];

        let records = normalize(&raw, &wind());

        assert_eq!(
            records,
            vec![
                EnergyRecord {
                    year: 2020,
                    value: Some(100.0),
                    is_predicted: false,
                    id: "abc".to_string(),
                    non_renewable_energy: None,
                    population: None,
                    gdp: None,
                },
                EnergyRecord {
                    year: 2025,
                    value: Some(150.0),
                    is_predicted: true,
                    id: "predicted-1".to_string(),
                    non_renewable_energy: None,
                    population: None,
                    gdp: None,
                },
            ]
        );
    }

    #[test]
    fn normalize_prefers_source_label_over_generic_key() {
        let raw = vec![json!({"Year": 2020, "Wind (GWh)": 1, "Predicted Production": 2})];

        assert_eq!(normalize(&raw, &wind())[0].value, Some(1.0));
    }

    #[test]
    fn normalize_defaults_missing_value_to_zero() {
        let raw = vec![json!({"Year": 2020})];

        assert_eq!(normalize(&raw, &wind())[0].value, Some(0.0));
    }

    #[test]
    fn normalize_keeps_present_null_value_as_none() {
        let raw = vec![json!({"Year": 2020, "Wind (GWh)": null, "Predicted Production": 5})];

        assert_eq!(normalize(&raw, &wind())[0].value, None);
    }

    #[test]
    fn normalize_drops_records_without_usable_year() {
        let raw = vec![
            json!({"Year": "unknown", "Wind (GWh)": 1}),
            json!({"Wind (GWh)": 2}),
            json!("not an object"),
            json!({"Year": 2021, "Wind (GWh)": 3}),
        ];

        let records = normalize(&raw, &wind());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, 2021);
    }

    #[test]
    fn normalize_reads_auxiliary_attributes() {
        let raw = vec![json!({
            "Year": 2019,
            "Wind (GWh)": "1,200",
            "Non-Renewable Energy (GWh)": "3,400.5",
            "Population (in millions)": 8.1,
            "Gross Domestic Product": "bad"
        })];

        let record = &normalize(&raw, &wind())[0];

        assert_eq!(record.value, Some(1200.0));
        assert_eq!(record.non_renewable_energy, Some(3400.5));
        assert_eq!(record.population, Some(8.1));
        assert_eq!(record.gdp, None);
        assert!(!record.is_predicted);
    }

    #[test]
    fn normalize_is_idempotent_on_canonical_shape() {
        let raw = vec![
            json!({"Year": 2018, "Wind (GWh)": 90, "_id": "h1", "Population (in millions)": 7.9}),
            json!({"Year": 2019, "Wind (GWh)": "oops", "_id": "h2"}),
            json!({"Year": 2030, "Predicted Production": 200.5, "isPredicted": true}),
        ];
        let once = normalize(&raw, &wind());

        let canonical: Vec<Value> = once
            .iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect();
        let twice = normalize(&canonical, &wind());

        assert_eq!(twice, once);
    }

    // =========================================================================
    // normalize_regional tests
    // =========================================================================

    #[test]
    fn normalize_regional_reads_long_keys_and_ignores_totals() {
        let raw = vec![json!({
            "_id": "p2p-1",
            "Year": "2022",
            "Cebu Geothermal (GWh)": "1,000",
            "Cebu Solar (GWh)": 12.5,
            "Cebu Non-Renewable (GWh)": 300,
            "Cebu Total Power Generation (GWh)": "999999",
            "Visayas Total Power Consumption (GWh)": 4000
        })];

        let records = normalize_regional(&raw, &RegionalKeys::default());

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id.as_deref(), Some("p2p-1"));
        assert_eq!(record.year, 2022);
        assert_eq!(record.consumption, Some(4000.0));

        let cebu = record.region(Region::Cebu).unwrap();
        assert_eq!(cebu.geothermal, Some(1000.0));
        assert_eq!(cebu.solar, Some(12.5));
        assert_eq!(cebu.non_renewable, Some(300.0));
        assert_eq!(cebu.wind, None);
    }

    #[test]
    fn normalize_regional_drops_bad_years() {
        let raw = vec![json!({"Year": "", "Cebu Solar (GWh)": 1})];

        assert!(normalize_regional(&raw, &RegionalKeys::default()).is_empty());
    }
}
