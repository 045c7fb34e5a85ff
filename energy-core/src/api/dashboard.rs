//! Per-source dataset store sitting between the backend and the views.
//!
//! The store owns the only mutable state in the pipeline: the last applied
//! dataset. Every refresh replaces it wholesale. Completions that arrive after
//! a newer refresh was issued are dropped.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::client::EnergyApi;
use super::error::ApiError;
use super::retry::with_retry;
use super::sequencer::RequestSequencer;
use crate::calculations::RegionalForm;
use crate::calculations::common::{parse_form_year, parse_optional_number};
use crate::calculations::regional::number_or_null;
use crate::config::{FieldAliases, PipelineConfig, RegionalKeys, RetryPolicy};
use crate::models::{
    EnergyRecord, EnergyRecordDraft, EnergySource, RecommendationRecord, RegionalRecord,
};
use crate::pipeline::{
    ChartProjection, SortKey, SortOrder, TableRow, YearRange, decode_response, filter_by_range,
    most_recent, normalize, normalize_regional, project, sort_records, table_rows,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The dataset was replaced with this many records.
    Applied(usize),
    /// A newer refresh was issued while this one was in flight.
    Discarded,
}

/// Most recent value across historical and predicted records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Headline {
    pub year: i32,
    pub value: String,
    pub kind: String,
}

impl From<&EnergyRecord> for Headline {
    fn from(record: &EnergyRecord) -> Self {
        Self {
            year: record.year,
            value: crate::format::display_value(record.value),
            kind: record.kind_label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub table: Vec<TableRow>,
    pub chart: ChartProjection,
    pub headline: Option<Headline>,
}

#[derive(Debug, Default)]
struct Dataset {
    records: Vec<EnergyRecord>,
    range: Option<YearRange>,
}

pub struct EnergyDashboard<A: EnergyApi> {
    api: A,
    source: EnergySource,
    aliases: FieldAliases,
    retry: RetryPolicy,
    timeout: Duration,
    sequencer: RequestSequencer,
    dataset: Mutex<Dataset>,
}

impl<A: EnergyApi> EnergyDashboard<A> {
    pub fn new(
        api: A,
        source: EnergySource,
    ) -> Self {
        Self::from_config(api, source, &PipelineConfig::default())
    }

    /// Uses the configured aliases for `source`, the retry policy and the
    /// per-attempt request timeout.
    pub fn from_config(
        api: A,
        source: EnergySource,
        config: &PipelineConfig,
    ) -> Self {
        Self::with_config(
            api,
            source,
            config.aliases_for(source),
            config.retry,
            config.api.timeout(),
        )
    }

    pub fn with_config(
        api: A,
        source: EnergySource,
        aliases: FieldAliases,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            api,
            source,
            aliases,
            retry,
            timeout,
            sequencer: RequestSequencer::new(),
            dataset: Mutex::new(Dataset::default()),
        }
    }

    pub fn source(&self) -> EnergySource {
        self.source
    }

    fn dataset(&self) -> MutexGuard<'_, Dataset> {
        self.dataset.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current dataset.
    pub fn records(&self) -> Vec<EnergyRecord> {
        self.dataset().records.clone()
    }

    /// Fetches, decodes and normalizes `range`, then replaces the dataset if
    /// no newer refresh was issued in the meantime.
    pub async fn refresh(
        &self,
        range: YearRange,
    ) -> Result<RefreshOutcome, ApiError> {
        let token = self.sequencer.issue();
        debug!(source = %self.source, ?range, ?token, "refresh issued");

        let api = &self.api;
        let source = self.source;
        let timeout = self.timeout;
        let fetched = with_retry(&self.retry, "fetch predictions", move || async move {
            tokio::time::timeout(timeout, api.fetch_predictions(source, range))
                .await
                .unwrap_or(Err(ApiError::Timeout))
        })
        .await
        .and_then(|body| decode_response(&body).into_predictions());

        // Stale completions are dropped whether they succeeded or failed.
        if !self.sequencer.is_latest(token) {
            if let Err(err) = &fetched {
                warn!(source = %self.source, ?token, error = %err, "discarding stale failure");
            } else {
                warn!(source = %self.source, ?token, "discarding stale response");
            }
            return Ok(RefreshOutcome::Discarded);
        }

        let raw = fetched?;
        let records = normalize(&raw, &self.aliases);

        let mut dataset = self.dataset();
        if !self.sequencer.is_latest(token) {
            warn!(source = %self.source, ?token, "discarding stale response");
            return Ok(RefreshOutcome::Discarded);
        }
        let count = records.len();
        dataset.records = records;
        dataset.range = Some(range);
        info!(source = %self.source, count, "dataset refreshed");
        Ok(RefreshOutcome::Applied(count))
    }

    /// Table rows and chart for `range`, plus the headline over the whole
    /// dataset.
    pub fn view(
        &self,
        range: YearRange,
    ) -> DashboardView {
        let dataset = self.dataset();
        let visible = filter_by_range(&dataset.records, range.start, range.end);
        let sorted = sort_records(&visible, SortKey::Year, SortOrder::Asc);

        DashboardView {
            table: table_rows(&sorted),
            chart: project(&dataset.records, range),
            headline: most_recent(&dataset.records).map(Headline::from),
        }
    }

    pub async fn create(
        &self,
        draft: &EnergyRecordDraft,
    ) -> Result<RefreshOutcome, ApiError> {
        let body = draft_payload(self.source, draft)?;
        self.api.create_record(self.source, &body).await?;
        self.refresh_current().await
    }

    pub async fn update(
        &self,
        target: &EnergyRecord,
        draft: &EnergyRecordDraft,
    ) -> Result<RefreshOutcome, ApiError> {
        ensure_editable(target)?;
        let body = draft_payload(self.source, draft)?;
        self.api.update_record(self.source, target.year, &body).await?;
        self.refresh_current().await
    }

    pub async fn delete(
        &self,
        target: &EnergyRecord,
    ) -> Result<RefreshOutcome, ApiError> {
        ensure_editable(target)?;
        self.api.delete_record(self.source, target.year).await?;
        self.refresh_current().await
    }

    async fn refresh_current(&self) -> Result<RefreshOutcome, ApiError> {
        let range = self.dataset().range;
        match range {
            Some(range) => self.refresh(range).await,
            None => Ok(RefreshOutcome::Applied(0)),
        }
    }
}

fn ensure_editable(record: &EnergyRecord) -> Result<(), ApiError> {
    if record.is_editable() {
        Ok(())
    } else {
        Err(ApiError::Rejected(format!(
            "predicted record for {} is read-only",
            record.year
        )))
    }
}

fn rejected(errors: Vec<String>) -> ApiError {
    ApiError::Rejected(errors.join(" "))
}

/// Wire body for a historical record. Year and value are required.
pub fn draft_payload(
    source: EnergySource,
    draft: &EnergyRecordDraft,
) -> Result<Value, ApiError> {
    let mut errors = Vec::new();

    let year = parse_form_year(&draft.year);
    if draft.year.trim().is_empty() {
        errors.push("Year is required.".to_string());
    } else if year.is_none() {
        errors.push("Year must be a whole number.".to_string());
    }

    let value = parse_optional_number(&draft.value);
    if value.is_none() {
        errors.push(format!("{} is required.", source.wire_label()));
    }

    let Some(year) = year.filter(|_| errors.is_empty()) else {
        return Err(rejected(errors));
    };

    let mut body = Map::new();
    body.insert("Year".to_string(), Value::from(year));
    body.insert(source.wire_label().to_string(), number_or_null(value));
    body.insert(
        "Non-Renewable Energy (GWh)".to_string(),
        number_or_null(parse_optional_number(&draft.non_renewable_energy)),
    );
    body.insert(
        "Population (in millions)".to_string(),
        number_or_null(parse_optional_number(&draft.population)),
    );
    body.insert(
        "Gross Domestic Product".to_string(),
        number_or_null(parse_optional_number(&draft.gdp)),
    );
    Ok(Value::Object(body))
}

/// Lists regional records with retry.
pub async fn fetch_regional<A: EnergyApi + ?Sized>(
    api: &A,
    keys: &RegionalKeys,
    retry: &RetryPolicy,
) -> Result<Vec<RegionalRecord>, ApiError> {
    let raw = with_retry(retry, "list regional", move || api.list_regional()).await?;
    Ok(normalize_regional(&raw, keys))
}

/// Submits a regional form, creating or updating depending on whether it
/// was loaded from an existing record. Totals are recomputed on the way out.
pub async fn submit_regional<A: EnergyApi + ?Sized>(
    api: &A,
    form: &RegionalForm,
    keys: &RegionalKeys,
) -> Result<Value, ApiError> {
    let body = Value::Object(form.to_payload(keys).map_err(rejected)?);
    match form.id() {
        Some(id) => api.update_regional(id, &body).await,
        None => api.create_regional(&body).await,
    }
}

pub async fn delete_regional<A: EnergyApi + ?Sized>(
    api: &A,
    record: &RegionalRecord,
) -> Result<(), ApiError> {
    let id = record
        .id
        .as_deref()
        .ok_or_else(|| ApiError::Rejected("record has not been saved yet".to_string()))?;
    api.delete_regional(id).await
}

/// Lists recommendation parameters ordered by year. Rows that do not match
/// the record shape are skipped.
pub async fn fetch_recommendations<A: EnergyApi + ?Sized>(
    api: &A,
    retry: &RetryPolicy,
) -> Result<Vec<RecommendationRecord>, ApiError> {
    let raw = with_retry(retry, "list recommendations", move || api.list_recommendations()).await?;
    let mut records: Vec<RecommendationRecord> = raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    records.sort_by_key(|r| r.year);
    Ok(records)
}

/// Creates or updates the parameters for one year.
pub async fn save_recommendation<A: EnergyApi + ?Sized>(
    api: &A,
    record: &RecommendationRecord,
) -> Result<Value, ApiError> {
    if !record.solar_cost.is_finite() || !record.meralco_rate.is_finite() {
        return Err(ApiError::Rejected(
            "solar cost and Meralco rate must be numbers".to_string(),
        ));
    }
    let body = serde_json::to_value(record)
        .map_err(|err| ApiError::Rejected(err.to_string()))?;
    match record.id.as_deref() {
        Some(id) => api.update_recommendation(id, &body).await,
        None => api.create_recommendation(&body).await,
    }
}

pub async fn delete_recommendation<A: EnergyApi + ?Sized>(
    api: &A,
    record: &RecommendationRecord,
) -> Result<(), ApiError> {
    let id = record
        .id
        .as_deref()
        .ok_or_else(|| ApiError::Rejected("record has not been saved yet".to_string()))?;
    api.delete_recommendation(id).await
}
