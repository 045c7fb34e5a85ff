use async_trait::async_trait;
use serde_json::Value;

use super::error::ApiError;
use crate::models::EnergySource;
use crate::pipeline::YearRange;

/// Backend collaborator.
///
/// The transport is supplied by the embedding application. Request and
/// response bodies are JSON values in the backend's wire format; prediction
/// bodies come back as raw text because they may carry bare `NaN` tokens that
/// must be sanitized before parsing.
#[async_trait]
pub trait EnergyApi: Send + Sync {
    // Predictions and historical records
    async fn fetch_predictions(
        &self,
        source: EnergySource,
        range: YearRange,
    ) -> Result<String, ApiError>;

    async fn create_record(
        &self,
        source: EnergySource,
        body: &Value,
    ) -> Result<Value, ApiError>;

    async fn update_record(
        &self,
        source: EnergySource,
        year: i32,
        body: &Value,
    ) -> Result<Value, ApiError>;

    async fn delete_record(
        &self,
        source: EnergySource,
        year: i32,
    ) -> Result<(), ApiError>;

    // Regional records
    async fn list_regional(&self) -> Result<Vec<Value>, ApiError>;

    async fn create_regional(
        &self,
        body: &Value,
    ) -> Result<Value, ApiError>;

    async fn update_regional(
        &self,
        id: &str,
        body: &Value,
    ) -> Result<Value, ApiError>;

    async fn delete_regional(
        &self,
        id: &str,
    ) -> Result<(), ApiError>;

    // Recommendation parameters
    async fn list_recommendations(&self) -> Result<Vec<Value>, ApiError>;

    async fn create_recommendation(
        &self,
        body: &Value,
    ) -> Result<Value, ApiError>;

    async fn update_recommendation(
        &self,
        id: &str,
        body: &Value,
    ) -> Result<Value, ApiError>;

    async fn delete_recommendation(
        &self,
        id: &str,
    ) -> Result<(), ApiError>;
}
