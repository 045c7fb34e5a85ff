use serde::{Deserialize, Serialize};

/// A normalized generation data point.
///
/// `year` is unique per dataset and classification, but the same year may
/// appear once as historical and once as predicted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyRecord {
    pub year: i32,
    pub value: Option<f64>,
    pub is_predicted: bool,
    /// Backend `_id` for historical records, `predicted-{index}` otherwise.
    pub id: String,
    pub non_renewable_energy: Option<f64>,
    pub population: Option<f64>,
    pub gdp: Option<f64>,
}

impl EnergyRecord {
    /// Only historical records accept create, update and delete.
    pub fn is_editable(&self) -> bool {
        !self.is_predicted
    }

    pub fn kind_label(&self) -> &'static str {
        if self.is_predicted {
            "Predicted"
        } else {
            "Historical"
        }
    }
}

/// Form values for creating or updating a historical record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyRecordDraft {
    pub year: String,
    pub value: String,
    pub non_renewable_energy: String,
    pub population: String,
    pub gdp: String,
}
