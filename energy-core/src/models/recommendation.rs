use serde::{Deserialize, Serialize};

/// Parameters feeding the solar recommendation page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRecord {
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub year: i32,
    pub solar_cost: f64,
    pub meralco_rate: f64,
}

/// Returns a new list with `record` replacing any entry for the same year.
///
/// The result is ordered by year. An existing backend id is kept when the
/// incoming record has none.
pub fn upsert_recommendation(
    records: &[RecommendationRecord],
    record: RecommendationRecord,
) -> Vec<RecommendationRecord> {
    let mut record = record;
    let mut out: Vec<RecommendationRecord> = Vec::with_capacity(records.len() + 1);

    for existing in records {
        if existing.year == record.year {
            if record.id.is_none() {
                record.id = existing.id.clone();
            }
        } else {
            out.push(existing.clone());
        }
    }

    out.push(record);
    out.sort_by_key(|r| r.year);
    out
}
