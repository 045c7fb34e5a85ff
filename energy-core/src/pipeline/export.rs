//! Flat row tables handed to the document renderer.
//!
//! Rows keep the order of the input. Callers sort first.

use serde::{Deserialize, Serialize};

use crate::calculations::record_sums;
use crate::format::display_value;
use crate::models::{EnergyRecord, EnergySource, RecommendationRecord, Region, RegionalRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    fn new(
        title: impl Into<String>,
        headers: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            title: title.into(),
            headers: headers.into_iter().collect(),
            rows: Vec::new(),
        }
    }
}

/// `Year | <Source> Production (GWh) | Type`.
pub fn energy_table(
    records: &[EnergyRecord],
    source: EnergySource,
) -> ExportTable {
    let mut table = ExportTable::new(
        format!("{source} Energy Production"),
        [
            "Year".to_string(),
            format!("{source} Production (GWh)"),
            "Type".to_string(),
        ],
    );
    table.rows = records
        .iter()
        .map(|r| {
            vec![
                r.year.to_string(),
                display_value(r.value),
                r.kind_label().to_string(),
            ]
        })
        .collect();
    table
}

/// One column per region holding the recomputed region total, then the
/// Visayas total and consumption. A region with no leaf values at all is
/// missing, not zero.
pub fn regional_table(records: &[RegionalRecord]) -> ExportTable {
    let headers = std::iter::once("Year".to_string())
        .chain(Region::ALL.iter().map(|r| r.name().to_string()))
        .chain(["Visayas Total".to_string(), "Consumption".to_string()]);
    let mut table = ExportTable::new("Visayas Regional Energy", headers);

    table.rows = records
        .iter()
        .map(|record| {
            let sums = record_sums(record);
            let reported = |region: Region| {
                record
                    .region(region)
                    .is_some_and(|breakdown| !breakdown.is_empty())
            };
            let mut row = Vec::with_capacity(Region::ALL.len() + 3);
            row.push(record.year.to_string());
            row.extend(Region::ALL.iter().map(|region| {
                let total = sums.regions.get(region).map(|s| s.total);
                display_value(total.filter(|_| reported(*region)))
            }));
            let any_reported = Region::ALL.into_iter().any(reported);
            row.push(display_value(Some(sums.grand_total).filter(|_| any_reported)));
            row.push(display_value(record.consumption));
            row
        })
        .collect();
    table
}

pub fn recommendation_table(records: &[RecommendationRecord]) -> ExportTable {
    let mut table = ExportTable::new(
        "Solar Recommendation Parameters",
        ["Year", "Solar Cost", "Meralco Rate"].map(str::to_string),
    );
    table.rows = records
        .iter()
        .map(|r| {
            vec![
                r.year.to_string(),
                display_value(Some(r.solar_cost)),
                display_value(Some(r.meralco_rate)),
            ]
        })
        .collect();
    table
}
