//! Sorting and row shaping for the records table.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::format::display_value;
use crate::models::EnergyRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Year,
    Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub id: String,
    pub year: i32,
    pub value: String,
    pub kind: String,
    pub editable: bool,
}

/// Returns a sorted copy. Stable, and records without a value go last in
/// both directions.
pub fn sort_records(
    records: &[EnergyRecord],
    key: SortKey,
    order: SortOrder,
) -> Vec<EnergyRecord> {
    let directed = |ordering: Ordering| match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    };

    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| match key {
        SortKey::Year => directed(a.year.cmp(&b.year)),
        SortKey::Value => match (a.value, b.value) {
            (Some(x), Some(y)) => directed(x.total_cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    });
    sorted
}

pub fn table_rows(records: &[EnergyRecord]) -> Vec<TableRow> {
    records
        .iter()
        .map(|r| TableRow {
            id: r.id.clone(),
            year: r.year,
            value: display_value(r.value),
            kind: r.kind_label().to_string(),
            editable: r.is_editable(),
        })
        .collect()
}
