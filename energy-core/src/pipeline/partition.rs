//! Splits records into historical and predicted subsets by their flag.

use crate::models::EnergyRecord;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub historical: Vec<EnergyRecord>,
    pub predicted: Vec<EnergyRecord>,
}

/// Partitions on `is_predicted` alone, preserving input order in each half.
pub fn partition(records: &[EnergyRecord]) -> Partition {
    let (predicted, historical): (Vec<_>, Vec<_>) = records.iter().cloned().partition(|r| r.is_predicted);
    Partition {
        historical,
        predicted,
    }
}

/// The record with the greatest year across both subsets.
///
/// When a historical and a predicted record share the greatest year the
/// historical one wins. Between records of the same kind and year the choice
/// is unspecified.
pub fn most_recent(records: &[EnergyRecord]) -> Option<&EnergyRecord> {
    records
        .iter()
        .max_by_key(|r| (r.year, !r.is_predicted))
}
