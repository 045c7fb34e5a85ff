//! Inclusive year-window filter shared by the table and the chart.

use serde::{Deserialize, Serialize};

use crate::models::{EnergyRecord, RecommendationRecord, RegionalRecord};

/// Anything keyed by a year.
pub trait Yearly {
    fn year(&self) -> i32;
}

impl Yearly for EnergyRecord {
    fn year(&self) -> i32 {
        self.year
    }
}

impl Yearly for RegionalRecord {
    fn year(&self) -> i32 {
        self.year
    }
}

impl Yearly for RecommendationRecord {
    fn year(&self) -> i32 {
        self.year
    }
}

/// An inclusive `[start, end]` window. `start > end` is kept as given and
/// matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(
        start: i32,
        end: i32,
    ) -> Self {
        Self { start, end }
    }

    /// Coerces user-entered bounds to integers. `None` if either is not one.
    pub fn parse(
        start: &str,
        end: &str,
    ) -> Option<Self> {
        let start = start.trim().parse().ok()?;
        let end = end.trim().parse().ok()?;
        Some(Self { start, end })
    }

    pub fn contains(
        &self,
        year: i32,
    ) -> bool {
        self.start <= year && year <= self.end
    }
}

/// Records with `start <= year <= end`, in input order, as a new vector.
pub fn filter_by_range<T: Yearly + Clone>(
    records: &[T],
    start: i32,
    end: i32,
) -> Vec<T> {
    let range = YearRange::new(start, end);
    records
        .iter()
        .filter(|r| range.contains(r.year()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(year: i32) -> EnergyRecord {
        EnergyRecord {
            year,
            value: None,
            is_predicted: false,
            id: format!("r{year}"),
            non_renewable_energy: None,
            population: None,
            gdp: None,
        }
    }

    fn years(records: &[EnergyRecord]) -> Vec<i32> {
        records.iter().map(|r| r.year).collect()
    }

    #[test]
    fn filter_is_inclusive_on_both_ends() {
        let records: Vec<_> = (2018..=2024).map(record).collect();

        assert_eq!(years(&filter_by_range(&records, 2019, 2021)), vec![2019, 2020, 2021]);
    }

    #[test]
    fn single_year_window_returns_that_year() {
        let records = vec![record(2020), record(2021), record(2020)];

        assert_eq!(years(&filter_by_range(&records, 2020, 2020)), vec![2020, 2020]);
    }

    #[test]
    fn inverted_window_is_empty() {
        let records: Vec<_> = (2015..=2035).map(record).collect();

        assert!(filter_by_range(&records, 2030, 2020).is_empty());
    }

    #[test]
    fn filter_does_not_touch_input() {
        let records = vec![record(2010), record(2020)];

        let filtered = filter_by_range(&records, 2015, 2025);

        assert_eq!(records.len(), 2);
        assert_eq!(years(&filtered), vec![2020]);
    }

    #[test]
    fn parse_coerces_bounds() {
        assert_eq!(YearRange::parse(" 2020", "2030 "), Some(YearRange::new(2020, 2030)));
        assert_eq!(YearRange::parse("2020", "soon"), None);
    }
}
