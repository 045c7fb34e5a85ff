//! Chart projection and least-squares trend line.
//!
//! Historical and predicted points share one series. The trend is fitted on
//! historical points only and then evaluated across every year in the series
//! so it extends through the predicted region.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::EnergyRecord;
use crate::pipeline::range::YearRange;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub year: i32,
    pub value: Option<f64>,
    pub is_predicted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub year: i32,
    pub value: f64,
}

/// `value = slope * year + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    pub fn at(
        &self,
        year: i32,
    ) -> f64 {
        self.slope * f64::from(year) + self.intercept
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartProjection {
    pub points: Vec<ChartPoint>,
    /// Empty when there is not enough historical data for a fit.
    pub trend: Vec<TrendPoint>,
    pub fit: Option<LinearTrend>,
}

/// Ordinary least-squares fit over the historical points with a value.
///
/// Returns `None` with fewer than two such points, or when they all share one
/// year (the slope would be undefined).
pub fn fit_trend(points: &[ChartPoint]) -> Option<LinearTrend> {
    let samples: Vec<(f64, f64)> = points
        .iter()
        .filter(|p| !p.is_predicted)
        .filter_map(|p| {
            p.value
                .filter(|v| v.is_finite())
                .map(|v| (f64::from(p.year), v))
        })
        .collect();

    if samples.len() < 2 {
        return None;
    }

    let n = samples.len() as f64;
    let mean_x = samples.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = samples.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (sxy, sxx) = samples.iter().fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
        let dx = x - mean_x;
        (sxy + dx * (y - mean_y), sxx + dx * dx)
    });

    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    (slope.is_finite() && intercept.is_finite()).then_some(LinearTrend { slope, intercept })
}

/// Projects records inside `range` onto chart points ordered by year and
/// derives the trend line.
pub fn project(
    records: &[EnergyRecord],
    range: YearRange,
) -> ChartProjection {
    let mut points: Vec<ChartPoint> = records
        .iter()
        .filter(|r| range.contains(r.year))
        .map(|r| ChartPoint {
            year: r.year,
            value: r.value,
            is_predicted: r.is_predicted,
        })
        .collect();
    points.sort_by_key(|p| p.year);

    let fit = fit_trend(&points);
    let trend = match fit {
        Some(line) => points
            .iter()
            .map(|p| p.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|year| TrendPoint {
                year,
                value: line.at(year),
            })
            .collect(),
        None => Vec::new(),
    };

    ChartProjection { points, trend, fit }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn point(
        year: i32,
        value: f64,
        is_predicted: bool,
    ) -> ChartPoint {
        ChartPoint {
            year,
            value: Some(value),
            is_predicted,
        }
    }

    fn record(
        year: i32,
        value: Option<f64>,
        is_predicted: bool,
    ) -> EnergyRecord {
        EnergyRecord {
            year,
            value,
            is_predicted,
            id: format!("{year}-{is_predicted}"),
            non_renewable_energy: None,
            population: None,
            gdp: None,
        }
    }

    // =========================================================================
    // fit_trend tests
    // =========================================================================

    #[test]
    fn fit_trend_is_exact_on_linear_data() {
        let points = vec![
            point(2020, 10.0, false),
            point(2021, 20.0, false),
            point(2022, 30.0, false),
        ];

        let fit = fit_trend(&points).expect("three points fit");

        assert_eq!(fit.slope, 10.0);
        assert_eq!(fit.intercept, -20190.0);
        assert_eq!(fit.at(2023), 40.0);
    }

    #[test]
    fn fit_trend_ignores_predicted_points() {
        let points = vec![
            point(2020, 10.0, false),
            point(2021, 20.0, false),
            point(2022, 1000.0, true),
        ];

        let fit = fit_trend(&points).expect("two historical points fit");

        assert_eq!(fit.slope, 10.0);
    }

    #[test]
    fn fit_trend_needs_two_historical_points() {
        assert_eq!(fit_trend(&[]), None);
        assert_eq!(fit_trend(&[point(2020, 1.0, false), point(2030, 9.0, true)]), None);
    }

    #[test]
    fn fit_trend_rejects_single_distinct_year() {
        let points = vec![point(2020, 1.0, false), point(2020, 5.0, false)];

        assert_eq!(fit_trend(&points), None);
    }

    #[test]
    fn fit_trend_skips_null_values() {
        let points = vec![
            point(2020, 10.0, false),
            ChartPoint {
                year: 2021,
                value: None,
                is_predicted: false,
            },
        ];

        assert_eq!(fit_trend(&points), None);
    }

    // =========================================================================
    // project tests
    // =========================================================================

    #[test]
    fn project_orders_points_by_year() {
        let records = vec![
            record(2026, Some(5.0), true),
            record(2020, Some(1.0), false),
            record(2022, None, false),
        ];

        let projection = project(&records, YearRange::new(2000, 2100));

        let years: Vec<_> = projection.points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2020, 2022, 2026]);
    }

    #[test]
    fn project_trend_extends_through_predicted_years() {
        let records = vec![
            record(2020, Some(10.0), false),
            record(2021, Some(20.0), false),
            record(2022, Some(30.0), false),
            record(2022, Some(31.0), true),
            record(2024, Some(55.0), true),
        ];

        let projection = project(&records, YearRange::new(2020, 2024));

        assert_eq!(
            projection.trend,
            vec![
                TrendPoint { year: 2020, value: 10.0 },
                TrendPoint { year: 2021, value: 20.0 },
                TrendPoint { year: 2022, value: 30.0 },
                TrendPoint { year: 2024, value: 50.0 },
            ]
        );
    }

    #[test]
    fn project_respects_range() {
        let records = vec![
            record(2010, Some(1.0), false),
            record(2020, Some(2.0), false),
            record(2021, Some(3.0), false),
        ];

        let projection = project(&records, YearRange::new(2015, 2025));

        assert_eq!(projection.points.len(), 2);
        assert_eq!(projection.fit.map(|f| f.slope), Some(1.0));
    }

    #[test]
    fn project_with_one_historical_point_has_empty_trend() {
        let records = vec![record(2020, Some(100.0), false), record(2025, Some(150.0), true)];

        let projection = project(&records, YearRange::new(2020, 2025));

        assert_eq!(projection.points.len(), 2);
        assert!(projection.trend.is_empty());
        assert!(projection.trend.iter().all(|t| t.value.is_finite()));
    }
}
