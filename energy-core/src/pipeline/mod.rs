//! Pure transformations from backend payloads to display-ready data.
//!
//! Nothing here holds state between calls and nothing returns an error for
//! a malformed record; bad rows are dropped or rendered as "N/A".

pub mod chart;
pub mod export;
pub mod normalize;
pub mod partition;
pub mod range;
pub mod table;

pub use chart::{ChartPoint, ChartProjection, LinearTrend, TrendPoint, fit_trend, project};
pub use export::{ExportTable, energy_table, recommendation_table, regional_table};
pub use normalize::{PredictionResponse, decode_response, normalize, normalize_regional, sanitize_payload};
pub use partition::{Partition, most_recent, partition};
pub use range::{YearRange, Yearly, filter_by_range};
pub use table::{SortKey, SortOrder, TableRow, sort_records, table_rows};
