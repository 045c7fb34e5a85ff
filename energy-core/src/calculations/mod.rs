//! Form-side calculations.
//!
//! Unlike the pipeline, these operate on live form input rather than on
//! fetched records.

pub mod common;
pub mod regional;

pub use regional::{
    GridSums, RegionInputs, RegionSums, RegionTotals, RegionalForm, RegionalInputs,
    RegionalTotals, record_sums, recompute_all,
};
