//! Regional generation aggregator for the Visayas peer-to-peer form.
//!
//! Every derived figure is a pure function of the leaf inputs and is rebuilt
//! in full on each change. There is no incremental bookkeeping.
//!
//! # Derivation order
//!
//! | Stage | Value | Formula |
//! |-------|-------|---------|
//! | 1 | leaf sources | geothermal, hydro, biomass, solar, wind, non-renewable |
//! | 2 | region renewable total | geothermal + hydro + biomass + solar + wind |
//! | 3 | region total | stage 2 + non-renewable |
//! | 4 | grand total | sum of stage 3 over all regions |
//!
//! Each stage reads only values produced by earlier stages of the same pass.
//!
//! # Example
//!
//! ```
//! use energy_core::calculations::{RegionalForm, recompute_all};
//! use energy_core::{EnergySource, Region};
//!
//! let mut form = RegionalForm::new();
//! form.set_year("2024");
//! form.set_source(Region::Cebu, EnergySource::Solar, "12.5");
//! form.set_source(Region::Cebu, EnergySource::Wind, "2.5");
//! form.set_non_renewable(Region::Cebu, "10");
//!
//! let totals = form.totals();
//! assert_eq!(totals.regions[&Region::Cebu].renewable_total, "15.00");
//! assert_eq!(totals.regions[&Region::Cebu].total, "25.00");
//! assert_eq!(totals.grand_total, "25.00");
//! assert_eq!(recompute_all(form.inputs()), *totals);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::calculations::common::{coerce_form_number, parse_form_year, parse_optional_number};
use crate::config::RegionalKeys;
use crate::format::fixed2;
use crate::models::{EnergySource, Region, RegionBreakdown, RegionalRecord};

/// Live form strings for one region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInputs {
    pub geothermal: String,
    pub hydro: String,
    pub biomass: String,
    pub solar: String,
    pub wind: String,
    pub non_renewable: String,
}

impl RegionInputs {
    pub fn source(
        &self,
        source: EnergySource,
    ) -> &str {
        match source {
            EnergySource::Geothermal => &self.geothermal,
            EnergySource::Hydro => &self.hydro,
            EnergySource::Biomass => &self.biomass,
            EnergySource::Solar => &self.solar,
            EnergySource::Wind => &self.wind,
        }
    }

    fn source_mut(
        &mut self,
        source: EnergySource,
    ) -> &mut String {
        match source {
            EnergySource::Geothermal => &mut self.geothermal,
            EnergySource::Hydro => &mut self.hydro,
            EnergySource::Biomass => &mut self.biomass,
            EnergySource::Solar => &mut self.solar,
            EnergySource::Wind => &mut self.wind,
        }
    }

    fn from_breakdown(breakdown: &RegionBreakdown) -> Self {
        let text = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        Self {
            geothermal: text(breakdown.geothermal),
            hydro: text(breakdown.hydro),
            biomass: text(breakdown.biomass),
            solar: text(breakdown.solar),
            wind: text(breakdown.wind),
            non_renewable: text(breakdown.non_renewable),
        }
    }

    fn to_breakdown(&self) -> RegionBreakdown {
        let mut breakdown = RegionBreakdown {
            non_renewable: parse_optional_number(&self.non_renewable),
            ..RegionBreakdown::default()
        };
        for source in EnergySource::ALL {
            breakdown.set_source(source, parse_optional_number(self.source(source)));
        }
        breakdown
    }
}

/// All leaf inputs of the regional form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalInputs {
    pub year: String,
    pub regions: BTreeMap<Region, RegionInputs>,
    pub consumption: String,
}

impl Default for RegionalInputs {
    fn default() -> Self {
        Self {
            year: String::new(),
            regions: Region::ALL
                .into_iter()
                .map(|region| (region, RegionInputs::default()))
                .collect(),
            consumption: String::new(),
        }
    }
}

/// Unformatted sums for one region.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegionSums {
    pub renewable: f64,
    pub total: f64,
}

/// Unformatted sums for the whole grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridSums {
    pub regions: BTreeMap<Region, RegionSums>,
    pub grand_total: f64,
}

/// Derived fields as stored and displayed: two-decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTotals {
    pub renewable_total: String,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalTotals {
    pub regions: BTreeMap<Region, RegionTotals>,
    pub grand_total: String,
}

impl From<&GridSums> for RegionalTotals {
    fn from(sums: &GridSums) -> Self {
        Self {
            regions: sums
                .regions
                .iter()
                .map(|(region, s)| {
                    (
                        *region,
                        RegionTotals {
                            renewable_total: fixed2(s.renewable),
                            total: fixed2(s.total),
                        },
                    )
                })
                .collect(),
            grand_total: fixed2(sums.grand_total),
        }
    }
}

/// Stage 2 and 3 for one region.
fn region_sums(
    sources: [f64; 5],
    non_renewable: f64,
) -> RegionSums {
    let renewable: f64 = sources.iter().sum();
    RegionSums {
        renewable,
        total: renewable + non_renewable,
    }
}

/// Stage 4 over already-computed region sums.
fn grid_sums(regions: BTreeMap<Region, RegionSums>) -> GridSums {
    let grand_total = regions.values().map(|s| s.total).sum();
    GridSums {
        regions,
        grand_total,
    }
}

/// Recomputes every derived total from the form's leaf inputs.
///
/// Empty or non-numeric fields count as zero.
pub fn recompute_all(inputs: &RegionalInputs) -> RegionalTotals {
    let regions = Region::ALL
        .into_iter()
        .map(|region| {
            let sums = match inputs.regions.get(&region) {
                Some(r) => region_sums(
                    EnergySource::ALL.map(|source| coerce_form_number(r.source(source))),
                    coerce_form_number(&r.non_renewable),
                ),
                None => RegionSums::default(),
            };
            (region, sums)
        })
        .collect();

    RegionalTotals::from(&grid_sums(regions))
}

/// Computes the totals of a stored record. Missing values count as zero and
/// any totals the backend sent are ignored.
pub fn record_sums(record: &RegionalRecord) -> GridSums {
    let regions = Region::ALL
        .into_iter()
        .map(|region| {
            let sums = match record.region(region) {
                Some(b) => region_sums(
                    EnergySource::ALL.map(|source| b.source(source).unwrap_or(0.0)),
                    b.non_renewable.unwrap_or(0.0),
                ),
                None => RegionSums::default(),
            };
            (region, sums)
        })
        .collect();

    grid_sums(regions)
}

/// Reactive form state: leaf inputs plus totals that are always current.
///
/// Every setter mutates one leaf and recomputes before returning, so no
/// caller can observe a partially updated set of totals.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionalForm {
    id: Option<String>,
    inputs: RegionalInputs,
    totals: RegionalTotals,
}

impl Default for RegionalForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionalForm {
    pub fn new() -> Self {
        Self::with_inputs(None, RegionalInputs::default())
    }

    fn with_inputs(
        id: Option<String>,
        inputs: RegionalInputs,
    ) -> Self {
        let totals = recompute_all(&inputs);
        Self { id, inputs, totals }
    }

    /// Loads an existing record for editing.
    pub fn from_record(record: &RegionalRecord) -> Self {
        let regions = Region::ALL
            .into_iter()
            .map(|region| {
                let inputs = record
                    .region(region)
                    .map(RegionInputs::from_breakdown)
                    .unwrap_or_default();
                (region, inputs)
            })
            .collect();

        let inputs = RegionalInputs {
            year: record.year.to_string(),
            regions,
            consumption: record.consumption.map(|v| v.to_string()).unwrap_or_default(),
        };
        Self::with_inputs(record.id.clone(), inputs)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn inputs(&self) -> &RegionalInputs {
        &self.inputs
    }

    pub fn totals(&self) -> &RegionalTotals {
        &self.totals
    }

    pub fn set_year(
        &mut self,
        year: impl Into<String>,
    ) {
        self.inputs.year = year.into();
        self.recompute();
    }

    pub fn set_consumption(
        &mut self,
        value: impl Into<String>,
    ) {
        self.inputs.consumption = value.into();
        self.recompute();
    }

    pub fn set_source(
        &mut self,
        region: Region,
        source: EnergySource,
        value: impl Into<String>,
    ) {
        *self.inputs.regions.entry(region).or_default().source_mut(source) = value.into();
        self.recompute();
    }

    pub fn set_non_renewable(
        &mut self,
        region: Region,
        value: impl Into<String>,
    ) {
        self.inputs.regions.entry(region).or_default().non_renewable = value.into();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.totals = recompute_all(&self.inputs);
        debug!(grand_total = %self.totals.grand_total, "regional totals recomputed");
    }

    /// Validates that the form can be submitted.
    ///
    /// Rules:
    /// - year is required
    /// - year must be a whole number
    pub fn validate_for_submit(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.inputs.year.trim().is_empty() {
            errors.push("Year is required.".to_string());
        } else if parse_form_year(&self.inputs.year).is_none() {
            errors.push("Year must be a whole number.".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Converts the form into a record. Totals are not part of a record.
    pub fn to_record(&self) -> Result<RegionalRecord, Vec<String>> {
        self.validate_for_submit()?;
        let year = parse_form_year(&self.inputs.year)
            .ok_or_else(|| vec!["Year must be a whole number.".to_string()])?;

        Ok(RegionalRecord {
            id: self.id.clone(),
            year,
            regions: self
                .inputs
                .regions
                .iter()
                .map(|(region, inputs)| (*region, inputs.to_breakdown()))
                .collect(),
            consumption: parse_optional_number(&self.inputs.consumption),
        })
    }

    /// Builds the wire body for `/api/peertopeer/records`.
    ///
    /// Totals are recomputed here rather than taken from `self.totals`.
    pub fn to_payload(
        &self,
        keys: &RegionalKeys,
    ) -> Result<Map<String, Value>, Vec<String>> {
        let record = self.to_record()?;
        let totals = recompute_all(&self.inputs);
        Ok(record_payload(&record, &totals, keys))
    }
}

pub(crate) fn number_or_null(value: Option<f64>) -> Value {
    value
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn record_payload(
    record: &RegionalRecord,
    totals: &RegionalTotals,
    keys: &RegionalKeys,
) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert(keys.year_key.clone(), Value::from(record.year));

    for region in Region::ALL {
        let breakdown = record.region(region).cloned().unwrap_or_default();
        for source in EnergySource::ALL {
            body.insert(keys.source(region, source), number_or_null(breakdown.source(source)));
        }
        body.insert(keys.non_renewable(region), number_or_null(breakdown.non_renewable));

        if let Some(region_totals) = totals.regions.get(&region) {
            body.insert(
                keys.renewable_total(region),
                Value::from(region_totals.renewable_total.clone()),
            );
            body.insert(keys.region_total(region), Value::from(region_totals.total.clone()));
        }
    }

    body.insert(keys.grand_total(), Value::from(totals.grand_total.clone()));
    body.insert(keys.consumption(), number_or_null(record.consumption));
    body
}
