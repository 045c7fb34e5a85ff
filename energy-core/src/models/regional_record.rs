use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{EnergySource, Region};

/// Leaf inputs for one region. Totals are never stored here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionBreakdown {
    pub geothermal: Option<f64>,
    pub hydro: Option<f64>,
    pub biomass: Option<f64>,
    pub solar: Option<f64>,
    pub wind: Option<f64>,
    pub non_renewable: Option<f64>,
}

impl RegionBreakdown {
    /// True when no leaf value is present.
    pub fn is_empty(&self) -> bool {
        self.non_renewable.is_none() && EnergySource::ALL.iter().all(|s| self.source(*s).is_none())
    }

    pub fn source(
        &self,
        source: EnergySource,
    ) -> Option<f64> {
        match source {
            EnergySource::Geothermal => self.geothermal,
            EnergySource::Hydro => self.hydro,
            EnergySource::Biomass => self.biomass,
            EnergySource::Solar => self.solar,
            EnergySource::Wind => self.wind,
        }
    }

    pub fn set_source(
        &mut self,
        source: EnergySource,
        value: Option<f64>,
    ) {
        let slot = match source {
            EnergySource::Geothermal => &mut self.geothermal,
            EnergySource::Hydro => &mut self.hydro,
            EnergySource::Biomass => &mut self.biomass,
            EnergySource::Solar => &mut self.solar,
            EnergySource::Wind => &mut self.wind,
        };
        *slot = value;
    }
}

/// Peer-to-peer record: one year of per-region generation for the Visayas grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionalRecord {
    pub id: Option<String>,
    pub year: i32,
    pub regions: BTreeMap<Region, RegionBreakdown>,
    /// Visayas power consumption.
    pub consumption: Option<f64>,
}

impl RegionalRecord {
    pub fn region(
        &self,
        region: Region,
    ) -> Option<&RegionBreakdown> {
        self.regions.get(&region)
    }
}
