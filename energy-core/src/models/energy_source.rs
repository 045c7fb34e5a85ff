use std::fmt;

use serde::{Deserialize, Serialize};

/// Renewable generation sources tracked by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergySource {
    Geothermal,
    Hydro,
    Biomass,
    Solar,
    Wind,
}

impl EnergySource {
    pub const ALL: [EnergySource; 5] = [
        Self::Geothermal,
        Self::Hydro,
        Self::Biomass,
        Self::Solar,
        Self::Wind,
    ];

    /// Path segment used by `/api/predictions/{source}/`.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Geothermal => "geothermal",
            Self::Hydro => "hydropower",
            Self::Biomass => "biomass",
            Self::Solar => "solar",
            Self::Wind => "wind",
        }
    }

    /// Display name, also the source part of the regional wire keys.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Geothermal => "Geothermal",
            Self::Hydro => "Hydro",
            Self::Biomass => "Biomass",
            Self::Solar => "Solar",
            Self::Wind => "Wind",
        }
    }

    /// Key of the primary metric in historical backend records.
    pub fn wire_label(&self) -> &'static str {
        match self {
            Self::Geothermal => "Geothermal (GWh)",
            Self::Hydro => "Hydropower (GWh)",
            Self::Biomass => "Biomass (GWh)",
            Self::Solar => "Solar (GWh)",
            Self::Wind => "Wind (GWh)",
        }
    }

    /// Accepts either the slug or the display name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|source| source.slug() == needle || source.name().to_ascii_lowercase() == needle)
    }
}

impl fmt::Display for EnergySource {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}
