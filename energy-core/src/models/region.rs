use std::fmt;

use serde::{Deserialize, Serialize};

/// Visayas grid subdivisions whose totals roll up into the Visayas total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    Cebu,
    Negros,
    Panay,
    LeyteSamar,
    Bohol,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Self::Cebu,
        Self::Negros,
        Self::Panay,
        Self::LeyteSamar,
        Self::Bohol,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cebu => "Cebu",
            Self::Negros => "Negros",
            Self::Panay => "Panay",
            Self::LeyteSamar => "Leyte-Samar",
            Self::Bohol => "Bohol",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}
