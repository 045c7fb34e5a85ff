mod energy_record;
mod energy_source;
mod recommendation;
mod region;
mod regional_record;

pub use energy_record::{EnergyRecord, EnergyRecordDraft};
pub use energy_source::EnergySource;
pub use recommendation::{RecommendationRecord, upsert_recommendation};
pub use region::Region;
pub use regional_record::{RegionBreakdown, RegionalRecord};
