pub mod api;
pub mod calculations;
pub mod config;
pub mod format;
pub mod models;
pub mod pipeline;

pub use api::{ApiError, EnergyApi, EnergyDashboard};
pub use config::{ConfigError, PipelineConfig};
pub use models::*;
