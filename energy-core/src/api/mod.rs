//! Backend collaborator seam.
//!
//! The crate never speaks HTTP itself. An embedding application supplies an
//! [`EnergyApi`] implementation and this module layers retry, request
//! sequencing and the dataset store on top of it.

pub mod client;
pub mod dashboard;
pub mod error;
pub mod retry;
pub mod sequencer;

pub use client::EnergyApi;
pub use dashboard::{DashboardView, EnergyDashboard, Headline, RefreshOutcome};
pub use error::ApiError;
pub use retry::with_retry;
pub use sequencer::{RequestSequencer, RequestToken};
