//! Infrastructure services

mod detail_aggregator;
mod load_gate;
mod mount_service;
mod reload;

pub use detail_aggregator::{DEFAULT_DETAILS_BUDGET, DetailAggregator};
pub use load_gate::{LoadGate, LoadState, LoadingGuard};
pub use mount_service::{DENIED_OR_NOT_FOUND, MountListing, MountService};
pub use reload::ReloadCoordinator;
