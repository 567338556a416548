//! Application state for shared services

use std::sync::Arc;
use std::time::Duration;

use crate::config::StorageConfig;
use crate::domain::MountRepository;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::driver::DriverManager;
use crate::infrastructure::services::{DetailAggregator, LoadGate, MountService, ReloadCoordinator};

/// Application state shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub mount_service: Arc<MountService>,
    pub reload_coordinator: Arc<ReloadCoordinator>,
    pub load_gate: LoadGate,
    pub jwt_service: Arc<dyn JwtGenerator>,
}

impl AppState {
    /// Wire the services around a record store and a driver manager
    pub fn new(
        config: &StorageConfig,
        repository: Arc<dyn MountRepository>,
        drivers: Arc<DriverManager>,
        jwt_service: Arc<dyn JwtGenerator>,
    ) -> Self {
        let aggregator = DetailAggregator::new(drivers.clone())
            .with_hide_details(config.hide_details)
            .with_budget(Duration::from_millis(config.details_timeout_ms));

        let mount_service = MountService::new(repository.clone(), drivers.clone(), aggregator)
            .with_max_per_page(config.max_per_page);

        let load_gate = LoadGate::new();
        let reload_coordinator = ReloadCoordinator::new(repository, drivers, load_gate.clone());

        Self {
            mount_service: Arc::new(mount_service),
            reload_coordinator: Arc::new(reload_coordinator),
            load_gate,
            jwt_service,
        }
    }
}
