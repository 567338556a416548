//! Mount Registry
//!
//! Management plane for storage mounts:
//! - Tenant-scoped CRUD over storage records
//! - Bounded-time aggregation of driver details
//! - Background reload of every enabled driver

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use config::{AuthConfig, StorageBackend};
use domain::MountRepository;
use infrastructure::{
    auth::{JwtConfig, JwtService},
    driver::{DriverManager, LocalDriver},
    mount::{InMemoryMountRepository, PostgresConfig, PostgresMountRepository},
};
use tracing::{info, warn};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state and start loading enabled storages
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let repository = create_repository(config).await?;

    let drivers = Arc::new(
        DriverManager::new(repository.clone())
            .with_driver(LocalDriver::NAME, LocalDriver::constructor()),
    );
    info!(drivers = ?drivers.driver_names(), "Driver manager ready");

    let jwt_service = Arc::new(JwtService::new(jwt_config(&config.auth, true)?));
    let state = AppState::new(&config.storage, repository, drivers, jwt_service);

    // Readiness flips once this finishes
    state.reload_coordinator.load_enabled().await?;

    Ok(state)
}

async fn create_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn MountRepository>> {
    info!(backend = ?config.storage.backend, "Storage record backend");

    match config.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryMountRepository::new())),
        StorageBackend::Postgres => {
            let url = config
                .storage
                .database_url
                .clone()
                .or_else(|| std::env::var("DATABASE_URL").ok())
                .ok_or_else(|| {
                    anyhow::anyhow!("storage.database_url or DATABASE_URL is required for postgres")
                })?;

            info!("Connecting to PostgreSQL...");
            let repository = PostgresMountRepository::connect(&PostgresConfig::new(url)).await?;
            info!("PostgreSQL connection established");
            Ok(Arc::new(repository))
        }
    }
}

/// Resolve the signing secret: config, then `JWT_SECRET`, then (if allowed) a random one
pub fn jwt_config(auth: &AuthConfig, allow_random: bool) -> anyhow::Result<JwtConfig> {
    let secret = auth
        .jwt_secret
        .clone()
        .or_else(|| std::env::var("JWT_SECRET").ok())
        .filter(|secret| !secret.is_empty());

    match secret {
        Some(secret) => Ok(JwtConfig::new(secret, auth.jwt_expiration_hours)),
        None if allow_random => {
            warn!("No JWT secret configured, using a random one; tokens will not survive a restart");
            Ok(JwtConfig::with_random_secret(auth.jwt_expiration_hours))
        }
        None => Err(anyhow::anyhow!(
            "auth.jwt_secret or JWT_SECRET must be set to issue tokens"
        )),
    }
}
