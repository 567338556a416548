//! Reload coordinator - tears down and re-initializes every enabled storage

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use super::load_gate::LoadGate;
use crate::domain::{DomainError, DriverRegistry, MountRepository, Storage};

pub struct ReloadCoordinator {
    repository: Arc<dyn MountRepository>,
    registry: Arc<dyn DriverRegistry>,
    gate: LoadGate,
}

impl std::fmt::Debug for ReloadCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadCoordinator")
            .field("gate", &self.gate.state())
            .finish()
    }
}

impl ReloadCoordinator {
    pub fn new(
        repository: Arc<dyn MountRepository>,
        registry: Arc<dyn DriverRegistry>,
        gate: LoadGate,
    ) -> Self {
        Self {
            repository,
            registry,
            gate,
        }
    }

    pub fn gate(&self) -> &LoadGate {
        &self.gate
    }

    /// Snapshot the enabled storages and reload them in the background.
    ///
    /// Only the snapshot read can fail; once it succeeds the gate is in
    /// `Loading` and stays there until every storage of this and any
    /// overlapping pass has been attempted.
    pub async fn reload_all(&self) -> Result<JoinHandle<()>, DomainError> {
        let storages = self.repository.list_enabled().await?;
        let pass = self.gate.begin_loading();
        info!(count = storages.len(), "Reloading storages");

        let registry = self.registry.clone();

        Ok(tokio::spawn(async move {
            for storage in storages {
                let mount_path = storage.mount_path.clone();
                match reload_one(registry.as_ref(), storage).await {
                    Ok(()) => info!(mount_path = %mount_path, "Storage reloaded"),
                    Err(e) => error!(mount_path = %mount_path, error = %e, "Failed to reload storage"),
                }
            }
            drop(pass);
        }))
    }

    /// Initial load at startup: bring up every enabled storage, nothing to drop
    pub async fn load_enabled(&self) -> Result<JoinHandle<()>, DomainError> {
        let storages = self.repository.list_enabled().await?;
        let pass = self.gate.begin_loading();

        let registry = self.registry.clone();

        Ok(tokio::spawn(async move {
            let total = storages.len();
            let mut failed = 0usize;
            for storage in storages {
                let mount_path = storage.mount_path.clone();
                if let Err(e) = registry.load_storage(storage).await {
                    failed += 1;
                    error!(mount_path = %mount_path, error = %e, "Failed to load storage");
                }
            }
            info!(total, failed, "Storages loaded");
            drop(pass);
        }))
    }
}

async fn reload_one(registry: &dyn DriverRegistry, storage: Storage) -> Result<(), DomainError> {
    let mounted = registry.get_by_mount_path(&storage.mount_path).await?;
    mounted.drop_storage().await?;
    registry.load_storage(storage).await
}
