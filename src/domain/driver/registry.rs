//! Operations layer traits: live driver resolution and storage lifecycle

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use super::mounted::MountedStorage;
use crate::domain::error::DomainError;
use crate::domain::mount::{MountId, Storage};

/// Resolves and (re)loads live driver instances
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DriverRegistry: Send + Sync {
    /// Live driver currently serving `mount_path`
    async fn get_by_mount_path(&self, mount_path: &str)
    -> Result<Arc<MountedStorage>, DomainError>;

    /// Build and initialize a fresh driver from its record, replacing any
    /// instance registered under the same mount path
    async fn load_storage(&self, storage: Storage) -> Result<(), DomainError>;
}

/// Create failed; the record may already have been stored under `id`
#[derive(Debug, Error)]
#[error("{source}")]
pub struct CreateStorageError {
    pub id: Option<MountId>,
    #[source]
    pub source: DomainError,
}

impl CreateStorageError {
    pub fn new(id: Option<MountId>, source: DomainError) -> Self {
        Self { id, source }
    }
}

impl From<DomainError> for CreateStorageError {
    fn from(source: DomainError) -> Self {
        Self { id: None, source }
    }
}

/// Mutations that touch both the record store and the live driver set
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MountLifecycle: Send + Sync {
    /// Persist a new storage and bring its driver up
    async fn create_storage(&self, storage: Storage) -> Result<MountId, CreateStorageError>;

    /// Persist changes and restart the driver
    async fn update_storage(&self, storage: Storage) -> Result<(), DomainError>;

    /// Tear the driver down and remove the record
    async fn delete_storage(&self, id: MountId) -> Result<(), DomainError>;

    /// Mark enabled and bring the driver up
    async fn enable_storage(&self, id: MountId) -> Result<(), DomainError>;

    /// Tear the driver down and mark disabled
    async fn disable_storage(&self, id: MountId) -> Result<(), DomainError>;
}
