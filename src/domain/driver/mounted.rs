//! A driver instance bound to the record it was loaded from

use std::sync::Arc;

use super::traits::StorageDriver;
use crate::domain::error::DomainError;
use crate::domain::mount::{STATUS_WORK, Storage, StorageDetails};

/// Live entry of the driver registry
#[derive(Debug, Clone)]
pub struct MountedStorage {
    storage: Storage,
    driver: Arc<dyn StorageDriver>,
}

impl MountedStorage {
    pub fn new(storage: Storage, driver: Arc<dyn StorageDriver>) -> Self {
        Self { storage, driver }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn mount_path(&self) -> &str {
        &self.storage.mount_path
    }

    /// True once the driver initialized successfully
    pub fn is_working(&self) -> bool {
        self.storage.status == STATUS_WORK
    }

    pub fn supports_details(&self) -> bool {
        self.driver.supports_details()
    }

    /// Query driver details; a storage that failed to initialize has none
    pub async fn details(&self) -> Result<StorageDetails, DomainError> {
        if !self.is_working() {
            return Err(DomainError::storage_not_initialized(format!(
                "storage '{}' is not initialized: {}",
                self.storage.mount_path, self.storage.status
            )));
        }

        self.driver.details().await
    }

    pub async fn drop_storage(&self) -> Result<(), DomainError> {
        self.driver.drop_storage().await
    }
}
