//! Local filesystem driver

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use sysinfo::Disks;

use super::manager::DriverConstructor;
use crate::domain::{DomainError, Storage, StorageDetails, StorageDriver};

#[derive(Debug, Deserialize)]
struct LocalAddition {
    root_folder_path: String,
}

/// Serves a directory of the host filesystem
#[derive(Debug)]
pub struct LocalDriver {
    root: PathBuf,
}

impl LocalDriver {
    pub const NAME: &'static str = "local";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Build from a storage record's `addition`
    pub fn from_storage(storage: &Storage) -> Result<Self, DomainError> {
        let addition: LocalAddition = serde_json::from_value(storage.addition.clone())
            .map_err(|e| DomainError::validation(format!("invalid local addition: {}", e)))?;

        if addition.root_folder_path.trim().is_empty() {
            return Err(DomainError::validation("root_folder_path is required"));
        }

        Ok(Self::new(addition.root_folder_path))
    }

    pub fn constructor() -> DriverConstructor {
        Arc::new(|storage: &Storage| {
            Ok(Arc::new(LocalDriver::from_storage(storage)?) as Arc<dyn StorageDriver>)
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Capacity of the disk whose mount point is the longest prefix of `root`
fn disk_details(root: &Path) -> Result<StorageDetails, DomainError> {
    let root = root
        .canonicalize()
        .map_err(|e| DomainError::driver(LocalDriver::NAME, e.to_string()))?;
    let disks = Disks::new_with_refreshed_list();

    disks
        .list()
        .iter()
        .filter(|disk| root.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len())
        .map(|disk| StorageDetails::new(disk.total_space(), disk.available_space()))
        .ok_or_else(|| {
            DomainError::driver(
                LocalDriver::NAME,
                format!("no disk found for '{}'", root.display()),
            )
        })
}

#[async_trait]
impl StorageDriver for LocalDriver {
    fn driver_name(&self) -> &'static str {
        Self::NAME
    }

    async fn init(&self) -> Result<(), DomainError> {
        let metadata = tokio::fs::metadata(&self.root).await.map_err(|e| {
            DomainError::driver(
                Self::NAME,
                format!("cannot access '{}': {}", self.root.display(), e),
            )
        })?;

        if !metadata.is_dir() {
            return Err(DomainError::driver(
                Self::NAME,
                format!("'{}' is not a directory", self.root.display()),
            ));
        }

        Ok(())
    }

    async fn drop_storage(&self) -> Result<(), DomainError> {
        Ok(())
    }

    fn supports_details(&self) -> bool {
        true
    }

    async fn details(&self) -> Result<StorageDetails, DomainError> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || disk_details(&root))
            .await
            .map_err(|e| DomainError::internal(format!("details task failed: {}", e)))?
    }
}
