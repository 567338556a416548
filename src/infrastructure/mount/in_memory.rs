//! In-memory storage record repository

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{DomainError, MountId, MountRepository, PageRequest, Storage, StoragePage};

#[derive(Debug, Default)]
struct Records {
    next_id: MountId,
    storages: BTreeMap<MountId, Storage>,
}

/// Thread-safe in-memory implementation of MountRepository
///
/// Useful for testing and development. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryMountRepository {
    records: RwLock<Records>,
}

impl InMemoryMountRepository {
    /// Creates a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with storages; ids are reassigned
    pub fn with_storages(storages: Vec<Storage>) -> Self {
        let repository = Self::new();
        {
            let mut records = repository
                .records
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            for mut storage in storages {
                records.next_id += 1;
                storage.id = records.next_id;
                records.storages.insert(storage.id, storage);
            }
        }
        repository
    }
}

fn sorted(storages: impl Iterator<Item = Storage>) -> Vec<Storage> {
    let mut result: Vec<Storage> = storages.collect();
    result.sort_by_key(|s| (s.order, s.id));
    result
}

#[async_trait]
impl MountRepository for InMemoryMountRepository {
    async fn create(&self, mut storage: Storage) -> Result<MountId, DomainError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        if records
            .storages
            .values()
            .any(|s| s.mount_path == storage.mount_path)
        {
            return Err(DomainError::conflict(format!(
                "Mount path '{}' is already used",
                storage.mount_path
            )));
        }

        records.next_id += 1;
        storage.id = records.next_id;
        records.storages.insert(storage.id, storage);

        Ok(records.next_id)
    }

    async fn update(&self, storage: Storage) -> Result<(), DomainError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        if !records.storages.contains_key(&storage.id) {
            return Err(DomainError::not_found(format!(
                "Storage {} not found",
                storage.id
            )));
        }

        if records
            .storages
            .values()
            .any(|s| s.id != storage.id && s.mount_path == storage.mount_path)
        {
            return Err(DomainError::conflict(format!(
                "Mount path '{}' is already used",
                storage.mount_path
            )));
        }

        records.storages.insert(storage.id, storage);
        Ok(())
    }

    async fn delete(&self, id: MountId) -> Result<(), DomainError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        if records.storages.remove(&id).is_none() {
            return Err(DomainError::not_found(format!("Storage {} not found", id)));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: MountId) -> Result<Option<Storage>, DomainError> {
        let records = self
            .records
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        Ok(records.storages.get(&id).cloned())
    }

    async fn find_by_mount_path(&self, mount_path: &str) -> Result<Option<Storage>, DomainError> {
        let records = self
            .records
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        Ok(records
            .storages
            .values()
            .find(|s| s.mount_path == mount_path)
            .cloned())
    }

    async fn list_page(&self, page: PageRequest) -> Result<StoragePage, DomainError> {
        let records = self
            .records
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        let all = sorted(records.storages.values().cloned());
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(page.offset())
            .take(page.limit().unwrap_or(usize::MAX))
            .collect();

        Ok(StoragePage { items, total })
    }

    async fn list_enabled(&self) -> Result<Vec<Storage>, DomainError> {
        let records = self
            .records
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        Ok(sorted(
            records.storages.values().filter(|s| s.enabled).cloned(),
        ))
    }
}
