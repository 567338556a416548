//! Driver manager - keeps live driver instances in step with the record store

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::path_scope::clean_path;
use crate::domain::{
    CreateStorageError, DomainError, DriverRegistry, MountId, MountLifecycle, MountRepository,
    MountedStorage, STATUS_WORK, Storage, StorageDriver,
};

/// Builds an uninitialized driver from its storage record
pub type DriverConstructor =
    Arc<dyn Fn(&Storage) -> Result<Arc<dyn StorageDriver>, DomainError> + Send + Sync>;

/// In-process operations layer
///
/// Owns the table of known driver types and the set of live drivers keyed by
/// mount path. Every mutation goes to the record store first and is then
/// reflected in the live set.
pub struct DriverManager {
    repository: Arc<dyn MountRepository>,
    constructors: HashMap<String, DriverConstructor>,
    mounted: RwLock<HashMap<String, Arc<MountedStorage>>>,
}

impl fmt::Debug for DriverManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverManager")
            .field("drivers", &self.driver_names())
            .finish()
    }
}

impl DriverManager {
    pub fn new(repository: Arc<dyn MountRepository>) -> Self {
        Self {
            repository,
            constructors: HashMap::new(),
            mounted: RwLock::new(HashMap::new()),
        }
    }

    /// Register a driver type under `name`
    pub fn with_driver(mut self, name: impl Into<String>, constructor: DriverConstructor) -> Self {
        self.constructors.insert(name.into(), constructor);
        self
    }

    /// Names of the registered driver types, sorted
    pub fn driver_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.constructors.keys().cloned().collect();
        names.sort();
        names
    }

    /// Mount paths with a live driver, sorted
    pub async fn mounted_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.mounted.read().await.keys().cloned().collect();
        paths.sort();
        paths
    }

    fn constructor(&self, driver: &str) -> Result<&DriverConstructor, DomainError> {
        self.constructors
            .get(driver)
            .ok_or_else(|| DomainError::validation(format!("no driver named '{}'", driver)))
    }

    async fn find_required(&self, id: MountId) -> Result<Storage, DomainError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Storage {} not found", id)))
    }

    async fn unmount(&self, mount_path: &str) -> Option<Arc<MountedStorage>> {
        self.mounted.write().await.remove(mount_path)
    }

    /// Drop the live driver at `mount_path`, if any, and forget it
    async fn drop_mounted(&self, mount_path: &str) -> Result<(), DomainError> {
        let Some(mounted) = self.mounted.read().await.get(mount_path).cloned() else {
            debug!(mount_path = %mount_path, "No live driver to drop");
            return Ok(());
        };

        mounted.drop_storage().await?;
        self.unmount(mount_path).await;
        Ok(())
    }

    async fn save_status(&self, storage: &Storage) {
        if storage.id == 0 {
            return;
        }
        if let Err(e) = self.repository.update(storage.clone()).await {
            warn!(
                id = storage.id,
                mount_path = %storage.mount_path,
                error = %e,
                "Failed to persist storage status"
            );
        }
    }
}

#[async_trait]
impl DriverRegistry for DriverManager {
    async fn get_by_mount_path(
        &self,
        mount_path: &str,
    ) -> Result<Arc<MountedStorage>, DomainError> {
        let mount_path = clean_path(mount_path);
        self.mounted
            .read()
            .await
            .get(&mount_path)
            .cloned()
            .ok_or_else(|| {
                DomainError::not_found(format!("no storage mounted at '{}'", mount_path))
            })
    }

    async fn load_storage(&self, mut storage: Storage) -> Result<(), DomainError> {
        storage.mount_path = clean_path(&storage.mount_path);
        let driver = (self.constructor(&storage.driver)?)(&storage)?;

        let result = driver.init().await;
        storage.status = match &result {
            Ok(()) => STATUS_WORK.to_string(),
            Err(e) => e.to_string(),
        };
        self.save_status(&storage).await;

        let mount_path = storage.mount_path.clone();
        self.mounted
            .write()
            .await
            .insert(mount_path.clone(), Arc::new(MountedStorage::new(storage, driver)));

        match result {
            Ok(()) => {
                info!(mount_path = %mount_path, "Storage loaded");
                Ok(())
            }
            Err(e) => {
                warn!(mount_path = %mount_path, error = %e, "Storage failed to initialize");
                Err(e)
            }
        }
    }
}

#[async_trait]
impl MountLifecycle for DriverManager {
    async fn create_storage(&self, mut storage: Storage) -> Result<MountId, CreateStorageError> {
        storage.mount_path = clean_path(&storage.mount_path);
        storage.status.clear();
        storage.touch();
        self.constructor(&storage.driver)?;

        if let Some(existing) = self
            .repository
            .find_by_mount_path(&storage.mount_path)
            .await?
        {
            return Err(DomainError::conflict(format!(
                "mount path '{}' is already used by storage {}",
                existing.mount_path, existing.id
            ))
            .into());
        }

        let id = self.repository.create(storage.clone()).await?;
        storage.id = id;

        if storage.enabled {
            self.load_storage(storage)
                .await
                .map_err(|e| CreateStorageError::new(Some(id), e))?;
        }

        Ok(id)
    }

    async fn update_storage(&self, mut storage: Storage) -> Result<(), DomainError> {
        let old = self.find_required(storage.id).await?;
        if !old.enabled {
            return Err(DomainError::validation(
                "storage is disabled, enable it first",
            ));
        }
        if old.driver != storage.driver {
            return Err(DomainError::validation("driver cannot be changed"));
        }

        // A failed drop leaves both the record and the live driver untouched
        self.drop_mounted(&old.mount_path).await?;

        storage.mount_path = clean_path(&storage.mount_path);
        storage.enabled = old.enabled;
        storage.status = old.status.clone();
        storage.touch();
        self.repository.update(storage.clone()).await?;

        self.load_storage(storage).await
    }

    async fn delete_storage(&self, id: MountId) -> Result<(), DomainError> {
        let storage = self.find_required(id).await?;

        if storage.enabled {
            self.drop_mounted(&storage.mount_path).await?;
        }

        self.repository.delete(id).await?;
        self.unmount(&storage.mount_path).await;
        Ok(())
    }

    async fn enable_storage(&self, id: MountId) -> Result<(), DomainError> {
        let mut storage = self.find_required(id).await?;
        if storage.enabled {
            return Err(DomainError::validation("storage is already enabled"));
        }

        storage.enabled = true;
        storage.touch();
        self.repository.update(storage.clone()).await?;

        self.load_storage(storage).await
    }

    async fn disable_storage(&self, id: MountId) -> Result<(), DomainError> {
        let mut storage = self.find_required(id).await?;
        if !storage.enabled {
            return Err(DomainError::validation("storage is already disabled"));
        }

        self.drop_mounted(&storage.mount_path).await?;

        storage.enabled = false;
        storage.touch();
        self.repository.update(storage).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::driver::fake::{FakeCounters, FakeDriver};
    use crate::infrastructure::mount::InMemoryMountRepository;
    use serde_json::json;

    fn manager() -> (Arc<InMemoryMountRepository>, Arc<FakeCounters>, DriverManager) {
        let repository = Arc::new(InMemoryMountRepository::new());
        let counters = Arc::new(FakeCounters::default());
        let manager = DriverManager::new(repository.clone())
            .with_driver(FakeDriver::NAME, FakeDriver::constructor(counters.clone()));
        (repository, counters, manager)
    }

    #[tokio::test]
    async fn test_create_loads_driver() {
        let (repository, counters, manager) = manager();

        let id = manager
            .create_storage(Storage::new("/drive/", "fake"))
            .await
            .unwrap();

        let stored = repository.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.mount_path, "/drive");
        assert_eq!(stored.status, STATUS_WORK);
        assert_eq!(counters.inits(), 1);

        let mounted = manager.get_by_mount_path("/drive").await.unwrap();
        assert!(mounted.is_working());
    }

    #[tokio::test]
    async fn test_create_unknown_driver() {
        let (repository, _, manager) = manager();

        let err = manager
            .create_storage(Storage::new("/drive", "ftp"))
            .await
            .unwrap_err();

        assert!(err.id.is_none());
        assert!(matches!(err.source, DomainError::Validation { .. }));
        assert!(repository.list_enabled().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_init_failure_keeps_record() {
        let (repository, _, manager) = manager();

        let err = manager
            .create_storage(
                Storage::new("/broken", "fake").with_addition(json!({ "init_error": "bad token" })),
            )
            .await
            .unwrap_err();

        let id = err.id.expect("id is surfaced");
        let stored = repository.find_by_id(id).await.unwrap().unwrap();
        assert!(stored.status.contains("bad token"));

        let mounted = manager.get_by_mount_path("/broken").await.unwrap();
        assert!(!mounted.is_working());
        assert!(matches!(
            mounted.details().await,
            Err(DomainError::StorageNotInitialized { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_duplicate_mount_path() {
        let (repository, counters, manager) = manager();
        manager
            .create_storage(Storage::new("/drive", "fake"))
            .await
            .unwrap();

        let err = manager
            .create_storage(Storage::new("/drive/", "fake"))
            .await
            .unwrap_err();

        assert!(err.id.is_none());
        assert!(matches!(err.source, DomainError::Conflict { .. }));
        assert_eq!(repository.list_enabled().await.unwrap().len(), 1);
        assert_eq!(counters.inits(), 1);
    }

    #[tokio::test]
    async fn test_create_disabled_does_not_load() {
        let (_, counters, manager) = manager();

        manager
            .create_storage(Storage::new("/off", "fake").with_enabled(false))
            .await
            .unwrap();

        assert_eq!(counters.inits(), 0);
        assert!(manager.get_by_mount_path("/off").await.is_err());
    }

    #[tokio::test]
    async fn test_update_moves_driver() {
        let (repository, counters, manager) = manager();
        let id = manager
            .create_storage(Storage::new("/old", "fake"))
            .await
            .unwrap();

        let mut storage = repository.find_by_id(id).await.unwrap().unwrap();
        storage.mount_path = "/new".to_string();
        manager.update_storage(storage).await.unwrap();

        assert_eq!(counters.drops(), 1);
        assert_eq!(counters.inits(), 2);
        assert_eq!(manager.mounted_paths().await, vec!["/new".to_string()]);
    }

    #[tokio::test]
    async fn test_update_keeps_old_driver_when_drop_fails() {
        let (repository, _, manager) = manager();
        let id = manager
            .create_storage(
                Storage::new("/old", "fake").with_addition(json!({ "drop_error": "busy" })),
            )
            .await
            .unwrap();

        let mut storage = repository.find_by_id(id).await.unwrap().unwrap();
        storage.mount_path = "/new".to_string();
        let result = manager.update_storage(storage).await;

        assert!(matches!(result, Err(DomainError::Driver { .. })));
        let stored = repository.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.mount_path, "/old");
        assert_eq!(manager.mounted_paths().await, vec!["/old".to_string()]);
    }

    #[tokio::test]
    async fn test_update_disabled_is_refused() {
        let (repository, _, manager) = manager();
        let id = manager
            .create_storage(Storage::new("/off", "fake").with_enabled(false))
            .await
            .unwrap();

        let storage = repository.find_by_id(id).await.unwrap().unwrap();
        let result = manager.update_storage(storage).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_delete_drops_and_removes() {
        let (repository, counters, manager) = manager();
        let id = manager
            .create_storage(Storage::new("/drive", "fake"))
            .await
            .unwrap();

        manager.delete_storage(id).await.unwrap();

        assert_eq!(counters.drops(), 1);
        assert!(repository.find_by_id(id).await.unwrap().is_none());
        assert!(manager.mounted_paths().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_aborts_when_drop_fails() {
        let (repository, _, manager) = manager();
        let id = manager
            .create_storage(
                Storage::new("/sticky", "fake").with_addition(json!({ "drop_error": "busy" })),
            )
            .await
            .unwrap();

        assert!(manager.delete_storage(id).await.is_err());
        assert!(repository.find_by_id(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let (_, _, manager) = manager();
        let result = manager.delete_storage(42).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_disable_then_enable() {
        let (repository, counters, manager) = manager();
        let id = manager
            .create_storage(Storage::new("/drive", "fake"))
            .await
            .unwrap();

        manager.disable_storage(id).await.unwrap();
        assert!(!repository.find_by_id(id).await.unwrap().unwrap().enabled);
        assert!(manager.mounted_paths().await.is_empty());
        assert_eq!(counters.drops(), 1);

        let again = manager.disable_storage(id).await;
        assert!(matches!(again, Err(DomainError::Validation { .. })));

        manager.enable_storage(id).await.unwrap();
        assert!(repository.find_by_id(id).await.unwrap().unwrap().enabled);
        assert_eq!(manager.mounted_paths().await, vec!["/drive".to_string()]);

        let again = manager.enable_storage(id).await;
        assert!(matches!(again, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_load_replaces_live_entry() {
        let (_, _, manager) = manager();

        manager
            .load_storage(Storage::new("/drive", "fake"))
            .await
            .unwrap();
        manager
            .load_storage(Storage::new("/drive", "fake").with_order(5))
            .await
            .unwrap();

        let mounted = manager.get_by_mount_path("/drive").await.unwrap();
        assert_eq!(mounted.storage().order, 5);
        assert_eq!(manager.mounted_paths().await.len(), 1);
    }
}
