//! Mount service - scoped management of storage records
//!
//! Every operation takes the calling user. Admins act on the whole namespace;
//! tenants only see and touch storages under their base path and see mount
//! paths relative to it. Guests are refused outright.

use std::sync::Arc;

use tracing::debug;

use super::detail_aggregator::DetailAggregator;
use crate::domain::{
    CreateStorageError, DomainError, MountId, MountLifecycle, MountRepository, PageRequest,
    Storage, StorageDetails, StorageResp, User,
};

/// Message used whenever a tenant must not learn whether a record exists
pub const DENIED_OR_NOT_FOUND: &str = "permission denied or storage not found";

/// One page of storages as seen by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct MountListing {
    pub content: Vec<StorageResp>,
    /// Store-wide record count; for tenants it includes records they cannot see
    pub total: u64,
}

pub struct MountService {
    repository: Arc<dyn MountRepository>,
    lifecycle: Arc<dyn MountLifecycle>,
    aggregator: DetailAggregator,
    max_per_page: u32,
}

impl std::fmt::Debug for MountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountService")
            .field("aggregator", &self.aggregator)
            .field("max_per_page", &self.max_per_page)
            .finish()
    }
}

impl MountService {
    pub fn new(
        repository: Arc<dyn MountRepository>,
        lifecycle: Arc<dyn MountLifecycle>,
        aggregator: DetailAggregator,
    ) -> Self {
        Self {
            repository,
            lifecycle,
            aggregator,
            max_per_page: 0,
        }
    }

    /// Upper bound for `per_page`; zero leaves it unbounded
    pub fn with_max_per_page(mut self, max_per_page: u32) -> Self {
        self.max_per_page = max_per_page;
        self
    }

    fn ensure_manager(user: &User) -> Result<(), DomainError> {
        if user.is_guest() {
            return Err(DomainError::permission_denied(
                "guests cannot manage storages",
            ));
        }
        Ok(())
    }

    fn resolve_path(user: &User, mount_path: &str) -> Result<String, DomainError> {
        user.resolve_mount_path(mount_path).ok_or_else(|| {
            DomainError::permission_denied(format!(
                "the mount path must be under {}",
                user.base_path()
            ))
        })
    }

    /// Load a record the tenant owns, hiding whether it exists otherwise
    async fn find_owned(&self, user: &User, id: MountId) -> Result<Storage, DomainError> {
        let storage = match self.repository.find_by_id(id).await {
            Ok(Some(storage)) => storage,
            Ok(None) if user.is_admin() => {
                return Err(DomainError::not_found(format!("Storage {} not found", id)));
            }
            Ok(None) => return Err(DomainError::permission_denied(DENIED_OR_NOT_FOUND)),
            Err(e) if user.is_admin() => return Err(e),
            Err(e) => {
                debug!(id, error = %e, "Tenant lookup failed");
                return Err(DomainError::permission_denied(DENIED_OR_NOT_FOUND));
            }
        };

        if !user.can_access(&storage.mount_path) {
            return Err(DomainError::permission_denied(DENIED_OR_NOT_FOUND));
        }

        Ok(storage)
    }

    fn view(user: &User, mut storage: Storage, details: Option<StorageDetails>) -> StorageResp {
        storage.mount_path = user.view_path(&storage.mount_path);
        StorageResp::new(storage, details)
    }

    /// List one page of the storages visible to `user`, enriched with details
    pub async fn list(&self, user: &User, page: PageRequest) -> Result<MountListing, DomainError> {
        Self::ensure_manager(user)?;
        let page = page.validate(self.max_per_page);
        let result = self.repository.list_page(page).await?;

        let visible: Vec<Storage> = result
            .items
            .into_iter()
            .filter(|storage| user.can_access(&storage.mount_path))
            .collect();

        // Drivers are looked up by absolute path, so rewrite only afterwards
        let details = self.aggregator.collect(&visible).await;

        let content = visible
            .into_iter()
            .zip(details)
            .map(|(storage, details)| Self::view(user, storage, details))
            .collect();

        Ok(MountListing {
            content,
            total: result.total,
        })
    }

    /// Create a storage under the caller's subtree
    pub async fn create(
        &self,
        user: &User,
        mut storage: Storage,
    ) -> Result<MountId, CreateStorageError> {
        Self::ensure_manager(user)?;
        storage.mount_path = Self::resolve_path(user, &storage.mount_path)?;
        self.lifecycle.create_storage(storage).await
    }

    /// Update a storage; tenants may neither touch foreign storages nor move
    /// their own outside their subtree
    pub async fn update(&self, user: &User, mut storage: Storage) -> Result<(), DomainError> {
        Self::ensure_manager(user)?;

        if !user.is_admin() {
            self.find_owned(user, storage.id).await?;
        }

        storage.mount_path = Self::resolve_path(user, &storage.mount_path)?;
        self.lifecycle.update_storage(storage).await
    }

    pub async fn delete(&self, user: &User, id: MountId) -> Result<(), DomainError> {
        Self::ensure_manager(user)?;
        if !user.is_admin() {
            self.find_owned(user, id).await?;
        }
        self.lifecycle.delete_storage(id).await
    }

    pub async fn enable(&self, user: &User, id: MountId) -> Result<(), DomainError> {
        Self::ensure_manager(user)?;
        if !user.is_admin() {
            self.find_owned(user, id).await?;
        }
        self.lifecycle.enable_storage(id).await
    }

    pub async fn disable(&self, user: &User, id: MountId) -> Result<(), DomainError> {
        Self::ensure_manager(user)?;
        if !user.is_admin() {
            self.find_owned(user, id).await?;
        }
        self.lifecycle.disable_storage(id).await
    }

    /// Single storage with details, path rewritten for tenants
    pub async fn get(&self, user: &User, id: MountId) -> Result<StorageResp, DomainError> {
        Self::ensure_manager(user)?;
        let storage = self.find_owned(user, id).await?;

        let details = self
            .aggregator
            .collect(std::slice::from_ref(&storage))
            .await
            .pop()
            .flatten();

        Ok(Self::view(user, storage, details))
    }
}
