//! Storage record repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{MountId, Storage};
use super::page::{PageRequest, StoragePage};
use crate::domain::error::DomainError;

/// Persistent record store for storage definitions
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MountRepository: Send + Sync {
    /// Inserts a new storage and returns the identifier the store assigned
    async fn create(&self, storage: Storage) -> Result<MountId, DomainError>;

    /// Replaces an existing storage, matched by id
    async fn update(&self, storage: Storage) -> Result<(), DomainError>;

    /// Removes a storage by id
    async fn delete(&self, id: MountId) -> Result<(), DomainError>;

    /// Finds a storage by id
    async fn find_by_id(&self, id: MountId) -> Result<Option<Storage>, DomainError>;

    /// Finds a storage by its mount path
    async fn find_by_mount_path(&self, mount_path: &str) -> Result<Option<Storage>, DomainError>;

    /// Lists one page ordered by `order` then `id`, with the total record count
    async fn list_page(&self, page: PageRequest) -> Result<StoragePage, DomainError>;

    /// Lists every enabled storage ordered by `order` then `id`
    async fn list_enabled(&self) -> Result<Vec<Storage>, DomainError>;
}
