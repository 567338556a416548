//! Storage mount domain
//!
//! Records binding a path prefix of the unified namespace to a backend driver,
//! together with the paging and repository contracts used to persist them.

mod entity;
mod page;
mod repository;

pub use entity::{MountId, Storage, StorageDetails, StorageResp, STATUS_WORK};
pub use page::{PageRequest, StoragePage};
pub use repository::MountRepository;

#[cfg(test)]
pub use repository::MockMountRepository;
