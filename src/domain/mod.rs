//! Domain layer - Core business logic and entities

pub mod driver;
pub mod error;
pub mod mount;
pub mod path_scope;
pub mod user;

pub use driver::{
    CreateStorageError, DriverRegistry, MountLifecycle, MountedStorage, StorageDriver,
};
pub use error::DomainError;
pub use mount::{
    MountId, MountRepository, PageRequest, STATUS_WORK, Storage, StorageDetails, StoragePage,
    StorageResp,
};
pub use user::{User, UserRole};

#[cfg(test)]
pub use driver::{MockDriverRegistry, MockMountLifecycle};
#[cfg(test)]
pub use mount::MockMountRepository;
