//! Storage driver domain
//!
//! The abstraction over live backend instances and the operations layer that
//! keeps them in step with the record store.

mod mounted;
mod registry;
mod traits;

pub use mounted::MountedStorage;
pub use registry::{CreateStorageError, DriverRegistry, MountLifecycle};
pub use traits::StorageDriver;

#[cfg(test)]
pub use registry::{MockDriverRegistry, MockMountLifecycle};
