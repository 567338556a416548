//! Storage driver trait

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::mount::StorageDetails;

/// A live backend instance serving one mount
#[async_trait]
pub trait StorageDriver: Send + Sync + Debug {
    /// Driver type name, e.g. `local`
    fn driver_name(&self) -> &'static str;

    /// Prepare the backend for use
    async fn init(&self) -> Result<(), DomainError>;

    /// Release everything the backend holds. The instance is not reused afterwards.
    async fn drop_storage(&self) -> Result<(), DomainError>;

    /// Whether [`StorageDriver::details`] is meaningful for this driver
    fn supports_details(&self) -> bool {
        false
    }

    /// Capacity information for the mounted backend
    async fn details(&self) -> Result<StorageDetails, DomainError> {
        Err(DomainError::not_implemented(format!(
            "driver '{}' does not report details",
            self.driver_name()
        )))
    }
}
