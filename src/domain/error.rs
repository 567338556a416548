use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid ID format: {message}")]
    InvalidId { message: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Driver error: {driver} - {message}")]
    Driver { driver: String, message: String },

    #[error("Not implemented: {message}")]
    NotImplemented { message: String },

    #[error("Storage not initialized: {message}")]
    StorageNotInitialized { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::InvalidId {
            message: message.into(),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn driver(driver: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Driver {
            driver: driver.into(),
            message: message.into(),
        }
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::NotImplemented {
            message: message.into(),
        }
    }

    pub fn storage_not_initialized(message: impl Into<String>) -> Self {
        Self::StorageNotInitialized {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Errors a driver is expected to return from a details query when it has
    /// nothing to report. These are not worth an error log line.
    pub fn is_benign_detail_error(&self) -> bool {
        matches!(
            self,
            Self::NotImplemented { .. } | Self::StorageNotInitialized { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Storage 7 not found");
        assert_eq!(error.to_string(), "Not found: Storage 7 not found");
    }

    #[test]
    fn test_permission_denied_error() {
        let error = DomainError::permission_denied("you can only mount under /u1");
        assert_eq!(
            error.to_string(),
            "Permission denied: you can only mount under /u1"
        );
    }

    #[test]
    fn test_driver_error() {
        let error = DomainError::driver("local", "root folder missing");
        assert_eq!(error.to_string(), "Driver error: local - root folder missing");
    }

    #[test]
    fn test_benign_detail_errors() {
        assert!(DomainError::not_implemented("details").is_benign_detail_error());
        assert!(DomainError::storage_not_initialized("/a").is_benign_detail_error());
        assert!(!DomainError::driver("s3", "timeout").is_benign_detail_error());
        assert!(!DomainError::internal("boom").is_benign_detail_error());
    }
}
