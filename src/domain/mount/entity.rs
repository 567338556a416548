//! Storage mount entity and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier assigned by the record store on creation
pub type MountId = u32;

/// Runtime status of a storage whose driver initialized successfully
pub const STATUS_WORK: &str = "work";

/// A registered storage mount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storage {
    /// Assigned by the store; ignored on create
    #[serde(default)]
    pub id: MountId,
    /// Absolute path in the unified namespace, unique across storages
    pub mount_path: String,
    /// Sort key for listings
    #[serde(default)]
    pub order: i32,
    /// Driver type name, resolved against the driver registry
    pub driver: String,
    /// Directory cache lifetime in minutes
    #[serde(default)]
    pub cache_expiration: u32,
    /// Runtime status, written by the driver layer
    #[serde(default)]
    pub status: String,
    /// Backend-specific configuration, opaque to the registry
    #[serde(default = "empty_addition")]
    pub addition: Value,
    #[serde(default)]
    pub remark: String,
    #[serde(default = "Utc::now")]
    pub modified: DateTime<Utc>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn empty_addition() -> Value {
    Value::Object(serde_json::Map::new())
}

fn default_enabled() -> bool {
    true
}

impl Storage {
    /// Create an enabled storage with empty driver configuration
    pub fn new(mount_path: impl Into<String>, driver: impl Into<String>) -> Self {
        Self {
            id: 0,
            mount_path: mount_path.into(),
            order: 0,
            driver: driver.into(),
            cache_expiration: 0,
            status: String::new(),
            addition: empty_addition(),
            remark: String::new(),
            modified: Utc::now(),
            enabled: true,
        }
    }

    pub fn with_id(mut self, id: MountId) -> Self {
        self.id = id;
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn with_addition(mut self, addition: Value) -> Self {
        self.addition = addition;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Refresh the modification timestamp
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}

/// Capacity information reported by a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDetails {
    pub total_space: u64,
    pub free_space: u64,
    pub used_space: u64,
}

impl StorageDetails {
    pub fn new(total_space: u64, free_space: u64) -> Self {
        Self {
            total_space,
            free_space,
            used_space: total_space.saturating_sub(free_space),
        }
    }
}

/// Storage as returned to a caller, optionally enriched with mount details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageResp {
    #[serde(flatten)]
    pub storage: Storage,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mount_details: Option<StorageDetails>,
}

impl StorageResp {
    pub fn new(storage: Storage, mount_details: Option<StorageDetails>) -> Self {
        Self {
            storage,
            mount_details,
        }
    }
}
