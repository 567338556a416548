//! Scriptable driver used by tests
//!
//! Behaviour is read from the storage's `addition`:
//! `init_error`, `drop_error` and `details_error` hold failure messages,
//! `details` holds `{ "total": .., "free": .. }`, `hang` makes details never return,
//! `init_delay_secs` makes init sleep first.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::manager::DriverConstructor;
use crate::domain::{DomainError, Storage, StorageDetails, StorageDriver};

#[derive(Debug, Default)]
pub struct FakeCounters {
    inits: AtomicUsize,
    drops: AtomicUsize,
}

impl FakeCounters {
    pub fn inits(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct FakeDriver {
    addition: Value,
    counters: Arc<FakeCounters>,
}

impl FakeDriver {
    pub const NAME: &'static str = "fake";

    pub fn new(addition: Value, counters: Arc<FakeCounters>) -> Self {
        Self { addition, counters }
    }

    pub fn constructor(counters: Arc<FakeCounters>) -> DriverConstructor {
        Arc::new(move |storage: &Storage| {
            Ok(Arc::new(FakeDriver::new(storage.addition.clone(), counters.clone()))
                as Arc<dyn StorageDriver>)
        })
    }

    fn message(&self, key: &str) -> Option<String> {
        self.addition
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[async_trait]
impl StorageDriver for FakeDriver {
    fn driver_name(&self) -> &'static str {
        Self::NAME
    }

    async fn init(&self) -> Result<(), DomainError> {
        self.counters.inits.fetch_add(1, Ordering::SeqCst);
        if let Some(secs) = self.addition.get("init_delay_secs").and_then(Value::as_u64) {
            tokio::time::sleep(Duration::from_secs(secs)).await;
        }
        match self.message("init_error") {
            Some(message) => Err(DomainError::driver(Self::NAME, message)),
            None => Ok(()),
        }
    }

    async fn drop_storage(&self) -> Result<(), DomainError> {
        self.counters.drops.fetch_add(1, Ordering::SeqCst);
        match self.message("drop_error") {
            Some(message) => Err(DomainError::driver(Self::NAME, message)),
            None => Ok(()),
        }
    }

    fn supports_details(&self) -> bool {
        self.addition.get("details").is_some()
            || self.addition.get("details_error").is_some()
            || self.addition.get("hang").is_some()
    }

    async fn details(&self) -> Result<StorageDetails, DomainError> {
        if self.addition.get("hang").is_some() {
            std::future::pending::<()>().await;
        }
        if let Some(message) = self.message("details_error") {
            return Err(DomainError::driver(Self::NAME, message));
        }

        match self.addition.get("details") {
            Some(details) => Ok(StorageDetails::new(
                details["total"].as_u64().unwrap_or(0),
                details["free"].as_u64().unwrap_or(0),
            )),
            None => Err(DomainError::not_implemented("fake driver without details")),
        }
    }
}
