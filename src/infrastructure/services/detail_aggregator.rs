//! Detail aggregator - fetches driver details for a batch of storages
//!
//! Every eligible storage gets its own task; the batch shares one deadline.
//! Whatever has not reported by then is aborted and left without details.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, error, warn};

use crate::domain::{DriverRegistry, Storage, StorageDetails};

/// Default wall-clock budget for one batch
pub const DEFAULT_DETAILS_BUDGET: Duration = Duration::from_secs(3);

#[derive(Clone)]
pub struct DetailAggregator {
    registry: Arc<dyn DriverRegistry>,
    hide_details: bool,
    budget: Duration,
}

impl std::fmt::Debug for DetailAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailAggregator")
            .field("hide_details", &self.hide_details)
            .field("budget", &self.budget)
            .finish()
    }
}

impl DetailAggregator {
    pub fn new(registry: Arc<dyn DriverRegistry>) -> Self {
        Self {
            registry,
            hide_details: false,
            budget: DEFAULT_DETAILS_BUDGET,
        }
    }

    /// Never query drivers; every slot stays empty
    pub fn with_hide_details(mut self, hide_details: bool) -> Self {
        self.hide_details = hide_details;
        self
    }

    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// Details for each storage, index-aligned with `storages`
    pub async fn collect(&self, storages: &[Storage]) -> Vec<Option<StorageDetails>> {
        let mut details = vec![None; storages.len()];
        if self.hide_details || storages.is_empty() {
            return details;
        }

        let deadline = Instant::now() + self.budget;
        let mut tasks = JoinSet::new();

        for (index, storage) in storages.iter().enumerate() {
            let mounted = match self.registry.get_by_mount_path(&storage.mount_path).await {
                Ok(mounted) => mounted,
                Err(e) => {
                    debug!(mount_path = %storage.mount_path, error = %e, "No live driver for storage");
                    continue;
                }
            };

            if !mounted.supports_details() {
                continue;
            }

            tasks.spawn(async move { (index, mounted.details().await) });
        }

        while !tasks.is_empty() {
            match timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok((index, Ok(found))))) => details[index] = Some(found),
                Ok(Some(Ok((index, Err(e))))) => {
                    let mount_path = &storages[index].mount_path;
                    if e.is_benign_detail_error() {
                        debug!(mount_path = %mount_path, error = %e, "Storage has no details");
                    } else {
                        error!(mount_path = %mount_path, error = %e, "Failed to get storage details");
                    }
                }
                Ok(Some(Err(e))) => error!(error = %e, "Details task failed"),
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        pending = tasks.len(),
                        budget_ms = self.budget.as_millis() as u64,
                        "Timed out waiting for storage details"
                    );
                    tasks.abort_all();
                    break;
                }
            }
        }

        details
    }
}
