//! Paging parameters for storage listings

use serde::{Deserialize, Serialize};

use super::entity::Storage;

/// Requested page of storages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    /// Zero means "everything"
    #[serde(default)]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: 0,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Clamp the request: page starts at 1 and, when `max_per_page` is non-zero,
    /// page size never exceeds it.
    pub fn validate(self, max_per_page: u32) -> Self {
        let page = self.page.max(1);
        let per_page = if max_per_page > 0 && (self.per_page == 0 || self.per_page > max_per_page)
        {
            max_per_page
        } else {
            self.per_page
        };

        Self { page, per_page }
    }

    /// Number of records to skip
    pub fn offset(&self) -> usize {
        if self.per_page == 0 {
            0
        } else {
            (self.page.max(1) as usize - 1) * self.per_page as usize
        }
    }

    /// Maximum number of records to return, `None` for no limit
    pub fn limit(&self) -> Option<usize> {
        (self.per_page > 0).then_some(self.per_page as usize)
    }
}

/// A page of storages plus the store-wide record count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoragePage {
    pub items: Vec<Storage>,
    pub total: u64,
}
