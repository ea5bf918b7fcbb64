//! Read-side collaborators that supply ledger and wishlist snapshots.

pub mod json_backend;
pub mod memory;

use chrono::NaiveDate;
use thiserror::Error;

use crate::{errors::ForecastError, ledger::LedgerEntry, wishlist::WishlistItem};

pub type UserId = i64;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Unsupported snapshot schema version {0}")]
    UnsupportedSchema(u32),
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] ForecastError),
    #[error("Duplicate wishlist item id {0}")]
    DuplicateItem(i64),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Source of per-user snapshots. Implementations must only return the
/// requested user's records; the forecasting core does not re-check ownership.
pub trait EntrySource: Send + Sync {
    /// Entries with `occurred_on >= since`.
    fn fetch_entries(&self, user_id: UserId, since: NaiveDate) -> Result<Vec<LedgerEntry>>;

    /// Every wishlist item of the user, in any order.
    fn fetch_wishlist_items(&self, user_id: UserId) -> Result<Vec<WishlistItem>>;

    /// All entries regardless of date.
    fn fetch_all_entries(&self, user_id: UserId) -> Result<Vec<LedgerEntry>> {
        self.fetch_entries(user_id, NaiveDate::MIN)
    }

    /// One page of entries matching `query`, oldest first.
    fn query_entries(&self, user_id: UserId, query: &EntryQuery) -> Result<Vec<LedgerEntry>> {
        query.validate()?;
        Ok(query.apply(self.fetch_all_entries(user_id)?))
    }
}

pub const DEFAULT_PAGE_LIMIT: usize = 10;
pub const MAX_PAGE_LIMIT: usize = 100;

/// Category filter plus offset/limit paging over a user's entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryQuery {
    pub category: Option<String>,
    pub offset: usize,
    pub limit: usize,
}

impl Default for EntryQuery {
    fn default() -> Self {
        Self {
            category: None,
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl EntryQuery {
    /// Restricts results to one category. Blank names match everything.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        let trimmed = category.trim();
        self.category = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn with_page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.limit > MAX_PAGE_LIMIT {
            return Err(StorageError::InvalidQuery(format!(
                "limit must be at most {MAX_PAGE_LIMIT}, got {}",
                self.limit
            )));
        }
        Ok(())
    }

    /// Filters, orders by date (ties keep stored order), then pages.
    pub fn apply(&self, mut entries: Vec<LedgerEntry>) -> Vec<LedgerEntry> {
        if let Some(category) = &self.category {
            entries.retain(|entry| entry.category.as_deref() == Some(category.as_str()));
        }
        entries.sort_by_key(|entry| entry.occurred_on);
        entries
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect()
    }
}

pub use json_backend::{JsonSnapshotStore, Snapshot, UserRecords, SNAPSHOT_SCHEMA_VERSION};
pub use memory::InMemorySource;
