use std::collections::HashMap;

use chrono::NaiveDate;

use super::{EntrySource, Result, UserId};
use crate::{ledger::LedgerEntry, wishlist::WishlistItem};

/// Vector-backed source, handy for tests and for callers that already hold
/// a snapshot in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    entries: HashMap<UserId, Vec<LedgerEntry>>,
    wishlist: HashMap<UserId, Vec<WishlistItem>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(mut self, user_id: UserId, entries: Vec<LedgerEntry>) -> Self {
        self.entries.entry(user_id).or_default().extend(entries);
        self
    }

    pub fn with_wishlist(mut self, user_id: UserId, items: Vec<WishlistItem>) -> Self {
        self.wishlist.entry(user_id).or_default().extend(items);
        self
    }
}

impl EntrySource for InMemorySource {
    fn fetch_entries(&self, user_id: UserId, since: NaiveDate) -> Result<Vec<LedgerEntry>> {
        Ok(self
            .entries
            .get(&user_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|entry| entry.occurred_on >= since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn fetch_wishlist_items(&self, user_id: UserId) -> Result<Vec<WishlistItem>> {
        Ok(self.wishlist.get(&user_id).cloned().unwrap_or_default())
    }
}
