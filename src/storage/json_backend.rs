use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{EntrySource, Result, StorageError, UserId};
use crate::{
    ledger::LedgerEntry,
    utils::persistence::write_atomically,
    wishlist::{WishlistItem, WishlistPatch},
};

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Ledger and wishlist records belonging to one user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecords {
    #[serde(default)]
    pub entries: Vec<LedgerEntry>,
    #[serde(default)]
    pub wishlist: Vec<WishlistItem>,
}

/// On-disk layout: every user's records keyed by user id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    #[serde(default = "Snapshot::schema_version_default")]
    pub schema_version: u32,
    #[serde(default)]
    pub users: BTreeMap<UserId, UserRecords>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            users: BTreeMap::new(),
        }
    }
}

impl Snapshot {
    pub fn schema_version_default() -> u32 {
        SNAPSHOT_SCHEMA_VERSION
    }

    /// Rejects unknown schema versions and records that fail domain validation.
    pub fn validate(&self) -> Result<()> {
        if self.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(StorageError::UnsupportedSchema(self.schema_version));
        }
        for records in self.users.values() {
            for entry in &records.entries {
                entry.validate()?;
            }
            let mut seen = Vec::with_capacity(records.wishlist.len());
            for item in &records.wishlist {
                item.validate()?;
                if seen.contains(&item.id) {
                    return Err(StorageError::DuplicateItem(item.id));
                }
                seen.push(item.id);
            }
        }
        Ok(())
    }

    fn records_mut(&mut self, user_id: UserId) -> &mut UserRecords {
        self.users.entry(user_id).or_default()
    }

    fn replace_item(&mut self, user_id: UserId, item: WishlistItem) {
        let records = self.records_mut(user_id);
        if let Some(slot) = records.wishlist.iter_mut().find(|slot| slot.id == item.id) {
            *slot = item;
        }
    }
}

/// File-backed snapshot store. Reads are served from memory. Every mutation
/// is applied to a copy of the snapshot, written to disk, and only then
/// becomes visible, so a failed write leaves the store unchanged.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
    snapshot: Snapshot,
}

impl JsonSnapshotStore {
    /// Opens `path`, starting from an empty snapshot when the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let snapshot = if path.exists() {
            load_snapshot_from_path(&path)?
        } else {
            debug!(path = %path.display(), "snapshot missing, starting empty");
            Snapshot::default()
        };
        Ok(Self { path, snapshot })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn add_entry(&mut self, user_id: UserId, entry: LedgerEntry) -> Result<()> {
        entry.validate()?;
        self.commit(|snapshot| {
            snapshot.records_mut(user_id).entries.push(entry);
            Ok(())
        })
    }

    /// Removes an entry by id, returning whether it existed.
    pub fn remove_entry(&mut self, user_id: UserId, entry_id: uuid::Uuid) -> Result<bool> {
        let exists = self
            .snapshot
            .users
            .get(&user_id)
            .is_some_and(|records| records.entries.iter().any(|entry| entry.id == entry_id));
        if !exists {
            return Ok(false);
        }
        self.commit(|snapshot| {
            snapshot
                .records_mut(user_id)
                .entries
                .retain(|entry| entry.id != entry_id);
            Ok(true)
        })
    }

    pub fn add_wishlist_item(&mut self, user_id: UserId, item: WishlistItem) -> Result<()> {
        item.validate()?;
        if self.find_item(user_id, item.id).is_some() {
            return Err(StorageError::DuplicateItem(item.id));
        }
        self.commit(|snapshot| {
            snapshot.records_mut(user_id).wishlist.push(item);
            Ok(())
        })
    }

    /// Next free wishlist id for the user.
    pub fn next_item_id(&self, user_id: UserId) -> i64 {
        self.snapshot
            .users
            .get(&user_id)
            .and_then(|records| records.wishlist.iter().map(|item| item.id).max())
            .map_or(1, |max| max + 1)
    }

    /// Applies `patch` to the item, returning the updated item if it exists.
    pub fn update_wishlist_item(
        &mut self,
        user_id: UserId,
        item_id: i64,
        patch: &WishlistPatch,
    ) -> Result<Option<WishlistItem>> {
        let Some(mut item) = self.find_item(user_id, item_id).cloned() else {
            return Ok(None);
        };
        patch.apply(&mut item)?;
        self.commit(|snapshot| {
            snapshot.replace_item(user_id, item.clone());
            Ok(Some(item))
        })
    }

    /// Flips the bought flag, returning the new state if the item exists.
    pub fn toggle_wishlist_item(&mut self, user_id: UserId, item_id: i64) -> Result<Option<bool>> {
        let Some(mut item) = self.find_item(user_id, item_id).cloned() else {
            return Ok(None);
        };
        let bought = item.toggle_bought();
        self.commit(|snapshot| {
            snapshot.replace_item(user_id, item);
            Ok(Some(bought))
        })
    }

    pub fn remove_wishlist_item(&mut self, user_id: UserId, item_id: i64) -> Result<bool> {
        if self.find_item(user_id, item_id).is_none() {
            return Ok(false);
        }
        self.commit(|snapshot| {
            snapshot
                .records_mut(user_id)
                .wishlist
                .retain(|item| item.id != item_id);
            Ok(true)
        })
    }

    fn find_item(&self, user_id: UserId, item_id: i64) -> Option<&WishlistItem> {
        self.snapshot
            .users
            .get(&user_id)?
            .wishlist
            .iter()
            .find(|item| item.id == item_id)
    }

    /// Runs `change` against a copy of the snapshot and swaps the copy in
    /// only after it has been written to disk.
    fn commit<T>(&mut self, change: impl FnOnce(&mut Snapshot) -> Result<T>) -> Result<T> {
        let mut next = self.snapshot.clone();
        let outcome = change(&mut next)?;
        save_snapshot_to_path(&next, &self.path)?;
        info!(path = %self.path.display(), users = next.users.len(), "snapshot saved");
        self.snapshot = next;
        Ok(outcome)
    }
}

impl EntrySource for JsonSnapshotStore {
    fn fetch_entries(&self, user_id: UserId, since: NaiveDate) -> Result<Vec<LedgerEntry>> {
        Ok(self
            .snapshot
            .users
            .get(&user_id)
            .map(|records| {
                records
                    .entries
                    .iter()
                    .filter(|entry| entry.occurred_on >= since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn fetch_wishlist_items(&self, user_id: UserId) -> Result<Vec<WishlistItem>> {
        Ok(self
            .snapshot
            .users
            .get(&user_id)
            .map(|records| records.wishlist.clone())
            .unwrap_or_default())
    }
}

pub fn save_snapshot_to_path(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    write_atomically(path, &json)?;
    Ok(())
}

pub fn load_snapshot_from_path(path: &Path) -> Result<Snapshot> {
    let data = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&data)?;
    snapshot.validate()?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[test]
    fn open_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let store = JsonSnapshotStore::open(dir.path().join("missing.json")).unwrap();
        assert!(store.snapshot().users.is_empty());
        assert_eq!(store.next_item_id(1), 1);
    }

    #[test]
    fn duplicate_item_ids_are_rejected() {
        let dir = tempdir().unwrap();
        let mut store = JsonSnapshotStore::open(dir.path().join("s.json")).unwrap();
        let item = WishlistItem::new(1, "Camera", dec!(900)).unwrap();
        store.add_wishlist_item(5, item.clone()).unwrap();
        assert!(matches!(
            store.add_wishlist_item(5, item),
            Err(StorageError::DuplicateItem(1))
        ));
        assert_eq!(store.next_item_id(5), 2);
    }

    #[test]
    fn unsupported_schema_fails_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("old.json");
        fs::write(&path, r#"{"schema_version": 99, "users": {}}"#).unwrap();
        assert!(matches!(
            JsonSnapshotStore::open(&path),
            Err(StorageError::UnsupportedSchema(99))
        ));
    }

    #[test]
    fn mutations_are_written_before_they_become_visible() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("s.json");
        let mut store = JsonSnapshotStore::open(&path).unwrap();
        store
            .add_wishlist_item(1, WishlistItem::new(1, "Desk", dec!(300)).unwrap())
            .unwrap();
        assert_eq!(store.toggle_wishlist_item(1, 1).unwrap(), Some(true));

        let reopened = JsonSnapshotStore::open(&path).unwrap();
        assert_eq!(reopened.snapshot(), store.snapshot());
        assert_eq!(store.toggle_wishlist_item(1, 9).unwrap(), None);
        assert!(!store.remove_wishlist_item(1, 9).unwrap());
    }

    #[test]
    fn failed_write_leaves_store_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("s.json");
        let mut store = JsonSnapshotStore::open(&path).unwrap();
        store
            .add_wishlist_item(1, WishlistItem::new(1, "Desk", dec!(300)).unwrap())
            .unwrap();
        let before = store.snapshot().clone();

        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        fs::write(path.join("blocker"), "x").unwrap();

        let entry =
            LedgerEntry::income(dec!(5000), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()).unwrap();
        assert!(matches!(store.add_entry(1, entry), Err(StorageError::Io(_))));
        assert!(store.toggle_wishlist_item(1, 1).is_err());
        assert!(store.remove_wishlist_item(1, 1).is_err());
        assert_eq!(store.snapshot(), &before);
        assert!(store.fetch_all_entries(1).unwrap().is_empty());
    }
}
