//! JSON collections persisted under a single local key.

use std::fmt;
use std::sync::Arc;

use balaji_core::{Product, Service, ServiceHighlight};
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::{LocalStore, LocalStoreError};

/// An element of a [`LocalList`], identified by a string ID.
pub trait ListEntry: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn entry_id(&self) -> &str;
}

impl ListEntry for Service {
    fn entry_id(&self) -> &str {
        self.id.as_str()
    }
}

impl ListEntry for ServiceHighlight {
    fn entry_id(&self) -> &str {
        self.id.as_str()
    }
}

impl ListEntry for Product {
    fn entry_id(&self) -> &str {
        self.id.as_str()
    }
}

/// A collection stored as one JSON array under `key`.
///
/// Until the key is first written, reads return the list's defaults. Every
/// mutation re-reads the stored array, applies the change and writes the
/// whole array back. Mutations on one list are serialized.
pub struct LocalList<T> {
    store: Arc<dyn LocalStore>,
    key: &'static str,
    defaults: fn() -> Vec<T>,
    write_lock: Mutex<()>,
}

impl<T> fmt::Debug for LocalList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalList")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<T: ListEntry> LocalList<T> {
    pub fn new(store: Arc<dyn LocalStore>, key: &'static str, defaults: fn() -> Vec<T>) -> Self {
        Self {
            store,
            key,
            defaults,
            write_lock: Mutex::new(()),
        }
    }

    /// The store key this list lives under.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Every entry, in stored order.
    ///
    /// # Errors
    ///
    /// Returns `LocalStoreError::Corrupt` if the stored value does not parse.
    pub async fn items(&self) -> Result<Vec<T>, LocalStoreError> {
        match self.store.get(self.key).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| LocalStoreError::Corrupt {
                key: self.key.to_string(),
                source,
            }),
            None => Ok((self.defaults)()),
        }
    }

    /// The entry with `id`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be loaded.
    pub async fn get(&self, id: &str) -> Result<Option<T>, LocalStoreError> {
        Ok(self
            .items()
            .await?
            .into_iter()
            .find(|item| item.entry_id() == id))
    }

    /// Append a new entry built around a freshly generated ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be loaded or saved.
    pub async fn add(&self, build: impl FnOnce(String) -> T + Send) -> Result<T, LocalStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.items().await?;
        let item = build(next_id(&items, Utc::now().timestamp_millis()));
        items.push(item.clone());
        self.save(&items).await?;
        Ok(item)
    }

    /// Append `item` as-is unless an entry with the same ID exists.
    ///
    /// Returns `false` when the entry was already present.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be loaded or saved.
    pub async fn insert_unique(&self, item: T) -> Result<bool, LocalStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.items().await?;
        if items.iter().any(|i| i.entry_id() == item.entry_id()) {
            return Ok(false);
        }
        items.push(item);
        self.save(&items).await?;
        Ok(true)
    }

    /// Replace the entry with `id` by `patch(existing)`, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns `LocalStoreError::NotFound` if no entry has `id`.
    pub async fn update(
        &self,
        id: &str,
        patch: impl FnOnce(&T) -> T + Send,
    ) -> Result<T, LocalStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.items().await?;
        let slot = items
            .iter_mut()
            .find(|item| item.entry_id() == id)
            .ok_or_else(|| LocalStoreError::NotFound(id.to_string()))?;
        let updated = patch(&*slot);
        *slot = updated.clone();
        self.save(&items).await?;
        Ok(updated)
    }

    /// Remove the entry with `id`. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be loaded or saved.
    pub async fn remove(&self, id: &str) -> Result<bool, LocalStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.items().await?;
        let before = items.len();
        items.retain(|item| item.entry_id() != id);
        if items.len() == before {
            return Ok(false);
        }
        self.save(&items).await?;
        Ok(true)
    }

    /// Store an empty collection. Defaults do not come back afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be saved.
    pub async fn clear(&self) -> Result<(), LocalStoreError> {
        let _guard = self.write_lock.lock().await;
        self.save(&[]).await
    }

    async fn save(&self, items: &[T]) -> Result<(), LocalStoreError> {
        let raw = serde_json::to_string(items)?;
        self.store.set(self.key, &raw).await?;
        debug!(key = self.key, count = items.len(), "Saved local list");
        Ok(())
    }
}

/// A new ID for `items`: `now_millis`, or one past the largest numeric ID
/// already present when that is not in the past.
///
/// If the largest numeric ID is `i64::MAX` a random UUID is used instead.
#[must_use]
pub fn next_id<T: ListEntry>(items: &[T], now_millis: i64) -> String {
    let largest = items
        .iter()
        .filter_map(|item| item.entry_id().parse::<i64>().ok())
        .max();
    match largest {
        Some(max) if max >= now_millis => max
            .checked_add(1)
            .map_or_else(|| Uuid::new_v4().to_string(), |id| id.to_string()),
        _ => now_millis.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::local::MemoryStore;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Note {
        id: String,
        text: String,
    }

    impl ListEntry for Note {
        fn entry_id(&self) -> &str {
            &self.id
        }
    }

    fn note(id: &str, text: &str) -> Note {
        Note {
            id: id.to_string(),
            text: text.to_string(),
        }
    }

    fn defaults() -> Vec<Note> {
        vec![note("1", "seeded")]
    }

    fn list(store: Arc<MemoryStore>) -> LocalList<Note> {
        LocalList::new(store, "notes", defaults)
    }

    #[tokio::test]
    async fn test_defaults_until_first_write() {
        let store = Arc::new(MemoryStore::new());
        let notes = list(Arc::clone(&store));

        assert_eq!(notes.items().await.unwrap(), defaults());
        assert_eq!(store.get("notes").await.unwrap(), None);

        notes.add(|id| note(&id, "new")).await.unwrap();
        assert_eq!(notes.items().await.unwrap().len(), 2);
        assert!(store.get("notes").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear_does_not_restore_defaults() {
        let notes = list(Arc::new(MemoryStore::new()));
        notes.clear().await.unwrap();
        assert!(notes.items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_position_and_id() {
        let notes = list(Arc::new(MemoryStore::new()));
        notes.add(|id| note(&id, "second")).await.unwrap();

        let updated = notes
            .update("1", |existing| Note {
                text: "edited".to_string(),
                ..existing.clone()
            })
            .await
            .unwrap();

        assert_eq!(updated.id, "1");
        let items = notes.items().await.unwrap();
        assert_eq!(items.first().map(|n| n.text.as_str()), Some("edited"));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let notes = list(Arc::new(MemoryStore::new()));
        let result = notes.update("missing", Clone::clone).await;
        assert!(matches!(result, Err(LocalStoreError::NotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let notes = list(Arc::new(MemoryStore::new()));
        assert!(notes.remove("1").await.unwrap());
        assert!(!notes.remove("1").await.unwrap());
        assert!(notes.items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_unique_skips_duplicates() {
        let notes = list(Arc::new(MemoryStore::new()));
        assert!(notes.insert_unique(note("7", "a")).await.unwrap());
        assert!(!notes.insert_unique(note("7", "b")).await.unwrap());
        assert_eq!(
            notes.get("7").await.unwrap().map(|n| n.text),
            Some("a".to_string())
        );
    }

    #[tokio::test]
    async fn test_corrupt_value_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        store.set("notes", "{not json").await.unwrap();
        let notes = list(store);
        assert!(matches!(
            notes.items().await,
            Err(LocalStoreError::Corrupt { key, .. }) if key == "notes"
        ));
    }

    #[tokio::test]
    async fn test_rapid_adds_get_distinct_ids() {
        let notes = list(Arc::new(MemoryStore::new()));
        let a = notes.add(|id| note(&id, "a")).await.unwrap();
        let b = notes.add(|id| note(&id, "b")).await.unwrap();
        let c = notes.add(|id| note(&id, "c")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(b.id, c.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_next_id_uses_clock_when_ahead() {
        let items = vec![note("1", "x"), note("abc", "y")];
        assert_eq!(next_id(&items, 1_700_000_000_000), "1700000000000");
    }

    #[test]
    fn test_next_id_bumps_past_existing() {
        let items = vec![note("1700000000005", "x")];
        assert_eq!(next_id(&items, 1_700_000_000_000), "1700000000006");
        assert_eq!(next_id::<Note>(&[], 42), "42");
    }

    #[test]
    fn test_next_id_at_i64_max_is_still_unique() {
        let items = vec![note(&i64::MAX.to_string(), "x")];
        let id = next_id(&items, 1_700_000_000_000);
        assert_ne!(id, i64::MAX.to_string());
        assert!(id.parse::<i64>().is_err());
    }
}
