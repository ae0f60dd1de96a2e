//! Local persisted store.
//!
//! A small key-value store scoped to one profile directory. Values are JSON
//! text; collections built on top of it live in [`LocalList`].
//!
//! Nothing stored here is shared with the remote catalog (see
//! [`crate::remote`]), and no transaction spans the two.

mod file;
mod list;
mod memory;

pub use file::FileStore;
pub use list::{ListEntry, LocalList, next_id};
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// Keys used in the local store.
pub mod keys {
    /// Services collection.
    pub const SERVICES: &str = "services";
    /// Service highlights collection.
    pub const HIGHLIGHTS: &str = "serviceHighlights";
    /// Products saved for a WhatsApp inquiry.
    pub const INQUIRY: &str = "inquiry";
}

/// Errors from the local store and the lists built on it.
#[derive(Debug, Error)]
pub enum LocalStoreError {
    /// Reading or writing the profile directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A collection could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored value is not valid JSON for its collection.
    #[error("Corrupt data under key '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// No entry with the given ID.
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// Keys become file names and must stay inside the profile directory.
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// A string key-value store.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// The value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;

    /// Remove `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<(), LocalStoreError>;
}
