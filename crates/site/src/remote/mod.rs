//! Remote document store boundary.
//!
//! The product catalog lives in a hosted document database. This module
//! defines the narrow document-collection interface the catalog needs and
//! two implementations:
//!
//! - [`FirestoreClient`] - Cloud Firestore over its REST API
//! - [`MemoryDocumentStore`] - process-local store for tests and offline use
//!
//! # Consistency
//!
//! The remote store is authoritative and last-write-wins. Nothing here is
//! shared with the local persisted store (see [`crate::local`]).

mod firestore;
mod memory;

pub use firestore::FirestoreClient;
pub use memory::MemoryDocumentStore;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur when talking to the remote document store.
#[derive(Debug, Error)]
pub enum RemoteStoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the store.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Document does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials were rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The ID can never name a document.
    #[error("Invalid document ID: {0:?}")]
    InvalidDocumentId(String),
}

/// Reject IDs that cannot name a single document in a collection.
///
/// An ID must be non-empty, must not contain `/`, and must not be `.` or `..`.
///
/// # Errors
///
/// Returns [`RemoteStoreError::InvalidDocumentId`].
pub fn validate_document_id(id: &str) -> Result<(), RemoteStoreError> {
    if id.is_empty() || id == "." || id == ".." || id.contains('/') {
        return Err(RemoteStoreError::InvalidDocumentId(id.to_string()));
    }
    Ok(())
}

/// A single typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<FieldValue>),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// Document body keyed by field name.
pub type Fields = BTreeMap<String, FieldValue>;

/// A stored document: the store-assigned ID plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    /// A string field, or an empty string when absent or not a string.
    #[must_use]
    pub fn string(&self, key: &str) -> String {
        match self.fields.get(key) {
            Some(FieldValue::String(s)) => s.clone(),
            _ => String::new(),
        }
    }

    /// A timestamp field.
    ///
    /// Strings holding RFC 3339 timestamps are accepted too, since documents
    /// written by other clients sometimes store dates as text.
    #[must_use]
    pub fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.fields.get(key)? {
            FieldValue::Timestamp(ts) => Some(*ts),
            FieldValue::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            _ => None,
        }
    }
}

/// A collection-oriented document database.
///
/// Collections are created implicitly by the first write.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a new document and return the ID the store assigned to it.
    async fn add_document(&self, collection: &str, fields: Fields)
    -> Result<String, RemoteStoreError>;

    /// Every document in the collection, in no guaranteed order.
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, RemoteStoreError>;

    /// Merge `fields` into an existing document.
    ///
    /// Fields not named in `fields` are left untouched. Fails with
    /// [`RemoteStoreError::NotFound`] if the document does not exist, or
    /// [`RemoteStoreError::InvalidDocumentId`] if `id` is malformed.
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), RemoteStoreError>;

    /// Delete a document. Deleting a missing document succeeds; a malformed
    /// `id` fails with [`RemoteStoreError::InvalidDocumentId`].
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), RemoteStoreError>;
}
