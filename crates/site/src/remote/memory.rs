//! In-process document store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Document, DocumentStore, Fields, RemoteStoreError, validate_document_id};

/// A [`DocumentStore`] held entirely in memory.
///
/// IDs are random UUIDs (simple form), mirroring the opaque IDs a hosted
/// store hands out. Documents keep insertion order.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn add_document(
        &self,
        collection: &str,
        fields: Fields,
    ) -> Result<String, RemoteStoreError> {
        let id = Uuid::new_v4().simple().to_string();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                fields,
            });
        Ok(id)
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, RemoteStoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), RemoteStoreError> {
        validate_document_id(id)?;
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| RemoteStoreError::NotFound(format!("{collection}/{id}")))?;
        document.fields.extend(fields);
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), RemoteStoreError> {
        validate_document_id(id)?;
        if let Some(docs) = self.collections.write().await.get_mut(collection) {
            docs.retain(|d| d.id != id);
        }
        Ok(())
    }
}
