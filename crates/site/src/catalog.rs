//! Product catalog access.
//!
//! [`CatalogService`] owns the in-memory product snapshot and keeps it in
//! sync with the remote `products` collection: every successful mutation is
//! followed by a fresh listing (or, for deletes, by dropping the entry).
//!
//! Only one mutation runs at a time per catalog. A second `create`,
//! `update` or `remove` issued while one is in flight fails with
//! [`SiteError::WriteInFlight`] instead of producing a duplicate write.

use std::sync::Arc;

use balaji_core::{Product, ProductDetails, ProductId, ValidationError};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::error::SiteError;
use crate::image::ImageUpload;
use crate::inflight::{InFlight, InFlightGuard};
use crate::remote::{Document, DocumentStore, FieldValue, Fields, RemoteStoreError};

/// Remote collection holding the catalog.
pub const PRODUCTS_COLLECTION: &str = "products";

mod field {
    pub const NAME: &str = "name";
    pub const PRICE: &str = "price";
    pub const DESCRIPTION: &str = "description";
    pub const CATEGORY: &str = "category";
    pub const IMAGE_URL: &str = "imageUrl";
    pub const CREATED_AT: &str = "createdAt";
}

/// Admin form submission for a product.
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    pub details: ProductDetails,
    /// Required on create. On update, `None` keeps the current image.
    pub image: Option<ImageUpload>,
}

/// Product catalog backed by a remote document store.
pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
    products: RwLock<Vec<Product>>,
    writing: InFlight,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("writing", &self.writing.is_held())
            .finish_non_exhaustive()
    }
}

impl CatalogService {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            products: RwLock::new(Vec::new()),
            writing: InFlight::default(),
        }
    }

    fn begin_write(&self) -> Result<InFlightGuard<'_>, SiteError> {
        self.writing.try_begin().ok_or(SiteError::WriteInFlight)
    }

    /// Whether a mutation is currently running.
    #[must_use]
    pub fn is_writing(&self) -> bool {
        self.writing.is_held()
    }

    /// Fetch every product and replace the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::Remote` if the listing fails; the previous
    /// snapshot is kept in that case.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, SiteError> {
        let documents = self
            .store
            .list_documents(PRODUCTS_COLLECTION)
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to fetch products"))?;

        let products: Vec<Product> = documents.iter().map(product_from_document).collect();
        info!(count = products.len(), "Fetched products");

        self.products.write().await.clone_from(&products);
        Ok(products)
    }

    /// Add a product and refresh the snapshot.
    ///
    /// Returns the ID the store assigned as soon as the write succeeds, even
    /// if the refresh afterwards fails.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::Validation` for a blank field or missing image
    /// (nothing is written), `SiteError::WriteInFlight` if another mutation
    /// is running, or `SiteError::Remote` if the store rejects the write.
    #[instrument(skip(self, input), fields(name = %input.details.name))]
    pub async fn create(&self, input: ProductInput) -> Result<ProductId, SiteError> {
        let _guard = self.begin_write()?;

        input.details.validate()?;
        let image = input.image.ok_or(ValidationError::MissingImage)?;

        let mut fields = detail_fields(input.details);
        fields.insert(
            field::IMAGE_URL.to_string(),
            FieldValue::String(image.to_data_url()),
        );
        fields.insert(field::CREATED_AT.to_string(), Utc::now().into());

        let id = self
            .store
            .add_document(PRODUCTS_COLLECTION, fields)
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to add product"))?;
        info!(product_id = %id, "Created product");

        self.refresh_after_write().await;
        Ok(ProductId::new(id))
    }

    /// Overwrite a product's details, and its image when a new one is given.
    ///
    /// `createdAt` is never touched.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::NotFound` if no product has `id`, plus the errors
    /// of [`Self::create`] other than the missing image.
    #[instrument(skip(self, id, input), fields(product_id = %id))]
    pub async fn update(&self, id: &ProductId, input: ProductInput) -> Result<(), SiteError> {
        let _guard = self.begin_write()?;

        input.details.validate()?;

        let image_url = match input.image {
            Some(image) => image.to_data_url(),
            None => self.current_image_url(id).await?,
        };

        let mut fields = detail_fields(input.details);
        fields.insert(field::IMAGE_URL.to_string(), FieldValue::String(image_url));

        match self
            .store
            .update_document(PRODUCTS_COLLECTION, id.as_str(), fields)
            .await
        {
            Ok(()) => {}
            Err(RemoteStoreError::NotFound(_) | RemoteStoreError::InvalidDocumentId(_)) => {
                return Err(SiteError::NotFound(id.to_string()));
            }
            Err(e) => {
                warn!(error = %e, "Failed to update product");
                return Err(e.into());
            }
        }
        info!("Updated product");

        self.refresh_after_write().await;
        Ok(())
    }

    /// Delete a product. Deleting an unknown ID succeeds.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::WriteInFlight` or `SiteError::Remote`.
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub async fn remove(&self, id: &ProductId) -> Result<(), SiteError> {
        let _guard = self.begin_write()?;

        match self
            .store
            .delete_document(PRODUCTS_COLLECTION, id.as_str())
            .await
        {
            Ok(()) => {}
            // No document can carry a malformed ID, so there is nothing to delete.
            Err(RemoteStoreError::InvalidDocumentId(_)) => {
                debug!("Ignoring delete of malformed product ID");
                return Ok(());
            }
            Err(e) => {
                warn!(error = %e, "Failed to delete product");
                return Err(e.into());
            }
        }

        self.products.write().await.retain(|p| &p.id != id);
        info!("Deleted product");
        Ok(())
    }

    /// The current snapshot.
    pub async fn products(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }

    /// One product from the snapshot.
    pub async fn get(&self, id: &ProductId) -> Option<Product> {
        self.products
            .read()
            .await
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }

    /// Reload the snapshot after a successful write. A failed reload leaves
    /// the previous snapshot in place; the write itself stands.
    async fn refresh_after_write(&self) {
        if let Err(e) = self.list().await {
            warn!(error = %e, "Write succeeded but the product snapshot could not be refreshed");
        }
    }

    /// Image URL of an existing product, refreshing the snapshot once if
    /// the product is not in it yet.
    async fn current_image_url(&self, id: &ProductId) -> Result<String, SiteError> {
        if let Some(product) = self.get(id).await {
            return Ok(product.image_url);
        }
        self.list()
            .await?
            .into_iter()
            .find(|p| &p.id == id)
            .map(|p| p.image_url)
            .ok_or_else(|| SiteError::NotFound(id.to_string()))
    }
}

fn detail_fields(details: ProductDetails) -> Fields {
    Fields::from([
        (field::NAME.to_string(), details.name.into()),
        (field::PRICE.to_string(), details.price.into()),
        (field::DESCRIPTION.to_string(), details.description.into()),
        (field::CATEGORY.to_string(), details.category.into()),
    ])
}

/// Map a stored document to a product. Missing text reads as empty and a
/// missing creation time as the Unix epoch.
fn product_from_document(doc: &Document) -> Product {
    Product {
        id: ProductId::new(doc.id.clone()),
        name: doc.string(field::NAME),
        price: doc.string(field::PRICE),
        description: doc.string(field::DESCRIPTION),
        image_url: doc.string(field::IMAGE_URL),
        category: doc.string(field::CATEGORY),
        created_at: doc
            .timestamp(field::CREATED_AT)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::remote::MemoryDocumentStore;

    fn details(name: &str) -> ProductDetails {
        ProductDetails {
            name: name.to_string(),
            price: "₹200/sqft".to_string(),
            description: "Interlocking precast panel".to_string(),
            category: "Wall".to_string(),
        }
    }

    fn image() -> ImageUpload {
        ImageUpload::new(vec![1, 2, 3], "image/png")
    }

    fn input(name: &str) -> ProductInput {
        ProductInput {
            details: details(name),
            image: Some(image()),
        }
    }

    fn catalog() -> (Arc<MemoryDocumentStore>, CatalogService) {
        let store = Arc::new(MemoryDocumentStore::new());
        let catalog = CatalogService::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
        (store, catalog)
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let (_, catalog) = catalog();
        let id = catalog.create(input("Precast Panel")).await.unwrap();

        let products = catalog.list().await.unwrap();
        assert_eq!(products.len(), 1);
        let product = products.first().unwrap();
        assert_eq!(product.id, id);
        assert_eq!(product.name, "Precast Panel");
        assert_eq!(product.price, "₹200/sqft");
        assert_eq!(product.category, "Wall");
        assert_eq!(product.image_url, "data:image/png;base64,AQID");
        assert_eq!(catalog.products().await, products);
    }

    #[tokio::test]
    async fn test_create_without_image_writes_nothing() {
        let (store, catalog) = catalog();
        let result = catalog
            .create(ProductInput {
                details: details("Gate A"),
                image: None,
            })
            .await;

        assert!(matches!(
            result,
            Err(SiteError::Validation(ValidationError::MissingImage))
        ));
        assert_eq!(store.document_count(PRODUCTS_COLLECTION).await, 0);
    }

    #[tokio::test]
    async fn test_create_with_blank_field_writes_nothing() {
        let (store, catalog) = catalog();
        let mut bad = input("Gate A");
        bad.details.category = "  ".to_string();

        assert!(matches!(
            catalog.create(bad).await,
            Err(SiteError::Validation(ValidationError::MissingField(
                "category"
            )))
        ));
        assert_eq!(store.document_count(PRODUCTS_COLLECTION).await, 0);
    }

    #[tokio::test]
    async fn test_update_without_image_keeps_image() {
        let (_, catalog) = catalog();
        let id = catalog.create(input("Gate A")).await.unwrap();
        let created = catalog.get(&id).await.unwrap();

        catalog
            .update(
                &id,
                ProductInput {
                    details: details("Gate B"),
                    image: None,
                },
            )
            .await
            .unwrap();

        let updated = catalog.get(&id).await.unwrap();
        assert_eq!(updated.name, "Gate B");
        assert_eq!(updated.image_url, created.image_url);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_with_new_image_replaces_it() {
        let (_, catalog) = catalog();
        let id = catalog.create(input("Gate A")).await.unwrap();

        catalog
            .update(
                &id,
                ProductInput {
                    details: details("Gate A"),
                    image: Some(ImageUpload::new(vec![9], "image/gif")),
                },
            )
            .await
            .unwrap();

        assert_eq!(
            catalog.get(&id).await.unwrap().image_url,
            "data:image/gif;base64,CQ=="
        );
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let (_, catalog) = catalog();
        let result = catalog
            .update(&ProductId::new("missing"), input("Gate A"))
            .await;
        assert!(matches!(result, Err(SiteError::NotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (_, catalog) = catalog();
        let id = catalog.create(input("Gate A")).await.unwrap();

        catalog.remove(&id).await.unwrap();
        catalog.remove(&id).await.unwrap();

        assert!(catalog.products().await.is_empty());
        assert!(catalog.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_path_like_ids_touch_nothing() {
        let (store, catalog) = catalog();
        catalog.create(input("Gate A")).await.unwrap();

        for bad in ["../users/admin", "..", ""] {
            let id = ProductId::new(bad);
            let result = catalog.update(&id, input("Gate B")).await;
            assert!(matches!(result, Err(SiteError::NotFound(_))), "{bad:?}");
            catalog.remove(&id).await.unwrap();
        }

        assert_eq!(store.document_count(PRODUCTS_COLLECTION).await, 1);
        assert_eq!(catalog.products().await.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_fields_map_to_defaults() {
        let (store, catalog) = catalog();
        store
            .add_document(PRODUCTS_COLLECTION, Fields::new())
            .await
            .unwrap();

        let products = catalog.list().await.unwrap();
        let product = products.first().unwrap();
        assert_eq!(product.name, "");
        assert_eq!(product.image_url, "");
        assert_eq!(product.created_at, DateTime::<Utc>::UNIX_EPOCH);
    }

    /// A store whose writes block until released, to hold a mutation open.
    struct SlowStore {
        inner: MemoryDocumentStore,
        release: Notify,
    }

    #[async_trait]
    impl DocumentStore for SlowStore {
        async fn add_document(
            &self,
            collection: &str,
            fields: Fields,
        ) -> Result<String, RemoteStoreError> {
            self.release.notified().await;
            self.inner.add_document(collection, fields).await
        }

        async fn list_documents(
            &self,
            collection: &str,
        ) -> Result<Vec<Document>, RemoteStoreError> {
            self.inner.list_documents(collection).await
        }

        async fn update_document(
            &self,
            collection: &str,
            id: &str,
            fields: Fields,
        ) -> Result<(), RemoteStoreError> {
            self.inner.update_document(collection, id, fields).await
        }

        async fn delete_document(
            &self,
            collection: &str,
            id: &str,
        ) -> Result<(), RemoteStoreError> {
            self.inner.delete_document(collection, id).await
        }
    }

    #[tokio::test]
    async fn test_overlapping_mutation_is_rejected() {
        let store = Arc::new(SlowStore {
            inner: MemoryDocumentStore::new(),
            release: Notify::new(),
        });
        let catalog = Arc::new(CatalogService::new(
            Arc::clone(&store) as Arc<dyn DocumentStore>
        ));

        let first = tokio::spawn({
            let catalog = Arc::clone(&catalog);
            async move { catalog.create(input("Gate A")).await }
        });
        while !catalog.is_writing() {
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            catalog.create(input("Gate A")).await,
            Err(SiteError::WriteInFlight)
        ));
        assert!(matches!(
            catalog.remove(&ProductId::new("x")).await,
            Err(SiteError::WriteInFlight)
        ));

        store.release.notify_one();
        first.await.unwrap().unwrap();

        assert_eq!(store.inner.document_count(PRODUCTS_COLLECTION).await, 1);
        assert!(!catalog.is_writing());
    }

    /// Accepts writes but cannot list.
    struct UnlistableStore {
        inner: MemoryDocumentStore,
    }

    #[async_trait]
    impl DocumentStore for UnlistableStore {
        async fn add_document(
            &self,
            collection: &str,
            fields: Fields,
        ) -> Result<String, RemoteStoreError> {
            self.inner.add_document(collection, fields).await
        }

        async fn list_documents(
            &self,
            _collection: &str,
        ) -> Result<Vec<Document>, RemoteStoreError> {
            Err(RemoteStoreError::Api {
                status: 503,
                message: "The service is currently unavailable.".to_string(),
            })
        }

        async fn update_document(
            &self,
            collection: &str,
            id: &str,
            fields: Fields,
        ) -> Result<(), RemoteStoreError> {
            self.inner.update_document(collection, id, fields).await
        }

        async fn delete_document(
            &self,
            collection: &str,
            id: &str,
        ) -> Result<(), RemoteStoreError> {
            self.inner.delete_document(collection, id).await
        }
    }

    #[tokio::test]
    async fn test_failed_refresh_does_not_fail_the_write() {
        let store = Arc::new(UnlistableStore {
            inner: MemoryDocumentStore::new(),
        });
        let catalog = CatalogService::new(Arc::clone(&store) as Arc<dyn DocumentStore>);

        let id = catalog.create(input("Gate A")).await.unwrap();
        assert_eq!(store.inner.document_count(PRODUCTS_COLLECTION).await, 1);

        catalog.update(&id, input("Gate A2")).await.unwrap();
        assert_eq!(store.inner.document_count(PRODUCTS_COLLECTION).await, 1);

        // The listing error still reaches callers that ask for it.
        assert!(matches!(catalog.list().await, Err(SiteError::Remote(_))));
        assert!(catalog.products().await.is_empty());
        assert!(!catalog.is_writing());
    }
}
