//! Application state shared across commands.

use std::sync::Arc;

use balaji_core::presentation::{CONSULTATION_MESSAGE, item_inquiry_message};
use balaji_core::{
    HighlightId, HighlightInput, ProductId, Service, ServiceHighlight, ServiceId, ServiceInput,
};
use tokio::sync::RwLock;
use tracing::warn;
use url::Url;

use crate::catalog::{CatalogService, ProductInput};
use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::gate::{AdminGate, AuthError};
use crate::inquiry::{InquiryComposer, InquiryList, LinkOpener};
use crate::local::{FileStore, LocalStore};
use crate::remote::{DocumentStore, FirestoreClient, MemoryDocumentStore};
use crate::services::{HighlightRepository, ServiceRepository};

/// Admin panel tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdminTab {
    #[default]
    Products,
    Services,
    Highlights,
}

/// Display language. Hindi is the site default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Hindi,
    English,
}

impl Language {
    /// ISO 639-1 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Hindi => "hi",
            Self::English => "en",
        }
    }

    /// The other language.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Hindi => Self::English,
            Self::English => Self::Hindi,
        }
    }
}

/// Per-session flags. Lives only as long as the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub tab: AdminTab,
    pub language: Language,
}

/// Application state.
///
/// Cheaply cloneable via `Arc`; every clone sees the same catalog snapshot
/// and session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    catalog: CatalogService,
    services: ServiceRepository,
    highlights: HighlightRepository,
    inquiry: InquiryList,
    composer: InquiryComposer,
    gate: AdminGate,
    session: RwLock<Session>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create application state over explicit store implementations.
    #[must_use]
    pub fn new(
        config: SiteConfig,
        remote: Arc<dyn DocumentStore>,
        local: Arc<dyn LocalStore>,
        opener: Arc<dyn LinkOpener>,
    ) -> Self {
        let composer = InquiryComposer::new(config.whatsapp_number.clone(), opener);

        Self {
            inner: Arc::new(AppStateInner {
                catalog: CatalogService::new(remote),
                services: ServiceRepository::new(Arc::clone(&local)),
                highlights: HighlightRepository::new(Arc::clone(&local)),
                inquiry: InquiryList::new(local),
                composer,
                gate: AdminGate::default(),
                session: RwLock::new(Session::default()),
                config,
            }),
        }
    }

    /// Create application state from configuration: Firestore for the
    /// catalog and a file store in the configured data directory.
    ///
    /// Without a configured Firebase project the catalog is held in memory
    /// for the lifetime of the process.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the data
    /// directory cannot be created.
    pub async fn from_config(
        config: SiteConfig,
        opener: Arc<dyn LinkOpener>,
    ) -> Result<Self, SiteError> {
        let remote: Arc<dyn DocumentStore> = match &config.firestore {
            Some(firestore) => Arc::new(FirestoreClient::new(firestore)?),
            None => {
                warn!("FIREBASE_PROJECT_ID not set, products are kept in memory for this run");
                Arc::new(MemoryDocumentStore::new())
            }
        };
        let local = Arc::new(FileStore::open(&config.data_dir).await?);

        Ok(Self::new(config, remote, local, opener))
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    #[must_use]
    pub fn services(&self) -> &ServiceRepository {
        &self.inner.services
    }

    #[must_use]
    pub fn highlights(&self) -> &HighlightRepository {
        &self.inner.highlights
    }

    #[must_use]
    pub fn inquiry(&self) -> &InquiryList {
        &self.inner.inquiry
    }

    #[must_use]
    pub fn composer(&self) -> &InquiryComposer {
        &self.inner.composer
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub async fn session(&self) -> Session {
        *self.inner.session.read().await
    }

    /// Try the admin password. A wrong password clears `input`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::IncorrectPassword` on mismatch.
    pub async fn login(&self, input: &mut String) -> Result<(), AuthError> {
        let mut session = self.inner.session.write().await;
        self.inner.gate.login(&mut session, input)
    }

    pub async fn logout(&self) {
        let mut session = self.inner.session.write().await;
        self.inner.gate.logout(&mut session);
    }

    pub async fn set_tab(&self, tab: AdminTab) {
        self.inner.session.write().await.tab = tab;
    }

    /// Switch between Hindi and English, returning the new language.
    pub async fn toggle_language(&self) -> Language {
        let mut session = self.inner.session.write().await;
        session.language = session.language.toggled();
        session.language
    }

    async fn require_admin(&self) -> Result<(), AuthError> {
        self.inner.gate.require(&*self.inner.session.read().await)
    }

    // =========================================================================
    // Admin operations
    // =========================================================================

    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` for visitor sessions, plus the
    /// errors of [`CatalogService::create`].
    pub async fn create_product(&self, input: ProductInput) -> Result<ProductId, SiteError> {
        self.require_admin().await?;
        self.inner.catalog.create(input).await
    }

    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` for visitor sessions, plus the
    /// errors of [`CatalogService::update`].
    pub async fn update_product(&self, id: &ProductId, input: ProductInput) -> Result<(), SiteError> {
        self.require_admin().await?;
        self.inner.catalog.update(id, input).await
    }

    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` for visitor sessions, plus the
    /// errors of [`CatalogService::remove`].
    pub async fn remove_product(&self, id: &ProductId) -> Result<(), SiteError> {
        self.require_admin().await?;
        self.inner.catalog.remove(id).await
    }

    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` for visitor sessions, plus the
    /// errors of [`ServiceRepository::create`].
    pub async fn create_service(&self, input: ServiceInput) -> Result<Service, SiteError> {
        self.require_admin().await?;
        self.inner.services.create(input).await
    }

    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` for visitor sessions, plus the
    /// errors of [`ServiceRepository::update`].
    pub async fn update_service(
        &self,
        id: &ServiceId,
        input: ServiceInput,
    ) -> Result<Service, SiteError> {
        self.require_admin().await?;
        self.inner.services.update(id, input).await
    }

    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` for visitor sessions.
    pub async fn remove_service(&self, id: &ServiceId) -> Result<(), SiteError> {
        self.require_admin().await?;
        self.inner.services.remove(id).await
    }

    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` for visitor sessions, plus the
    /// errors of [`HighlightRepository::create`].
    pub async fn create_highlight(
        &self,
        input: HighlightInput,
    ) -> Result<ServiceHighlight, SiteError> {
        self.require_admin().await?;
        self.inner.highlights.create(input).await
    }

    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` for visitor sessions, plus the
    /// errors of [`HighlightRepository::update`].
    pub async fn update_highlight(
        &self,
        id: &HighlightId,
        input: HighlightInput,
    ) -> Result<ServiceHighlight, SiteError> {
        self.require_admin().await?;
        self.inner.highlights.update(id, input).await
    }

    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` for visitor sessions.
    pub async fn remove_highlight(&self, id: &HighlightId) -> Result<(), SiteError> {
        self.require_admin().await?;
        self.inner.highlights.remove(id).await
    }

    // =========================================================================
    // Visitor operations
    // =========================================================================

    /// Save a catalog product to the inquiry list.
    ///
    /// Returns `false` when it was already saved.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::NotFound` if the product is not in the catalog.
    pub async fn add_to_inquiry(&self, id: &ProductId) -> Result<bool, SiteError> {
        let product = match self.inner.catalog.get(id).await {
            Some(product) => product,
            None => self
                .inner
                .catalog
                .list()
                .await?
                .into_iter()
                .find(|p| &p.id == id)
                .ok_or_else(|| SiteError::NotFound(id.to_string()))?,
        };
        self.inner.inquiry.add(product).await
    }

    /// Send the saved inquiry list over WhatsApp.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`InquiryComposer::send`].
    pub async fn send_inquiry(&self) -> Result<Url, SiteError> {
        let message = self.inner.inquiry.message().await?;
        self.inner.composer.send(&message).await
    }

    /// Ask about a single product or service by name.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`InquiryComposer::send`].
    pub async fn inquire_about(&self, name: &str) -> Result<Url, SiteError> {
        self.inner.composer.send(&item_inquiry_message(name)).await
    }

    /// Request a free consultation.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`InquiryComposer::send`].
    pub async fn request_consultation(&self) -> Result<Url, SiteError> {
        self.inner.composer.send(CONSULTATION_MESSAGE).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use async_trait::async_trait;
    use balaji_core::messaging::BUSINESS_PHONE;
    use balaji_core::{PhoneNumber, ProductDetails};

    use super::*;
    use crate::image::ImageUpload;
    use crate::local::MemoryStore;

    struct NoopOpener;

    #[async_trait]
    impl LinkOpener for NoopOpener {
        async fn open(&self, _url: &Url) -> Result<(), String> {
            Ok(())
        }
    }

    fn state() -> AppState {
        let config = SiteConfig {
            data_dir: PathBuf::from("/unused"),
            whatsapp_number: PhoneNumber::parse(BUSINESS_PHONE).unwrap(),
            firestore: None,
        };
        AppState::new(
            config,
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(MemoryStore::new()),
            Arc::new(NoopOpener),
        )
    }

    fn product_input() -> ProductInput {
        ProductInput {
            details: ProductDetails {
                name: "Gate A".to_string(),
                price: "₹500".to_string(),
                description: "Steel gate".to_string(),
                category: "Gate".to_string(),
            },
            image: Some(ImageUpload::new(vec![1], "image/png")),
        }
    }

    #[tokio::test]
    async fn test_default_session() {
        let session = state().session().await;
        assert!(!session.authenticated);
        assert_eq!(session.tab, AdminTab::Products);
        assert_eq!(session.language, Language::Hindi);
        assert_eq!(session.language.code(), "hi");
    }

    #[tokio::test]
    async fn test_admin_operations_require_login() {
        let state = state();
        let result = state.create_product(product_input()).await;
        assert!(matches!(
            result,
            Err(SiteError::Auth(AuthError::NotAuthenticated))
        ));
        assert!(state.catalog().products().await.is_empty());

        state.login(&mut "1234#".to_string()).await.unwrap();
        state.create_product(product_input()).await.unwrap();
        assert_eq!(state.catalog().products().await.len(), 1);

        state.logout().await;
        assert!(matches!(
            state.remove_service(&ServiceId::new("1")).await,
            Err(SiteError::Auth(AuthError::NotAuthenticated))
        ));
    }

    #[tokio::test]
    async fn test_wrong_password_clears_input() {
        let state = state();
        let mut input = "letmein".to_string();
        assert_eq!(
            state.login(&mut input).await,
            Err(AuthError::IncorrectPassword)
        );
        assert!(input.is_empty());
        assert!(!state.session().await.authenticated);
    }

    #[tokio::test]
    async fn test_clones_share_session() {
        let state = state();
        let other = state.clone();
        state.set_tab(AdminTab::Highlights).await;
        assert_eq!(other.toggle_language().await, Language::English);

        let session = state.session().await;
        assert_eq!(session.tab, AdminTab::Highlights);
        assert_eq!(session.language, Language::English);
    }

    #[tokio::test]
    async fn test_add_to_inquiry_requires_catalog_product() {
        let state = state();
        assert!(matches!(
            state.add_to_inquiry(&ProductId::new("nope")).await,
            Err(SiteError::NotFound(_))
        ));

        state.login(&mut "1234#".to_string()).await.unwrap();
        let id = state.create_product(product_input()).await.unwrap();
        assert!(state.add_to_inquiry(&id).await.unwrap());
        assert!(!state.add_to_inquiry(&id).await.unwrap());

        let url = state.send_inquiry().await.unwrap();
        assert!(url.as_str().contains("Gate%20A"));
    }
}
