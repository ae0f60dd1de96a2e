//! Integration tests for the Balaji site crates.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p balaji-integration-tests
//! ```
//!
//! No external services are needed: the Firestore contract tests run
//! against a local `wiremock` server and profiles live in temp directories.
//!
//! # Test Categories
//!
//! - `catalog_flow` - Product create/update/remove through `AppState`
//! - `firestore_contract` - REST wire format of the Firestore client
//! - `local_profile` - Persistence of services, highlights and the inquiry list
//! - `admin_gate` - Password gate behavior
//!
//! This library holds the fixtures the test files share.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use balaji_core::messaging::BUSINESS_PHONE;
use balaji_core::{PhoneNumber, ProductDetails};
use balaji_site::AppState;
use balaji_site::catalog::ProductInput;
use balaji_site::config::{FirestoreConfig, SiteConfig};
use balaji_site::image::ImageUpload;
use balaji_site::inquiry::LinkOpener;
use balaji_site::local::{LocalStore, MemoryStore};
use balaji_site::remote::{DocumentStore, MemoryDocumentStore};
use tokio::sync::Mutex;
use url::Url;

pub use balaji_site::gate::PLACEHOLDER_PASSWORD as ADMIN_PASSWORD;

/// Project ID used against mock Firestore servers.
pub const TEST_PROJECT: &str = "balaji-test";

/// Link opener that records every link instead of opening it.
#[derive(Debug, Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<Url>>,
}

impl RecordingOpener {
    pub async fn opened(&self) -> Vec<Url> {
        self.opened.lock().await.clone()
    }
}

#[async_trait]
impl LinkOpener for RecordingOpener {
    async fn open(&self, url: &Url) -> Result<(), String> {
        self.opened.lock().await.push(url.clone());
        Ok(())
    }
}

/// Site configuration rooted at `data_dir`, without a remote project.
///
/// # Panics
///
/// Never in practice; the default business number is valid.
#[must_use]
pub fn test_config(data_dir: &Path) -> SiteConfig {
    SiteConfig {
        data_dir: data_dir.to_path_buf(),
        whatsapp_number: PhoneNumber::parse(BUSINESS_PHONE).expect("default number is valid"),
        firestore: None,
    }
}

/// Firestore settings pointing at a mock server.
#[must_use]
pub fn mock_firestore(server_uri: &str) -> FirestoreConfig {
    FirestoreConfig::for_endpoint(&format!("{server_uri}/v1"), TEST_PROJECT)
}

/// A fully in-memory application state plus the opener it sends links to.
pub struct TestContext {
    pub state: AppState,
    pub remote: Arc<MemoryDocumentStore>,
    pub local: Arc<MemoryStore>,
    pub opener: Arc<RecordingOpener>,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        let remote = Arc::new(MemoryDocumentStore::new());
        let local = Arc::new(MemoryStore::new());
        let opener = Arc::new(RecordingOpener::default());
        let state = AppState::new(
            test_config(Path::new("/unused")),
            Arc::clone(&remote) as Arc<dyn DocumentStore>,
            Arc::clone(&local) as Arc<dyn LocalStore>,
            Arc::clone(&opener) as Arc<dyn LinkOpener>,
        );
        Self {
            state,
            remote,
            local,
            opener,
        }
    }

    /// Log the session in with the admin password.
    ///
    /// # Panics
    ///
    /// Panics if the placeholder password is rejected.
    pub async fn login(&self) {
        self.state
            .login(&mut ADMIN_PASSWORD.to_string())
            .await
            .expect("placeholder password accepted");
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Product form input with a small PNG payload.
#[must_use]
pub fn product_input(name: &str, price: &str, category: &str) -> ProductInput {
    ProductInput {
        details: ProductDetails {
            name: name.to_string(),
            price: price.to_string(),
            description: format!("{name} for boundary walls"),
            category: category.to_string(),
        },
        image: Some(ImageUpload::new(vec![0x89, b'P', b'N', b'G'], "image/png")),
    }
}
