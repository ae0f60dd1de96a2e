//! Inquiry list and WhatsApp hand-off.

use std::sync::Arc;

use async_trait::async_trait;
use balaji_core::messaging::whatsapp_link;
use balaji_core::presentation::inquiry_message;
use balaji_core::{PhoneNumber, Product, ProductId};
use tracing::{info, instrument};
use url::Url;

use crate::error::SiteError;
use crate::inflight::InFlight;
use crate::local::{LocalList, LocalStore, keys};

/// Products a visitor has collected for a quote (key `inquiry`).
#[derive(Debug)]
pub struct InquiryList {
    list: LocalList<Product>,
}

impl InquiryList {
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self {
            list: LocalList::new(store, keys::INQUIRY, Vec::new),
        }
    }

    /// Saved products, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::Local` if the stored list cannot be read.
    pub async fn items(&self) -> Result<Vec<Product>, SiteError> {
        Ok(self.list.items().await?)
    }

    /// Save a product snapshot. Returns `false` if it was already saved.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::Local` if the list cannot be saved.
    pub async fn add(&self, product: Product) -> Result<bool, SiteError> {
        Ok(self.list.insert_unique(product).await?)
    }

    /// # Errors
    ///
    /// Returns `SiteError::Local` if the list cannot be saved.
    pub async fn remove(&self, id: &ProductId) -> Result<(), SiteError> {
        self.list.remove(id.as_str()).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SiteError::Local` if the list cannot be saved.
    pub async fn clear(&self) -> Result<(), SiteError> {
        Ok(self.list.clear().await?)
    }

    /// The message naming every saved product.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::Local` if the stored list cannot be read.
    pub async fn message(&self) -> Result<String, SiteError> {
        Ok(inquiry_message(&self.items().await?))
    }
}

/// Hands a messaging link to whatever can open it.
#[async_trait]
pub trait LinkOpener: Send + Sync {
    /// Open `url`. Errors are reported as text.
    async fn open(&self, url: &Url) -> Result<(), String>;
}

/// Builds WhatsApp links for the business number and opens them.
pub struct InquiryComposer {
    phone: PhoneNumber,
    opener: Arc<dyn LinkOpener>,
    sending: InFlight,
}

impl std::fmt::Debug for InquiryComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InquiryComposer")
            .field("phone", &self.phone)
            .finish_non_exhaustive()
    }
}

impl InquiryComposer {
    #[must_use]
    pub fn new(phone: PhoneNumber, opener: Arc<dyn LinkOpener>) -> Self {
        Self {
            phone,
            opener,
            sending: InFlight::default(),
        }
    }

    /// The link for `message` without opening it.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::Link` if the URL cannot be built.
    pub fn link(&self, message: &str) -> Result<Url, SiteError> {
        Ok(whatsapp_link(&self.phone, message)?)
    }

    /// Open the link for `message` exactly once.
    ///
    /// A send issued while the previous one is still being handed off is
    /// rejected, not queued.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::SendInFlight`, `SiteError::Link`, or
    /// `SiteError::Open` if the opener fails.
    #[instrument(skip(self, message), fields(chars = message.chars().count()))]
    pub async fn send(&self, message: &str) -> Result<Url, SiteError> {
        let _guard = self.sending.try_begin().ok_or(SiteError::SendInFlight)?;
        let url = self.link(message)?;
        self.opener.open(&url).await.map_err(SiteError::Open)?;
        info!("Opened inquiry link");
        Ok(url)
    }
}
