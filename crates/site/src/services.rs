//! Services and service highlights, persisted in the local store.

use std::sync::Arc;

use balaji_core::presentation::{active_highlights, recent_services};
use balaji_core::seed::{default_highlights, default_services};
use balaji_core::{
    HighlightId, HighlightInput, Service, ServiceHighlight, ServiceId, ServiceInput,
};
use chrono::Utc;
use tracing::{info, instrument};

use crate::error::SiteError;
use crate::local::{LocalList, LocalStore, keys};

/// The services collection (key `services`).
///
/// Reads return the default services until the first write.
#[derive(Debug)]
pub struct ServiceRepository {
    list: LocalList<Service>,
}

impl ServiceRepository {
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self {
            list: LocalList::new(store, keys::SERVICES, default_services),
        }
    }

    /// All services in stored order.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::Local` if the stored collection cannot be read.
    pub async fn list(&self) -> Result<Vec<Service>, SiteError> {
        Ok(self.list.items().await?)
    }

    /// The `limit` most recently updated services.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::Local` if the stored collection cannot be read.
    pub async fn recent(&self, limit: usize) -> Result<Vec<Service>, SiteError> {
        Ok(recent_services(&self.list.items().await?, limit))
    }

    /// # Errors
    ///
    /// Returns `SiteError::Local` if the stored collection cannot be read.
    pub async fn get(&self, id: &ServiceId) -> Result<Option<Service>, SiteError> {
        Ok(self.list.get(id.as_str()).await?)
    }

    /// Add a service stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::Validation` for a blank required field, or
    /// `SiteError::Local` if the collection cannot be saved.
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: ServiceInput) -> Result<Service, SiteError> {
        input.validate()?;
        let now = Utc::now();
        let service = self
            .list
            .add(|id| input.into_service(ServiceId::new(id), now))
            .await?;
        info!(service_id = %service.id, "Created service");
        Ok(service)
    }

    /// Replace a service's fields, bumping `updated_at` and keeping `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::Validation`, or `SiteError::Local` with
    /// `LocalStoreError::NotFound` for an unknown ID.
    #[instrument(skip(self, id, input), fields(service_id = %id))]
    pub async fn update(&self, id: &ServiceId, input: ServiceInput) -> Result<Service, SiteError> {
        input.validate()?;
        let now = Utc::now();
        let service = self
            .list
            .update(id.as_str(), |existing| input.apply_to(existing, now))
            .await?;
        info!("Updated service");
        Ok(service)
    }

    /// Delete a service. Deleting an unknown ID succeeds.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::Local` if the collection cannot be saved.
    #[instrument(skip(self, id), fields(service_id = %id))]
    pub async fn remove(&self, id: &ServiceId) -> Result<(), SiteError> {
        if self.list.remove(id.as_str()).await? {
            info!("Deleted service");
        }
        Ok(())
    }
}

/// The highlights collection (key `serviceHighlights`).
///
/// Reads return the default highlights until the first write.
#[derive(Debug)]
pub struct HighlightRepository {
    list: LocalList<ServiceHighlight>,
}

impl HighlightRepository {
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self {
            list: LocalList::new(store, keys::HIGHLIGHTS, default_highlights),
        }
    }

    /// All highlights, active or not, in stored order.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::Local` if the stored collection cannot be read.
    pub async fn list(&self) -> Result<Vec<ServiceHighlight>, SiteError> {
        Ok(self.list.items().await?)
    }

    /// Active highlights in display order.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::Local` if the stored collection cannot be read.
    pub async fn active(&self) -> Result<Vec<ServiceHighlight>, SiteError> {
        Ok(active_highlights(&self.list.items().await?))
    }

    /// # Errors
    ///
    /// Returns `SiteError::Local` if the stored collection cannot be read.
    pub async fn get(&self, id: &HighlightId) -> Result<Option<ServiceHighlight>, SiteError> {
        Ok(self.list.get(id.as_str()).await?)
    }

    /// # Errors
    ///
    /// Returns `SiteError::Validation` for a blank required field, or
    /// `SiteError::Local` if the collection cannot be saved.
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: HighlightInput) -> Result<ServiceHighlight, SiteError> {
        input.validate()?;
        let highlight = self
            .list
            .add(|id| input.into_highlight(HighlightId::new(id)))
            .await?;
        info!(highlight_id = %highlight.id, "Created highlight");
        Ok(highlight)
    }

    /// # Errors
    ///
    /// Returns `SiteError::Validation`, or `SiteError::Local` with
    /// `LocalStoreError::NotFound` for an unknown ID.
    #[instrument(skip(self, id, input), fields(highlight_id = %id))]
    pub async fn update(
        &self,
        id: &HighlightId,
        input: HighlightInput,
    ) -> Result<ServiceHighlight, SiteError> {
        input.validate()?;
        let highlight = self
            .list
            .update(id.as_str(), |existing| {
                input.into_highlight(existing.id.clone())
            })
            .await?;
        info!("Updated highlight");
        Ok(highlight)
    }

    /// Delete a highlight. Deleting an unknown ID succeeds.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::Local` if the collection cannot be saved.
    #[instrument(skip(self, id), fields(highlight_id = %id))]
    pub async fn remove(&self, id: &HighlightId) -> Result<(), SiteError> {
        if self.list.remove(id.as_str()).await? {
            info!("Deleted highlight");
        }
        Ok(())
    }
}
