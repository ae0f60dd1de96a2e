//! Services offered by the business.
//!
//! Services are kept in the visitor's local store only. Edits stamp a fresh
//! `updated_at`, which drives the "latest services" view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ServiceId;
use super::product::{ValidationError, require};

/// A service entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ServiceId,
    pub title: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
    pub features: Vec<String>,
    pub category: String,
    /// Visual emphasis only ("Popular" badge).
    pub is_highlighted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin form input for creating or editing a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInput {
    pub title: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
    /// Comma-separated feature list, see [`parse_features`]. `None` leaves
    /// an existing service's features as they are.
    pub features: Option<String>,
    pub category: String,
    pub is_highlighted: bool,
}

impl ServiceInput {
    /// Check the required form fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("description", &self.description)?;
        require("price", &self.price)?;
        require("category", &self.category)?;
        Ok(())
    }

    /// Build a new service stamped with `now` for both timestamps.
    ///
    /// Without a feature list the service starts with no features.
    #[must_use]
    pub fn into_service(self, id: ServiceId, now: DateTime<Utc>) -> Service {
        Service {
            id,
            title: self.title,
            description: self.description,
            price: self.price,
            image_url: self.image_url,
            features: self
                .features
                .as_deref()
                .map(parse_features)
                .unwrap_or_default(),
            category: self.category,
            is_highlighted: self.is_highlighted,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply this input to an existing service, keeping its ID and creation time.
    #[must_use]
    pub fn apply_to(self, existing: &Service, now: DateTime<Utc>) -> Service {
        let keep_features = self.features.is_none();
        let mut service = Service {
            created_at: existing.created_at,
            ..self.into_service(existing.id.clone(), now)
        };
        if keep_features {
            service.features.clone_from(&existing.features);
        }
        service
    }
}

/// Split a comma-separated feature list.
///
/// Each entry is trimmed. Empty entries are kept, so `"a,,b"` yields three
/// features and an empty input yields a single empty feature.
#[must_use]
pub fn parse_features(input: &str) -> Vec<String> {
    input.split(',').map(|f| f.trim().to_string()).collect()
}
