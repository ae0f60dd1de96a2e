//! Catalog products.
//!
//! Products are the only entity backed by the remote document store. The
//! store assigns the ID; everything else is display text entered by an admin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ProductId;

/// Errors raised when admin input is incomplete.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// A new entry was submitted without an image.
    #[error("Please select an image")]
    MissingImage,
}

/// A product in the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Free-form price text such as `₹200/sqft`.
    pub price: String,
    pub description: String,
    /// Remote URL or embedded `data:` URL.
    pub image_url: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Text fields of a product as entered on the admin form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub name: String,
    pub price: String,
    pub description: String,
    pub category: String,
}

impl ProductDetails {
    /// Check that every field the admin form marks as required is present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("price", &self.price)?;
        require("description", &self.description)?;
        require("category", &self.category)?;
        Ok(())
    }
}

/// Reject blank values for a required field.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] when `value` is empty after trimming.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}
