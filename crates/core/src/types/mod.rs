//! Core types for the Balaji site.
//!
//! This module provides the catalog data model and type-safe wrappers for
//! IDs and phone numbers.

pub mod highlight;
pub mod id;
pub mod phone;
pub mod product;
pub mod service;

pub use highlight::{HighlightIcon, HighlightInput, ServiceHighlight};
pub use id::*;
pub use phone::{PhoneError, PhoneNumber};
pub use product::{Product, ProductDetails, ValidationError};
pub use service::{Service, ServiceInput, parse_features};
