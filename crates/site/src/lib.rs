//! Balaji Site - Catalog access, local persistence and the inquiry flow.
//!
//! This crate holds everything that touches storage or the outside world:
//!
//! - [`remote`] - Document store boundary and the Cloud Firestore client
//! - [`catalog`] - Product catalog kept in sync with the remote store
//! - [`local`] - Profile-scoped key-value store and JSON lists on top of it
//! - [`services`] - Services and highlights repositories
//! - [`inquiry`] - Saved inquiry list and the WhatsApp hand-off
//! - [`gate`] - Placeholder admin password gate
//! - [`state`] - Application state and session flags
//! - [`config`] - Environment-based configuration
//!
//! Pure types and list logic live in `balaji-core`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod gate;
pub mod image;
mod inflight;
pub mod inquiry;
pub mod local;
pub mod remote;
pub mod services;
pub mod state;

pub use error::SiteError;
pub use state::AppState;
