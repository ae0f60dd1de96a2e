//! Balaji Core - Shared types and list logic.
//!
//! This crate provides the data model and pure logic shared by the site
//! runtime (`balaji-site`) and the command-line surface (`balaji-cli`).
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Products, services, highlights, IDs and phone numbers
//! - [`presentation`] - Derived views (active highlights, recent services, inquiry messages)
//! - [`messaging`] - WhatsApp click-to-chat links
//! - [`seed`] - Default services and highlights for a fresh profile

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod messaging;
pub mod presentation;
pub mod seed;
pub mod types;

pub use types::*;
