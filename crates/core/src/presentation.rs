//! Derived views over loaded collections.
//!
//! Everything here is pure: callers pass already-loaded slices and get new
//! vectors or strings back.

use crate::types::{Product, Service, ServiceHighlight};

/// Number of services shown in the "Latest Services & Updates" strip.
pub const RECENT_SERVICES_LIMIT: usize = 3;

/// Characters of a service description shown on a recent-service card.
pub const EXCERPT_CHARS: usize = 80;

/// Message used when the inquiry list is empty or no item is selected.
pub const DEFAULT_INQUIRY_MESSAGE: &str = "Hello, I'm interested in your boundary wall services.";

/// Message behind the "free consultation" call to action.
pub const CONSULTATION_MESSAGE: &str =
    "Hello, I would like to get a free consultation and quotation for my project.";

/// Active highlights in display order.
///
/// The sort is stable, so highlights sharing an `order` keep their stored
/// sequence.
#[must_use]
pub fn active_highlights(highlights: &[ServiceHighlight]) -> Vec<ServiceHighlight> {
    let mut active: Vec<ServiceHighlight> =
        highlights.iter().filter(|h| h.is_active).cloned().collect();
    active.sort_by_key(|h| h.order);
    active
}

/// The `limit` most recently updated services, newest first.
#[must_use]
pub fn recent_services(services: &[Service], limit: usize) -> Vec<Service> {
    let mut sorted = services.to_vec();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    sorted.truncate(limit);
    sorted
}

/// Message for the inquiry list, naming every selected product.
#[must_use]
pub fn inquiry_message(products: &[Product]) -> String {
    if products.is_empty() {
        return DEFAULT_INQUIRY_MESSAGE.to_string();
    }

    let names = products
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Hello, I'm interested in the following products: {names}. Please provide more details and quotation."
    )
}

/// Message for a single product or service button.
#[must_use]
pub fn item_inquiry_message(name: &str) -> String {
    format!("Hello, I'm interested in {name}. Please provide more details and quotation.")
}

/// Shortened description for compact cards: the first `max_chars`
/// characters followed by an ellipsis.
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut short: String = text.chars().take(max_chars).collect();
    short.push_str("...");
    short
}

/// Highlights advertising a waived charge get the emphasized card.
#[must_use]
pub fn is_no_charge_highlight(highlight: &ServiceHighlight) -> bool {
    highlight.title.contains("No")
}
