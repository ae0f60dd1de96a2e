//! Visitor-facing listings.

use balaji_core::presentation::{EXCERPT_CHARS, RECENT_SERVICES_LIMIT, excerpt, is_no_charge_highlight};
use balaji_core::{Product, ProductId, Service, ServiceHighlight};
use balaji_site::AppState;

use super::{CliError, Output};

pub async fn list_products(state: &AppState, out: &Output) -> Result<(), CliError> {
    let products = state.catalog().list().await?;
    out.list(&products, render_product)
}

pub async fn show_product(state: &AppState, out: &Output, id: &str) -> Result<(), CliError> {
    let id = ProductId::new(id);
    state.catalog().list().await?;
    let product = state
        .catalog()
        .get(&id)
        .await
        .ok_or_else(|| CliError::NotFound(id.to_string()))?;
    out.item(&product, |p| {
        format!(
            "{}\n  id:       {}\n  price:    {}\n  category: {}\n  added:    {}\n\n{}",
            p.name,
            p.id,
            p.price,
            p.category,
            p.created_at.format("%Y-%m-%d"),
            p.description
        )
    })
}

pub async fn list_services(state: &AppState, out: &Output, recent: bool) -> Result<(), CliError> {
    if recent {
        let services = state.services().recent(RECENT_SERVICES_LIMIT).await?;
        return out.list(&services, |s| {
            format!(
                "{}  {}  {}\n    {}",
                s.id,
                s.title,
                s.price,
                excerpt(&s.description, EXCERPT_CHARS)
            )
        });
    }

    let services = state.services().list().await?;
    out.list(&services, render_service)
}

pub async fn list_highlights(state: &AppState, out: &Output, all: bool) -> Result<(), CliError> {
    let highlights = if all {
        state.highlights().list().await?
    } else {
        state.highlights().active().await?
    };
    out.list(&highlights, render_highlight)
}

pub fn render_product(p: &Product) -> String {
    format!(
        "{}  {}  {}  [{}]\n    {}",
        p.id,
        p.name,
        p.price,
        p.category,
        excerpt(&p.description, EXCERPT_CHARS)
    )
}

pub fn render_service(s: &Service) -> String {
    let popular = if s.is_highlighted { "  (Popular)" } else { "" };
    format!(
        "{}  {}{popular}  {}  [{}]\n    {}\n    features: {}",
        s.id,
        s.title,
        s.price,
        s.category,
        s.description,
        s.features.join(", ")
    )
}

pub fn render_highlight(h: &ServiceHighlight) -> String {
    let mut flags = Vec::new();
    if is_no_charge_highlight(h) {
        flags.push("included");
    }
    if !h.is_active {
        flags.push("inactive");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!("  ({})", flags.join(", "))
    };
    format!(
        "{}. {} [{}]{flags}  id={}\n    {}",
        h.order, h.title, h.icon, h.id, h.description
    )
}
