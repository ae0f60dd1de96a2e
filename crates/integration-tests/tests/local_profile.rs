//! Persistence of the on-device lists across application restarts.
//!
//! Each test opens an `AppState` over a temp profile directory, mutates it,
//! drops it and opens a fresh one over the same directory.

use std::path::Path;
use std::sync::Arc;

use balaji_core::{HighlightIcon, HighlightId, HighlightInput, ServiceId, ServiceInput};
use balaji_integration_tests::{ADMIN_PASSWORD, RecordingOpener, product_input, test_config};
use balaji_site::local::{LocalStoreError, keys};
use balaji_site::{AppState, SiteError};
use tempfile::TempDir;

async fn open(dir: &Path) -> AppState {
    let state = AppState::from_config(test_config(dir), Arc::new(RecordingOpener::default()))
        .await
        .expect("state opens");
    state
        .login(&mut ADMIN_PASSWORD.to_string())
        .await
        .expect("login");
    state
}

fn compound_walls() -> ServiceInput {
    ServiceInput {
        title: "Compound Walls".to_string(),
        description: "RCC compound walls for plots".to_string(),
        price: "Quote on Request".to_string(),
        image_url: String::new(),
        features: Some("RCC, Precast, ".to_string()),
        category: "Construction".to_string(),
        is_highlighted: true,
    }
}

// =============================================================================
// Services
// =============================================================================

#[tokio::test]
async fn test_fresh_profile_shows_default_services() {
    let dir = TempDir::new().expect("temp dir");
    let state = open(dir.path()).await;

    let services = state.services().list().await.expect("list");
    assert_eq!(services.len(), 4);
    assert_eq!(
        services.first().map(|s| s.title.as_str()),
        Some("Boundary Walls")
    );
    assert!(!dir.path().join(format!("{}.json", keys::SERVICES)).exists());
}

#[tokio::test]
async fn test_created_service_survives_restart() {
    let dir = TempDir::new().expect("temp dir");

    let created = {
        let state = open(dir.path()).await;
        state
            .create_service(compound_walls())
            .await
            .expect("create")
    };
    assert_eq!(created.features, vec!["RCC", "Precast", ""]);

    let state = open(dir.path()).await;
    let services = state.services().list().await.expect("list");
    assert_eq!(services.len(), 5);
    assert_eq!(services.last(), Some(&created));

    let recent = state.services().recent(3).await.expect("recent");
    assert_eq!(recent.len(), 3);
    assert_eq!(recent.first().map(|s| &s.id), Some(&created.id));
}

#[tokio::test]
async fn test_removed_default_service_stays_removed() {
    let dir = TempDir::new().expect("temp dir");

    {
        let state = open(dir.path()).await;
        state
            .remove_service(&ServiceId::new("1"))
            .await
            .expect("remove");
    }

    let state = open(dir.path()).await;
    let services = state.services().list().await.expect("list");
    assert_eq!(services.len(), 3);
    assert!(services.iter().all(|s| s.id.as_str() != "1"));
}

// =============================================================================
// Highlights
// =============================================================================

#[tokio::test]
async fn test_deactivated_highlight_hidden_after_restart() {
    let dir = TempDir::new().expect("temp dir");

    {
        let state = open(dir.path()).await;
        let id = HighlightId::new("3");
        let current = state
            .highlights()
            .get(&id)
            .await
            .expect("get")
            .expect("default highlight exists");
        state
            .update_highlight(
                &id,
                HighlightInput {
                    title: current.title,
                    description: current.description,
                    icon: current.icon,
                    is_active: false,
                    order: current.order,
                },
            )
            .await
            .expect("update");
        state
            .create_highlight(HighlightInput {
                title: "Expert Team".to_string(),
                description: "Experienced installers".to_string(),
                icon: HighlightIcon::Users,
                is_active: true,
                order: 0,
            })
            .await
            .expect("create");
    }

    let state = open(dir.path()).await;
    assert_eq!(state.highlights().list().await.expect("list").len(), 5);

    let active: Vec<String> = state
        .highlights()
        .active()
        .await
        .expect("active")
        .into_iter()
        .map(|h| h.title)
        .collect();
    assert_eq!(
        active,
        vec![
            "Expert Team",
            "No Delivery Charges",
            "No Installation Charges",
            "Quality Guarantee"
        ]
    );
}

// =============================================================================
// Inquiry
// =============================================================================

#[tokio::test]
async fn test_inquiry_survives_restart_and_clear_empties_it() {
    let dir = TempDir::new().expect("temp dir");

    {
        let state = open(dir.path()).await;
        let id = state
            .create_product(product_input("Gate A", "₹5,000", "Gates"))
            .await
            .expect("create");
        assert!(state.add_to_inquiry(&id).await.expect("add"));
    }

    // Products live in the remote store; the inquiry keeps its own copy.
    let state = open(dir.path()).await;
    let items = state.inquiry().items().await.expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().map(|p| p.name.as_str()), Some("Gate A"));

    state.inquiry().clear().await.expect("clear");
    drop(state);

    let state = open(dir.path()).await;
    assert!(state.inquiry().items().await.expect("items").is_empty());
}

// =============================================================================
// Corruption
// =============================================================================

#[tokio::test]
async fn test_corrupt_file_reports_key() {
    let dir = TempDir::new().expect("temp dir");
    tokio::fs::write(
        dir.path().join(format!("{}.json", keys::HIGHLIGHTS)),
        "{not json",
    )
    .await
    .expect("write corrupt file");

    let state = open(dir.path()).await;
    let result = state.highlights().list().await;

    assert!(matches!(
        result,
        Err(SiteError::Local(LocalStoreError::Corrupt { key, .. })) if key == keys::HIGHLIGHTS
    ));
    // Other lists are unaffected.
    assert_eq!(state.services().list().await.expect("list").len(), 4);
}
