//! Admin password gate as seen through the application state.

use balaji_core::{ServiceId, ServiceInput};
use balaji_integration_tests::{ADMIN_PASSWORD, TestContext, product_input};
use balaji_site::SiteError;
use balaji_site::gate::AuthError;
use balaji_site::state::{AdminTab, Language};

fn fencing() -> ServiceInput {
    ServiceInput {
        title: "Fencing".to_string(),
        description: "Chain link fencing".to_string(),
        price: "₹90/ft".to_string(),
        image_url: String::new(),
        features: Some("Galvanised".to_string()),
        category: "Fencing".to_string(),
        is_highlighted: false,
    }
}

#[tokio::test]
async fn test_wrong_password_rejected_and_input_cleared() {
    let ctx = TestContext::new();

    let mut input = "wrong".to_string();
    let result = ctx.state.login(&mut input).await;

    assert_eq!(result, Err(AuthError::IncorrectPassword));
    assert!(input.is_empty());
    assert!(!ctx.state.session().await.authenticated);
    assert_eq!(
        AuthError::IncorrectPassword.to_string(),
        "Incorrect password. Please try again."
    );
}

#[tokio::test]
async fn test_password_is_case_and_whitespace_sensitive() {
    let ctx = TestContext::new();

    for attempt in [" 1234#", "1234# ", "1234"] {
        let mut input = attempt.to_string();
        assert!(ctx.state.login(&mut input).await.is_err(), "{attempt:?}");
    }
    assert!(!ctx.state.session().await.authenticated);
}

#[tokio::test]
async fn test_correct_password_unlocks_admin_operations() {
    let ctx = TestContext::new();

    let mut input = ADMIN_PASSWORD.to_string();
    ctx.state.login(&mut input).await.expect("login");
    assert!(ctx.state.session().await.authenticated);

    let service = ctx
        .state
        .create_service(fencing())
        .await
        .expect("create service");
    assert_eq!(service.title, "Fencing");
}

#[tokio::test]
async fn test_visitor_is_refused_every_admin_operation() {
    let ctx = TestContext::new();

    let refused = |result: Result<(), SiteError>| {
        matches!(result, Err(SiteError::Auth(AuthError::NotAuthenticated)))
    };

    assert!(refused(
        ctx.state
            .create_product(product_input("Gate A", "₹5,000", "Gates"))
            .await
            .map(|_| ())
    ));
    assert!(refused(
        ctx.state.create_service(fencing()).await.map(|_| ())
    ));
    assert!(refused(ctx.state.remove_service(&ServiceId::new("1")).await));

    // Nothing was touched.
    assert_eq!(ctx.state.services().list().await.expect("list").len(), 4);
}

#[tokio::test]
async fn test_logout_locks_again() {
    let ctx = TestContext::new();
    ctx.login().await;
    ctx.state.logout().await;

    let result = ctx.state.remove_service(&ServiceId::new("1")).await;
    assert!(matches!(
        result,
        Err(SiteError::Auth(AuthError::NotAuthenticated))
    ));
}

#[tokio::test]
async fn test_session_defaults_and_toggles() {
    let ctx = TestContext::new();

    let session = ctx.state.session().await;
    assert_eq!(session.tab, AdminTab::Products);
    assert_eq!(session.language, Language::Hindi);

    assert_eq!(ctx.state.toggle_language().await, Language::English);
    ctx.state.set_tab(AdminTab::Highlights).await;

    let session = ctx.state.session().await;
    assert_eq!(session.tab, AdminTab::Highlights);
    assert_eq!(session.language.code(), "en");
}
