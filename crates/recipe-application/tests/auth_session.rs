mod common;

use common::{Call, MockRecipeApi, chef};
use recipe_application::AuthSessionManager;
use recipe_core::error::RecipeError;
use recipe_core::session::{AuthMode, CREDENTIALS_RULE_MESSAGE, Credentials, Identity, Session};
use std::sync::Arc;

fn manager(api: MockRecipeApi) -> (Arc<MockRecipeApi>, AuthSessionManager) {
    let api = Arc::new(api);
    (api.clone(), AuthSessionManager::new(api))
}

#[tokio::test]
async fn test_initialize_restores_identity() {
    let (_, auth) = manager(MockRecipeApi::new().with_me(Ok(Some(Identity::new("chef1")))));
    assert!(auth.is_initializing().await);

    let session = auth.initialize().await;

    assert_eq!(session, Session::Authenticated(Identity::new("chef1")));
    assert!(!auth.is_initializing().await);
}

#[tokio::test]
async fn test_initialize_without_session_is_anonymous() {
    let (_, auth) = manager(MockRecipeApi::new().with_me(Ok(None)));

    assert_eq!(auth.initialize().await, Session::Anonymous);
    assert!(!auth.is_initializing().await);
}

#[tokio::test]
async fn test_initialize_fails_open_on_any_error() {
    let (_, auth) = manager(
        MockRecipeApi::new().with_me(Err(RecipeError::transport("connection refused"))),
    );

    assert_eq!(auth.initialize().await, Session::Anonymous);
    assert!(!auth.is_initializing().await);
}

#[tokio::test]
async fn test_login_validation_happens_before_network() {
    let (api, auth) = manager(MockRecipeApi::new());

    let err = auth
        .login(&Credentials::new("ab", "secret1"))
        .await
        .unwrap_err();

    assert_eq!(err, RecipeError::validation(CREDENTIALS_RULE_MESSAGE));
    assert!(api.calls().is_empty());
    assert_eq!(auth.session().await, Session::Anonymous);
}

#[tokio::test]
async fn test_register_validation_checks_password() {
    let (api, auth) = manager(MockRecipeApi::new());

    let err = auth
        .register(&Credentials::new("chef1", "short"))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_login_success_sets_session() {
    let (api, auth) = manager(MockRecipeApi::new());

    let session = auth.login(&chef()).await.unwrap();

    assert_eq!(session.username(), Some("chef1"));
    assert_eq!(auth.session().await, session);
    assert_eq!(api.calls(), vec![Call::Login("chef1".to_string())]);
}

#[tokio::test]
async fn test_login_failure_keeps_previous_session() {
    let (api, auth) = manager(MockRecipeApi::new());
    auth.login(&chef()).await.unwrap();

    api.set_login(Err(RecipeError::request(401, "Invalid credentials")));
    let err = auth
        .login(&Credentials::new("chef2", "wrongpass"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(auth.session().await.username(), Some("chef1"));
}

#[tokio::test]
async fn test_register_establishes_session() {
    let (api, auth) = manager(MockRecipeApi::new());
    api.set_register(Ok(Identity::new("newcook")));

    let session = auth
        .register(&Credentials::new("newcook", "password"))
        .await
        .unwrap();

    assert_eq!(session.username(), Some("newcook"));
    assert_eq!(api.calls(), vec![Call::Register("newcook".to_string())]);
}

#[tokio::test]
async fn test_submit_follows_mode_and_resets_to_login() {
    let (api, auth) = manager(MockRecipeApi::new());
    assert_eq!(auth.toggle_mode().await, AuthMode::Register);

    auth.submit(&chef()).await.unwrap();

    assert_eq!(api.calls(), vec![Call::Register("chef1".to_string())]);
    assert_eq!(auth.mode().await, AuthMode::Login);
}

#[tokio::test]
async fn test_failed_submit_keeps_mode() {
    let (api, auth) = manager(MockRecipeApi::new());
    auth.toggle_mode().await;
    api.set_register(Err(RecipeError::request(400, "Username taken")));

    assert!(auth.submit(&chef()).await.is_err());
    assert_eq!(auth.mode().await, AuthMode::Register);
}

#[tokio::test]
async fn test_logout_clears_session_even_when_request_fails() {
    let (api, auth) = manager(MockRecipeApi::new());
    auth.login(&chef()).await.unwrap();
    api.set_logout(Err(RecipeError::transport("offline")));

    auth.logout().await;

    assert_eq!(auth.session().await, Session::Anonymous);
    assert!(api.calls().contains(&Call::Logout));
}
