//! Client session lifecycle against a live server

mod common;

use common::{signed_in, spawn_server};
use smslaunch_client::{ApiClient, ClientError, ClientSession};
use tempfile::TempDir;

#[tokio::test]
async fn test_register_then_restore_from_token_file() {
    let base_url = spawn_server().await;
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("token");
    let api = ApiClient::new();

    let mut session = ClientSession::new(base_url.clone()).with_token_file(&token_file);
    session
        .register(&api, "alice@example.com", "password123")
        .await
        .unwrap();
    assert!(token_file.exists());

    // A new process picks the token up again
    let mut restored = ClientSession::new(base_url).with_token_file(&token_file);
    let user = restored.init_on_load(&api).await.unwrap().cloned();
    assert_eq!(user.unwrap().email, "alice@example.com");
    assert!(restored.is_authenticated());
}

#[tokio::test]
async fn test_init_on_load_without_token() {
    let base_url = spawn_server().await;
    let dir = TempDir::new().unwrap();
    let api = ApiClient::new();

    let mut session = ClientSession::new(base_url).with_token_file(dir.path().join("token"));
    assert!(session.init_on_load(&api).await.unwrap().is_none());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_rejected_token_is_discarded() {
    let base_url = spawn_server().await;
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("token");
    std::fs::write(&token_file, "stale-token").unwrap();
    let api = ApiClient::new();

    let mut session = ClientSession::new(base_url).with_token_file(&token_file);
    assert!(session.init_on_load(&api).await.unwrap().is_none());
    assert!(session.token().is_none());
    assert!(!token_file.exists());
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let (api, mut session) = signed_in("bob@example.com").await;
    let old = session.clone();

    session.logout(&api).await.unwrap();
    assert!(!session.is_authenticated());

    let err = api.me(&old).await.unwrap_err();
    assert!(err.is_auth());
}

#[tokio::test]
async fn test_login_errors() {
    let (api, session) = signed_in("carol@example.com").await;
    let mut other = ClientSession::new(session.base_url().to_string());

    let err = other
        .login(&api, "carol@example.com", "wrong-password")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Auth(ref m) if m == "Invalid credentials"));
    assert!(!other.is_authenticated());

    let err = other
        .register(&api, "carol@example.com", "password123")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation { ref message, .. } if message == "Email already exists"));
}

#[tokio::test]
async fn test_update_phone() {
    let (api, mut session) = signed_in("dave@example.com").await;

    let user = session.update_phone(&api, "(555) 123-4567").await.unwrap();
    assert_eq!(user.phone_number.as_deref(), Some("5551234567"));

    let err = session.update_phone(&api, "nope").await.unwrap_err();
    assert_eq!(err.field_errors()[0].path, "phoneNumber");

    let user = session.update_phone(&api, "").await.unwrap();
    assert!(user.phone_number.is_none());
}

#[tokio::test]
async fn test_calls_without_token_fail_locally() {
    let session = ClientSession::new("http://127.0.0.1:9");
    let api = ApiClient::new();

    let err = api.list_contacts(&session).await.unwrap_err();
    assert!(err.is_auth());
}

#[tokio::test]
async fn test_logout_discards_token_when_server_unreachable() {
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("token");
    std::fs::write(&token_file, "stale-token").unwrap();
    let api = ApiClient::new();

    // Nothing listens on port 1
    let mut session = ClientSession::new("http://127.0.0.1:1").with_token_file(&token_file);
    assert!(session.restore_token().unwrap());

    session.logout(&api).await.unwrap();
    assert!(session.token().is_none());
    assert!(!token_file.exists());
}
