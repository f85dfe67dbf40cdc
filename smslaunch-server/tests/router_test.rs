//! Router wiring: health, static files, CORS and the SQLite backend

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum_test::TestServer;
use common::{add_contact, list_contacts, register_user, TEST_PASSWORD_COST};
use serde_json::{json, Value};
use smslaunch_server::{routes, AppState, Config, SqliteStore};
use tempfile::TempDir;
use tower::ServiceExt;

fn sqlite_server(store: Arc<SqliteStore>) -> TestServer {
    let state = Arc::new(
        AppState::new(store.clone(), store.clone(), store).with_password_cost(TEST_PASSWORD_COST),
    );
    TestServer::new(routes::create_router(state)).expect("Failed to create test server")
}

fn memory_state() -> Arc<common::TestState> {
    Arc::new(
        AppState::new(
            smslaunch_server::InMemoryUserStore::new(),
            smslaunch_server::InMemorySessionStore::new(),
            smslaunch_server::InMemoryContactStore::new(),
        )
        .with_password_cost(TEST_PASSWORD_COST),
    )
}

#[tokio::test]
async fn test_health() {
    let app = routes::create_router(memory_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_static_dir_falls_back_to_index() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>launcher</html>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log('hi')").unwrap();

    let config = Config {
        static_dir: Some(dir.path().to_path_buf()),
        ..Config::default()
    };
    let app = routes::create_router_with_config(memory_state(), &config);
    let server = TestServer::new(app).unwrap();

    let response = server.get("/app.js").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text(), "console.log('hi')");

    // Client-side routes get the SPA shell
    let response = server.get("/contacts/42").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text(), "<html>launcher</html>");

    // API routes are still served by the handlers
    let response = server.get("/api/health").await;
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let config = Config {
        cors_origins: vec!["https://launcher.example".to_string()],
        ..Config::default()
    };
    let app = routes::create_router_with_config(memory_state(), &config);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/phones")
                .header(header::ORIGIN, "https://launcher.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "https://launcher.example"
    );
}

#[tokio::test]
async fn test_sqlite_backend_end_to_end() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let server = sqlite_server(store);

    let alice = register_user(&server, "alice@example.com", "password123").await;
    let bob = register_user(&server, "bob@example.com", "password123").await;
    add_contact(&server, &alice, "One", "5551000001").await;
    add_contact(&server, &alice, "Two", "5551000002").await;

    let phones = list_contacts(&server, &alice).await;
    assert_eq!(phones.len(), 2);
    assert_eq!(phones[0]["name"], "Two");
    assert!(list_contacts(&server, &bob).await.is_empty());

    let response = server
        .post("/api/auth/register")
        .json(&json!({ "email": "ALICE@example.com", "password": "password123" }))
        .await;
    assert_eq!(response.status_code(), 409);
}

#[tokio::test]
async fn test_sqlite_contacts_survive_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("launcher.db");
    let path = path.to_string_lossy();

    {
        let server = sqlite_server(Arc::new(SqliteStore::open(&path).unwrap()));
        let token = register_user(&server, "alice@example.com", "password123").await;
        add_contact(&server, &token, "Grandma", "+44 20 7946 0958").await;
    }

    let server = sqlite_server(Arc::new(SqliteStore::open(&path).unwrap()));
    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "alice@example.com", "password": "password123" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let token = body["token"].as_str().unwrap();

    let phones = list_contacts(&server, token).await;
    assert_eq!(phones.len(), 1);
    assert_eq!(phones[0]["name"], "Grandma");
    assert_eq!(phones[0]["number"], "+442079460958");
}
