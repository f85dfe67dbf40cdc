//! Common test utilities for server integration tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use serde_json::{json, Value};
use smslaunch_server::{
    routes, AppState, InMemoryContactStore, InMemorySessionStore, InMemoryUserStore,
};

/// State backed by the in-memory stores
pub type TestState = AppState<InMemoryUserStore, InMemorySessionStore, InMemoryContactStore>;

/// Lowest bcrypt cost, keeps registration fast
pub const TEST_PASSWORD_COST: u32 = 4;

/// Create a test server over fresh in-memory stores
pub fn create_test_server() -> TestServer {
    create_test_context().0
}

/// Create a test server and keep a handle on its state
pub fn create_test_context() -> (TestServer, Arc<TestState>) {
    let state = Arc::new(
        AppState::new(
            InMemoryUserStore::new(),
            InMemorySessionStore::new(),
            InMemoryContactStore::new(),
        )
        .with_password_cost(TEST_PASSWORD_COST),
    );

    let app = routes::create_router(state.clone());
    let server = TestServer::new(app).expect("Failed to create test server");

    (server, state)
}

/// Authorization header carrying a bearer token
pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

/// Register a user and return its token
pub async fn register_user(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/api/auth/register")
        .json(&json!({ "email": email, "password": password }))
        .await;
    assert_eq!(response.status_code(), 201, "registration of {} failed", email);

    let body: Value = response.json();
    body["token"].as_str().unwrap().to_string()
}

/// Add a contact and return its JSON representation
pub async fn add_contact(server: &TestServer, token: &str, name: &str, number: &str) -> Value {
    let (name_header, value) = bearer(token);
    let response = server
        .post("/api/phones")
        .add_header(name_header, value)
        .json(&json!({ "name": name, "number": number }))
        .await;
    assert_eq!(response.status_code(), 201, "adding {} failed", name);

    let body: Value = response.json();
    body["phone"].clone()
}

/// List the caller's contacts
pub async fn list_contacts(server: &TestServer, token: &str) -> Vec<Value> {
    let (name, value) = bearer(token);
    let response = server.get("/api/phones").add_header(name, value).await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    body["phones"].as_array().unwrap().clone()
}
