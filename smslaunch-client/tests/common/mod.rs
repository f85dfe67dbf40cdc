//! Common test utilities for client integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use smslaunch_client::{ApiClient, ClientSession};
use smslaunch_core::{Launcher, SmsUri};
use smslaunch_server::{
    routes, AppState, InMemoryContactStore, InMemorySessionStore, InMemoryUserStore,
};
use tokio::net::TcpListener;

/// Start the real router on an ephemeral port and return its base URL
pub async fn spawn_server() -> String {
    let state = Arc::new(
        AppState::new(
            InMemoryUserStore::new(),
            InMemorySessionStore::new(),
            InMemoryContactStore::new(),
        )
        .with_password_cost(4),
    );
    let app = routes::create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Fresh server plus a signed-in session
pub async fn signed_in(email: &str) -> (ApiClient, ClientSession) {
    let base_url = spawn_server().await;
    let api = ApiClient::new();
    let mut session = ClientSession::new(base_url);
    session.register(&api, email, "password123").await.unwrap();
    (api, session)
}

/// Launcher that remembers every URI it was given
#[derive(Debug, Clone, Default)]
pub struct RecordingLauncher {
    launched: Arc<Mutex<Vec<String>>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uris(&self) -> Vec<String> {
        self.launched.lock().unwrap().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, uri: &SmsUri) {
        self.launched.lock().unwrap().push(uri.to_string());
    }
}
