//! HTTP routes for the server

mod auth;
mod body;
mod health;
mod phones;
mod session;

pub use session::{bearer_token, require_session};

use std::sync::Arc;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::AppState;
use crate::store::{ContactStore, SessionStore, UserStore};

/// Create the API router with permissive CORS and no static files
pub fn create_router<U, S, C>(state: Arc<AppState<U, S, C>>) -> Router
where
    U: UserStore + 'static,
    S: SessionStore + 'static,
    C: ContactStore + 'static,
{
    create_router_with_config(state, &Config::default())
}

/// Create the router honoring the CORS and static file settings
pub fn create_router_with_config<U, S, C>(state: Arc<AppState<U, S, C>>, config: &Config) -> Router
where
    U: UserStore + 'static,
    S: SessionStore + 'static,
    C: ContactStore + 'static,
{
    let router = Router::new()
        .route("/api/health", get(health::health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/phone", put(auth::update_phone))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/phones", get(phones::list_phones).post(phones::add_phone))
        .route(
            "/api/phones/:id",
            put(phones::update_phone).delete(phones::delete_phone),
        );

    // Serve the built front end, falling back to index.html for client routes
    let router = match &config.static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => router,
    };

    router
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
