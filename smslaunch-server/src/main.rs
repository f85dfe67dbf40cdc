//! SMS Launcher Server
//!
//! Contact storage and identity service for the SMS Launcher clients.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smslaunch_server::{
    routes, AppState, Config, ContactStore, InMemoryContactStore, InMemorySessionStore,
    InMemoryUserStore, SessionStore, SqliteStore, UserStore,
};

/// How often expired sessions are purged
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smslaunch_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(?config, "Loaded configuration");

    match &config.database_path {
        Some(path) => {
            let store = Arc::new(SqliteStore::open(&path.to_string_lossy())?);
            tracing::info!(path = %path.display(), "Using SQLite store");
            let state = AppState::new(store.clone(), store.clone(), store);
            serve(state, &config).await
        }
        None => {
            tracing::warn!("DATABASE_PATH not set, contacts will not survive a restart");
            let state = AppState::new(
                InMemoryUserStore::new(),
                InMemorySessionStore::new(),
                InMemoryContactStore::new(),
            );
            serve(state, &config).await
        }
    }
}

async fn serve<U, S, C>(state: AppState<U, S, C>, config: &Config) -> Result<()>
where
    U: UserStore + 'static,
    S: SessionStore + 'static,
    C: ContactStore + 'static,
{
    let state = Arc::new(
        state
            .with_session_ttl(config.session_ttl())
            .with_password_cost(config.password_cost),
    );

    // Purge expired sessions in the background
    let sessions = state.session_store.clone();
    let ttl = state.session_ttl;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            match sessions.delete_expired(ttl) {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Purged expired sessions"),
                Err(e) => tracing::warn!(error = %e, "Session purge failed"),
            }
        }
    });

    // Create router
    let app = routes::create_router_with_config(state, config);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
