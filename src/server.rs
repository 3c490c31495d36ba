//! # Server Module
//!
//! HTTP server setup and route configuration for the frontend.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tower_sessions::SessionManagerLayer;

use crate::config::Config;
use crate::relay::CredentialRelay;
use crate::routes::{auth, debug, health::ping, pages};
use crate::session::{MemoryStore, session_layer, spawn_purge_task};
use crate::upstream::ApiClient;
use crate::views::Page;

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub relay: CredentialRelay,
}

/// Assembles the router. Every page route runs inside the session layer;
/// `/ping` does not touch sessions.
pub fn build_router(
    state: AppState,
    sessions: SessionManagerLayer<MemoryStore>,
    debug_routes: bool,
) -> Router {
    let mut router = Router::new()
        .route("/", get(pages::index))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/users", get(pages::users))
        .route("/electrodomesticos", get(pages::appliances))
        .route("/logout", get(auth::logout));

    if debug_routes {
        tracing::warn!("Debug routes enabled, /debug/session is exposed");
        router = router.route("/debug/session", get(debug::session_report));
    }

    router
        .fallback(pages::not_found)
        .layer(sessions)
        .route("/ping", get(ping))
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

/// Last-resort handler: anything that panicked renders the error page.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Internal server error: {}", detail);
    Page::internal_error().into_response()
}

/// Starts the frontend HTTP server and runs until Ctrl+C.
pub async fn start(config: Config) -> Result<()> {
    let api = ApiClient::new(&config.api.base_url, config.api.timeout())?;
    let state = AppState {
        relay: CredentialRelay::new(Arc::new(api)),
    };

    let store = MemoryStore::new();
    let sessions = session_layer(
        store.clone(),
        config.session.ttl_secs,
        config.session.cookie_secure,
    );
    let purge = spawn_purge_task(
        store,
        Duration::from_secs(config.session.purge_interval_secs),
    );

    let app = build_router(state, sessions, config.debug_routes);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {} - port may already be in use", addr))?;

    tracing::info!("🚀 Frontend starting...");
    tracing::info!("📡 Listening on http://{}", addr);
    tracing::info!("🔗 Upstream API: {}", config.api.base_url);
    tracing::info!("🏥 Health check available at http://{}/ping", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    purge.abort();
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
