//! # Portal Frontend
//!
//! Server-rendered frontend for an upstream user/appliance API, built with
//! Axum and Tokio. Users log in through the upstream authentication API;
//! the issued bearer token is kept in a server-side session and relayed on
//! every protected upstream call.
//!
//! ## Architecture
//! - `config`: environment variable configuration
//! - `upstream`: HTTP client for the upstream API and its wire models
//! - `session`: cookie-keyed server-side sessions and their middleware
//! - `relay`: binds the session credential to upstream call outcomes
//! - `routes`: thin page handlers
//! - `views`: view models handed to the rendering layer
//! - `server`: router assembly and server lifecycle
//!
//! ## Environment Setup
//! Configuration is read from the environment, or from a `.env` file:
//! ```bash
//! API_BASE_URL=http://localhost:8000
//! PORT=5000
//! ```
//!
//! ## Running the Server
//! ```bash
//! RUST_LOG=info cargo run
//! ```

mod config;
mod credential;
mod relay;
mod routes;
mod server;
mod session;
mod upstream;
mod views;

#[cfg(test)]
mod testing;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment alone is enough.
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();

    tracing::info!("🏁 Starting frontend...");
    tracing::info!("📦 Package: {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    tracing::info!("🏗️  Build profile: {}", if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    });

    let config = config::Config::from_env()?;
    server::start(config).await
}
