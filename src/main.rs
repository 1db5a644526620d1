//! dashgate — auth gateway for the admin dashboard.
//!
//! Fronts the dashboard pages with the route guard and exposes the session
//! endpoints, delegating credential exchange and profile fetches to the
//! upstream REST API.

mod config;
mod guard;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env();
    let port = config.port;

    let backend =
        services::api::HttpAuthBackend::new(config.upstream_api_url.clone()).expect("http client init failed");
    tracing::info!(upstream = %config.upstream_api_url, "auth backend ready");

    let state = state::AppState::new(config, Arc::new(backend));
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "dashgate listening");
    axum::serve(listener, app).await.expect("server failed");
}
