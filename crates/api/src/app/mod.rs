//! HTTP application wiring (axum router + service wiring).
//!
//! - `services.rs`: catalog provider and spot price cache wiring
//! - `routes/`: HTTP handlers
//! - `dto.rs`: query-string DTOs and their validation
//! - `errors.rs`: consistent JSON error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(config)?);
    Ok(router_with_services(services, config))
}

/// Router over caller-supplied services, for tests and alternative wiring.
pub fn router_with_services(services: Arc<AppServices>, config: &AppConfig) -> Router {
    Router::new()
        .nest("/api", routes::router())
        .nest_service("/avenir", ServeDir::new(config.fonts_dir.join("avenir")))
        .nest_service("/montserrat", ServeDir::new(config.fonts_dir.join("montserrat")))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::cors_layer(&config.cors))
                .layer(Extension(services)),
        )
}
