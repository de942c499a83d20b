//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: builds stores, notifier and services from configuration
//! - `routes/`: HTTP handlers, one file per area
//! - `dto.rs`: request/response bodies and query parsing
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    http::{header::HeaderValue, Method},
    routing::get,
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (used by `main.rs` and the black-box tests).
pub fn build_app(services: Arc<AppServices>, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_log))
                .layer(cors_layer(allowed_origins))
                .layer(Extension(services)),
        )
}

/// Browser access for the listed origins only. Unparseable origins are
/// logged and dropped.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}
