//! REST API exposure for the marketplace
//!
//! Each area (public venues, customer auth, vendor portal, admin) owns a
//! `router()` returning `Router<AppState>`. The exposure merges them, adds the
//! health probes and the HTTP layers, then binds the shared host as state.

pub mod admin;
pub mod auth;
pub mod multipart;
pub mod vendor;
pub mod venues;

use super::super::host::{AppState, ServerHost};
use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Upper bound for one request body
///
/// A venue form may carry several images of up to the per-file limit, so the
/// axum default of 2 MB is far too small.
pub const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// `custom_routes` are merged after the built-in areas and share their
    /// state, so they can use the same extractors.
    pub fn build_router(
        host: Arc<ServerHost>,
        custom_routes: Vec<Router<AppState>>,
    ) -> Result<Router> {
        let mut app = Self::health_routes()
            .merge(venues::router())
            .merge(auth::router())
            .merge(vendor::router())
            .merge(admin::router());

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(host))
    }

    fn health_routes() -> Router<AppState> {
        Router::new()
            .route("/", get(Self::health_check))
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "message": "Shadiejo API is running"
        }))
    }
}
