//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST routes for chart editing, submission and export
//! - Bearer token authentication middleware
//! - JSON error responses

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use coa_core::chart::{ChartBackend, ChartService};
use coa_shared::JwtService;

pub use error::ApiError;

/// Application state shared across handlers.
pub struct AppState<B: ChartBackend> {
    /// Chart service over the configured backend.
    pub charts: Arc<ChartService<B>>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
}

impl<B: ChartBackend> AppState<B> {
    /// Creates the state from its services.
    pub fn new(charts: ChartService<B>, jwt_service: JwtService) -> Self {
        Self {
            charts: Arc::new(charts),
            jwt_service: Arc::new(jwt_service),
        }
    }
}

// Manual impl: `B` itself need not be `Clone`.
impl<B: ChartBackend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            charts: Arc::clone(&self.charts),
            jwt_service: Arc::clone(&self.jwt_service),
        }
    }
}

/// Creates the main application router.
pub fn create_router<B: ChartBackend>(state: AppState<B>) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
