//! Liveness endpoint for the chart builder.
//!
//! Answers without touching the database or the export directory, so load
//! balancers can poll it freely.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;
use coa_core::chart::ChartBackend;

/// Liveness response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` when the process can answer.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Crate version.
    pub version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "coa-builder",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /health`, open to everyone.
pub fn routes<B: ChartBackend>() -> Router<AppState<B>> {
    Router::new().route("/health", get(health_check))
}
