//! Health Check API Handler
//!
//! Liveness endpoint for the cluster's probes.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

/// GET /health-check
/// Health check endpoint
pub async fn health_check() -> Json<Health> {
    Json(Health { status: "ok" })
}
