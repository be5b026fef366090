use axum::{Json, Router, routing::get};
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: &'static str,
}

const UP: HealthStatus = HealthStatus { status: "UP" };

pub async fn healthz() -> Json<HealthStatus> {
    Json(UP)
}

pub async fn readyz() -> Json<HealthStatus> {
    Json(UP)
}

/// `GET /healthz` (liveness) and `GET /readyz` (readiness).
pub fn health_routes() -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
