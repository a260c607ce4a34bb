//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    register_snapshot: Uuid,
    register_rows: usize,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.snapshot().await;
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        register_snapshot: snapshot.id,
        register_rows: snapshot.rows.len(),
    })
}
