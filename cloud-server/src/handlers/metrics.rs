//! Model metrics handler

use std::path::Path;

use axum::{extract::State, Json};
use phishguard_core::logic::model::ClassificationReport;

use crate::{AppError, AppResult, AppState};

/// Persisted metrics, None when the pipeline has not written any
pub async fn read_metrics(path: &Path) -> AppResult<Option<ClassificationReport>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub async fn get(State(state): State<AppState>) -> AppResult<Json<ClassificationReport>> {
    read_metrics(&state.config.metrics_path)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Metrics not found".to_string()))
}
