//! Register handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use phishguard_core::logic::register::{filter_by_level, levels_present, RegisterRow};
use phishguard_core::logic::risk::RiskLevel;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::state::RegisterSnapshot;
use crate::{AppError, AppResult, AppState};

pub const DEFAULT_LIMIT: usize = 100;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegisterQuery {
    /// Low, Medium or High (case-insensitive); empty means all
    pub risk_level: Option<String>,
    #[validate(range(min = 1, max = 10000))]
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl RegisterQuery {
    fn level(&self) -> AppResult<Option<RiskLevel>> {
        match self.risk_level.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|e: phishguard_core::logic::risk::ParseRiskLevelError| {
                    AppError::ValidationError(e.to_string())
                }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterPage {
    pub snapshot: SnapshotResponse,
    pub risk_level: Option<RiskLevel>,
    /// Rows matching the filter, before paging
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub rows: Vec<RegisterRow>,
}

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub snapshot_id: Uuid,
    pub source: String,
    pub rows: usize,
}

impl From<&RegisterSnapshot> for SnapshotResponse {
    fn from(snapshot: &RegisterSnapshot) -> Self {
        Self {
            snapshot_id: snapshot.id,
            source: snapshot.source.clone(),
            rows: snapshot.rows.len(),
        }
    }
}

/// List register rows, optionally filtered by level
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<RegisterQuery>, QueryRejection>,
) -> AppResult<Json<RegisterPage>> {
    let Query(query) = query?;
    query.validate()?;
    let level = query.level()?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let offset = query.offset.unwrap_or(0);

    let snapshot = state.snapshot().await;
    let matching = filter_by_level(&snapshot.rows, level);
    let rows = matching
        .iter()
        .skip(offset)
        .take(limit)
        .map(|r| (*r).clone())
        .collect();

    Ok(Json(RegisterPage {
        snapshot: SnapshotResponse::from(snapshot.as_ref()),
        risk_level: level,
        total: matching.len(),
        offset,
        limit,
        rows,
    }))
}

/// Replace the served register with an uploaded CSV
pub async fn upload(
    State(state): State<AppState>,
    body: String,
) -> AppResult<(StatusCode, Json<SnapshotResponse>)> {
    let snapshot = RegisterSnapshot::from_csv(body.as_bytes(), "upload")?;
    let snapshot = state.replace(snapshot).await;
    tracing::info!("Register replaced by upload: {} ({} rows)", snapshot.id, snapshot.rows.len());

    Ok((StatusCode::CREATED, Json(SnapshotResponse::from(snapshot.as_ref()))))
}

/// Revert to the persisted register
pub async fn reset(State(state): State<AppState>) -> AppResult<Json<SnapshotResponse>> {
    let snapshot = RegisterSnapshot::load_default(&state.config.register_path).await?;
    let snapshot = state.replace(snapshot).await;
    tracing::info!("Register reset to {}", snapshot.source);

    Ok(Json(SnapshotResponse::from(snapshot.as_ref())))
}

/// Levels present in the served register (filter choices)
pub async fn levels(State(state): State<AppState>) -> Json<Vec<RiskLevel>> {
    let snapshot = state.snapshot().await;
    Json(levels_present(&snapshot.rows))
}
