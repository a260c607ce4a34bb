//! Reports handlers

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use phishguard_core::logic::register::{summarize, RegisterSummary};
use phishguard_core::logic::report::ComplianceReport;
use phishguard_core::logic::risk::{RiskLevel, RiskThresholds};
use serde::Serialize;

use super::metrics::read_metrics;
use crate::{AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct ControlMapping {
    pub thresholds: RiskThresholds,
    pub controls: Vec<ControlEntry>,
    pub overall_recommendation: String,
}

#[derive(Debug, Serialize)]
pub struct ControlEntry {
    pub risk_level: RiskLevel,
    pub grc_control: String,
    pub gdpr_compliance_score: u8,
    pub gdpr_reference: String,
    pub recommendation: String,
}

/// Risk summary for the served register
pub async fn summary(State(state): State<AppState>) -> Json<RegisterSummary> {
    let snapshot = state.snapshot().await;
    Json(summarize(&snapshot.rows, &state.policy))
}

/// Control mapping table, most severe first
pub async fn controls(State(state): State<AppState>) -> Json<ControlMapping> {
    let policy = &state.policy;
    let controls = RiskLevel::SUMMARY_ORDER
        .into_iter()
        .map(|level| {
            let control = policy.control(level);
            ControlEntry {
                risk_level: level,
                grc_control: control.grc_control.clone(),
                gdpr_compliance_score: control.gdpr_compliance_score,
                gdpr_reference: control.gdpr_reference.clone(),
                recommendation: control.recommendation.clone(),
            }
        })
        .collect();

    Json(ControlMapping {
        thresholds: policy.thresholds,
        controls,
        overall_recommendation: policy.overall_recommendation.clone(),
    })
}

/// Markdown compliance report for the served register
pub async fn compliance(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let snapshot = state.snapshot().await;
    let metrics = read_metrics(&state.config.metrics_path).await?;

    let body = ComplianceReport::new(&snapshot.rows, &state.policy)
        .with_metrics(metrics.as_ref())
        .render();

    Ok(([(header::CONTENT_TYPE, "text/markdown; charset=utf-8")], body))
}
