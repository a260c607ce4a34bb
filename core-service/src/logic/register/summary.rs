//! Register aggregation: level counts, average compliance, filtering

use serde::{Deserialize, Serialize};

use super::record::RegisterRow;
use crate::logic::risk::{ControlPolicy, RiskLevel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelCount {
    pub risk_level: RiskLevel,
    pub count: usize,
    pub gdpr_reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterSummary {
    pub total: usize,
    /// Always High, Medium, Low - zero counts included
    pub levels: Vec<LevelCount>,
    /// None for an empty register
    pub average_compliance_score: Option<f64>,
}

impl RegisterSummary {
    pub fn count(&self, level: RiskLevel) -> usize {
        self.levels
            .iter()
            .find(|l| l.risk_level == level)
            .map(|l| l.count)
            .unwrap_or(0)
    }

    /// `70.0/100`, or `n/a` when nothing was assessed
    pub fn average_display(&self) -> String {
        match self.average_compliance_score {
            Some(avg) => format!("{:.1}/100", avg),
            None => "n/a".to_string(),
        }
    }
}

pub fn summarize(rows: &[RegisterRow], policy: &ControlPolicy) -> RegisterSummary {
    let levels = RiskLevel::SUMMARY_ORDER
        .iter()
        .map(|&level| LevelCount {
            risk_level: level,
            count: rows.iter().filter(|r| r.risk_level == level).count(),
            gdpr_reference: policy.control(level).gdpr_reference.clone(),
        })
        .collect();

    let average_compliance_score = if rows.is_empty() {
        None
    } else {
        let sum: u64 = rows.iter().map(|r| r.gdpr_compliance_score as u64).sum();
        Some(sum as f64 / rows.len() as f64)
    };

    RegisterSummary {
        total: rows.len(),
        levels,
        average_compliance_score,
    }
}

/// Rows at `level`, or every row for None, in register order
pub fn filter_by_level(rows: &[RegisterRow], level: Option<RiskLevel>) -> Vec<&RegisterRow> {
    rows.iter()
        .filter(|r| level.map_or(true, |l| r.risk_level == l))
        .collect()
}

/// Distinct levels in order of first appearance
pub fn levels_present(rows: &[RegisterRow]) -> Vec<RiskLevel> {
    let mut levels = Vec::with_capacity(RiskLevel::SUMMARY_ORDER.len());
    for row in rows {
        if !levels.contains(&row.risk_level) {
            levels.push(row.risk_level);
        }
    }
    levels
}
