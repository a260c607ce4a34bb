use serde::{Deserialize, Serialize};

use crate::logic::risk::{Annotation, RiskLevel};

/// Register column order
pub const REGISTER_COLUMNS: [&str; 5] = [
    "email_preview",
    "risk_score",
    "risk_level",
    "grc_control",
    "gdpr_compliance_score",
];

/// One assessed email. Built once, never updated in place.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RegisterRow {
    pub email_preview: String,
    /// Rounded to 2 decimals
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub grc_control: String,
    pub gdpr_compliance_score: u8,
}

impl RegisterRow {
    /// `level` comes from the unrounded score; only the stored score is rounded
    pub fn new(email_preview: String, score: f64, level: RiskLevel, annotation: Annotation) -> Self {
        Self {
            email_preview,
            risk_score: round2(score),
            risk_level: level,
            grc_control: annotation.grc_control,
            gdpr_compliance_score: annotation.gdpr_compliance_score,
        }
    }
}

/// Round half to even at 2 decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
