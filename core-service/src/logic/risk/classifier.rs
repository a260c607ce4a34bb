//! Risk Classifier
//!
//! Only the score → level → annotation logic. No types, no policy data.
//! Input: risk score in [0, 1]
//! Output: RiskLevel and its Annotation

use super::rules::{ControlPolicy, RiskThresholds};
use super::types::{Annotation, RiskLevel};

// ============================================================================
// MAIN CLASSIFICATION FUNCTION
// ============================================================================

/// Map a score onto a level with the default thresholds
pub fn classify(score: f64) -> RiskLevel {
    classify_with_thresholds(score, &RiskThresholds::default())
}

/// Classification with custom thresholds.
///
/// Both comparisons are strict: a score equal to a threshold falls into the
/// lower level.
pub fn classify_with_thresholds(score: f64, thresholds: &RiskThresholds) -> RiskLevel {
    if score > thresholds.high {
        RiskLevel::High
    } else if score > thresholds.medium {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Table lookup of control text and compliance score
pub fn annotate(level: RiskLevel, policy: &ControlPolicy) -> Annotation {
    let control = policy.control(level);
    Annotation {
        grc_control: control.grc_control.clone(),
        gdpr_compliance_score: control.gdpr_compliance_score,
    }
}

// ============================================================================
// TESTS
// ============================================================================
