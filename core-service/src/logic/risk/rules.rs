//! Risk Classification Rules & Control Policy
//!
//! Thresholds, compliance scores and control-framework text.
//! No classify logic here - only constants and config.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::types::RiskLevel;
use crate::error::{GrcError, GrcResult};

// ============================================================================
// THRESHOLDS (strictly greater-than at both boundaries)
// ============================================================================

/// Above this score = High
pub const HIGH_THRESHOLD: f64 = 0.7;

/// Above this score (and not High) = Medium, otherwise Low
pub const MEDIUM_THRESHOLD: f64 = 0.4;

// ============================================================================
// COMPLIANCE SCORES
// ============================================================================

pub const LOW_COMPLIANCE_SCORE: u8 = 90;
pub const MEDIUM_COMPLIANCE_SCORE: u8 = 70;
pub const HIGH_COMPLIANCE_SCORE: u8 = 50;

// ============================================================================
// CONTROL MAPPINGS
// ============================================================================

pub const HIGH_CONTROL: &str = "ISO 27001 A.5.26 (Incident Response) - Activate team; NIST PR.IP-9 (Response Planning); GDPR Article 33 (Breach Notification) - Report within 72 hours if data impacted";
pub const MEDIUM_CONTROL: &str = "NIST ID.RA-06 (Risk Prioritization) - Assess threat; ISO 27001 A.12.4.1 (Event Logging); GDPR Article 32 (Security of Processing) - Implement monitoring controls";
pub const LOW_CONTROL: &str = "ISO 27001 A.5.25 (Event Assessment) - Log trends; NIST DE.CM-1 (Monitoring); GDPR Article 25 (Data Protection by Design) - Review for ongoing compliance";

pub const HIGH_GDPR_REFERENCE: &str = "Article 33 - Breach Notification";
pub const MEDIUM_GDPR_REFERENCE: &str = "Article 32 - Security Processing";
pub const LOW_GDPR_REFERENCE: &str = "Article 25 - Data Protection by Design";

pub const HIGH_RECOMMENDATION: &str = "Conduct GDPR-compliant breach assessment (Article 33); notify authorities if personal data compromised.";
pub const MEDIUM_RECOMMENDATION: &str = "Enhance security measures and employee training (Article 32).";
pub const LOW_RECOMMENDATION: &str = "Integrate into ongoing data protection by design audits (Article 25).";
pub const OVERALL_RECOMMENDATION: &str = "Use for TPRM, ensuring GDPR alignment for EU data processing.";

// ============================================================================
// CONFIGURABLE POLICY
// ============================================================================

/// Score boundaries for the three levels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// score > high → High
    pub high: f64,
    /// medium < score <= high → Medium
    pub medium: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high: HIGH_THRESHOLD,
            medium: MEDIUM_THRESHOLD,
        }
    }
}

/// Everything attached to one risk level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelControl {
    pub grc_control: String,
    pub gdpr_compliance_score: u8,
    pub gdpr_reference: String,
    pub recommendation: String,
}

/// Thresholds plus the per-level control table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPolicy {
    #[serde(default)]
    pub thresholds: RiskThresholds,
    pub high: LevelControl,
    pub medium: LevelControl,
    pub low: LevelControl,
    #[serde(default = "default_overall")]
    pub overall_recommendation: String,
}

fn default_overall() -> String {
    OVERALL_RECOMMENDATION.to_string()
}

impl Default for ControlPolicy {
    fn default() -> Self {
        Self {
            thresholds: RiskThresholds::default(),
            high: LevelControl {
                grc_control: HIGH_CONTROL.to_string(),
                gdpr_compliance_score: HIGH_COMPLIANCE_SCORE,
                gdpr_reference: HIGH_GDPR_REFERENCE.to_string(),
                recommendation: HIGH_RECOMMENDATION.to_string(),
            },
            medium: LevelControl {
                grc_control: MEDIUM_CONTROL.to_string(),
                gdpr_compliance_score: MEDIUM_COMPLIANCE_SCORE,
                gdpr_reference: MEDIUM_GDPR_REFERENCE.to_string(),
                recommendation: MEDIUM_RECOMMENDATION.to_string(),
            },
            low: LevelControl {
                grc_control: LOW_CONTROL.to_string(),
                gdpr_compliance_score: LOW_COMPLIANCE_SCORE,
                gdpr_reference: LOW_GDPR_REFERENCE.to_string(),
                recommendation: LOW_RECOMMENDATION.to_string(),
            },
            overall_recommendation: default_overall(),
        }
    }
}

impl ControlPolicy {
    /// Load a policy override from JSON and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> GrcResult<Self> {
        let path = path.as_ref();
        log::info!("Loading control policy from: {}", path.display());

        let file = File::open(path)?;
        let policy: ControlPolicy = serde_json::from_reader(std::io::BufReader::new(file))?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> GrcResult<()> {
        let t = self.thresholds;
        if !(0.0..=1.0).contains(&t.medium) || !(0.0..=1.0).contains(&t.high) || t.medium >= t.high {
            return Err(GrcError::InvalidPolicy(format!(
                "thresholds must satisfy 0 <= medium < high <= 1, got medium={} high={}",
                t.medium, t.high
            )));
        }

        for level in RiskLevel::SUMMARY_ORDER {
            let control = self.control(level);
            if control.grc_control.trim().is_empty() {
                return Err(GrcError::InvalidPolicy(format!("empty control text for {}", level)));
            }
            if control.gdpr_compliance_score > 100 {
                return Err(GrcError::InvalidPolicy(format!(
                    "compliance score {} for {} exceeds 100",
                    control.gdpr_compliance_score, level
                )));
            }
        }

        Ok(())
    }

    pub fn control(&self, level: RiskLevel) -> &LevelControl {
        match level {
            RiskLevel::High => &self.high,
            RiskLevel::Medium => &self.medium,
            RiskLevel::Low => &self.low,
        }
    }
}
