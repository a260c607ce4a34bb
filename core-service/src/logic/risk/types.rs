//! Risk Types
//!
//! Core types for risk classification.
//! No logic here - only data structures.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// RISK LEVEL
// ============================================================================

/// Discretized phishing risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Log and trend, no action
    Low,
    /// Assess and monitor
    Medium,
    /// Incident response
    High,
}

impl RiskLevel {
    /// Display order used by summaries (most severe first)
    pub const SUMMARY_ORDER: [RiskLevel; 3] = [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRiskLevelError(pub String);

impl std::fmt::Display for ParseRiskLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown risk level '{}' (expected Low, Medium or High)", self.0)
    }
}

impl std::error::Error for ParseRiskLevelError {}

impl FromStr for RiskLevel {
    type Err = ParseRiskLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            _ => Err(ParseRiskLevelError(s.to_string())),
        }
    }
}

// ============================================================================
// ANNOTATION
// ============================================================================

/// Compliance annotation attached to a register row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub grc_control: String,
    pub gdpr_compliance_score: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_display() {
        for level in RiskLevel::SUMMARY_ORDER {
            assert_eq!(level.to_string().parse::<RiskLevel>().unwrap(), level);
        }
        assert_eq!("high".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert!("Critical".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_ordering_follows_severity() {
        assert!(RiskLevel::High > RiskLevel::Medium);
        assert!(RiskLevel::Medium > RiskLevel::Low);

        let mut levels = vec![RiskLevel::Low, RiskLevel::High, RiskLevel::Medium];
        levels.sort_by(|a, b| b.cmp(a));
        assert_eq!(levels, RiskLevel::SUMMARY_ORDER);
    }
}
