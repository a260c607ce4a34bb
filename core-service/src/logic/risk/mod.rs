//! Risk Module
//!
//! Maps a phishing probability onto Low/Medium/High and attaches the
//! compliance annotation for that level.
//!
//! ## Structure
//! - `types`: Core types (RiskLevel, Annotation)
//! - `rules`: Thresholds, control text, ControlPolicy
//! - `classifier`: Classification and annotation logic
//!
//! ## Usage
//! ```ignore
//! use phishguard_core::logic::risk::{classify, annotate, ControlPolicy};
//!
//! let level = classify(0.85);
//! let annotation = annotate(level, &ControlPolicy::default());
//! assert_eq!(annotation.gdpr_compliance_score, 50);
//! ```

pub mod types;
pub mod rules;
pub mod classifier;

// Re-export main types for convenience
pub use types::{Annotation, ParseRiskLevelError, RiskLevel};
pub use rules::{ControlPolicy, LevelControl, RiskThresholds};
pub use classifier::{annotate, classify, classify_with_thresholds};
