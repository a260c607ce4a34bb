//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! A vector is the lexical block (one column per vocabulary term, in
//! vectorizer column order) followed by the engineered block
//! (`ENGINEERED_FEATURES`, in that order).
//!
//! ## Rules (NEVER break these):
//! 1. Add engineered feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! The layout hash covers the version, every vocabulary term and every
//! engineered name, so a model trained on a different vocabulary is caught
//! before scoring.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when the engineered block changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// ENGINEERED BLOCK (Authoritative source)
// ============================================================================

/// Engineered feature names in exact order they follow the lexical block
pub const ENGINEERED_FEATURES: &[&str] = &[
    "has_url",       // 1.0 if the text contains "http"
    "urgency_words", // count of "urgent" + count of "now"
];

/// Number of engineered features
/// IMPORTANT: Must match ENGINEERED_FEATURES.len()!
pub const ENGINEERED_COUNT: usize = 2;

/// Upper bound on the lexical block
pub const MAX_VOCABULARY: usize = 500;

// ============================================================================
// LAYOUT
// ============================================================================

/// Ordered feature names for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureLayout {
    terms: Vec<String>,
}

impl FeatureLayout {
    /// Build a layout from vocabulary terms in column order
    pub fn new(terms: Vec<String>) -> Self {
        Self { terms }
    }

    /// Width of the lexical block
    pub fn lexical_width(&self) -> usize {
        self.terms.len()
    }

    /// Full vector width (lexical + engineered)
    pub fn width(&self) -> usize {
        self.terms.len() + ENGINEERED_COUNT
    }

    /// All feature names in vector order
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.terms
            .iter()
            .map(String::as_str)
            .chain(ENGINEERED_FEATURES.iter().copied())
    }

    /// Compute CRC32 hash of the layout
    pub fn layout_hash(&self) -> u32 {
        let mut hasher = Hasher::new();

        hasher.update(&[FEATURE_VERSION]);

        for name in self.feature_names() {
            hasher.update(name.as_bytes());
            hasher.update(&[0]); // Separator
        }

        hasher.finalize()
    }

    /// Validate a hash recorded alongside a model
    pub fn validate(&self, expected_hash: u32) -> Result<(), LayoutMismatchError> {
        let actual_hash = self.layout_hash();

        if actual_hash != expected_hash {
            return Err(LayoutMismatchError {
                version: FEATURE_VERSION,
                expected_hash,
                actual_hash,
                width: self.width(),
            });
        }

        Ok(())
    }

    /// Get feature index by name
    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.feature_names().position(|n| n == name)
    }
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub lexical_width: usize,
    pub feature_count: usize,
}

impl From<&FeatureLayout> for LayoutInfo {
    fn from(layout: &FeatureLayout) -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout.layout_hash(),
            lexical_width: layout.lexical_width(),
            feature_count: layout.width(),
        }
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when the model's recorded layout doesn't match the vectorizer's
#[derive(Debug, Clone)]
pub struct LayoutMismatchError {
    pub version: u8,
    pub expected_hash: u32,
    pub actual_hash: u32,
    pub width: usize,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature layout mismatch: model expects hash {:08x}, vectorizer v{} produces {:08x} ({} features)",
            self.expected_hash, self.version, self.actual_hash, self.width
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> FeatureLayout {
        FeatureLayout::new(vec!["account".into(), "click".into(), "verify".into()])
    }

    #[test]
    fn test_engineered_count() {
        assert_eq!(ENGINEERED_FEATURES.len(), ENGINEERED_COUNT);
    }

    #[test]
    fn test_width_is_vocabulary_plus_two() {
        let layout = layout();
        assert_eq!(layout.lexical_width(), 3);
        assert_eq!(layout.width(), 5);
        assert_eq!(layout.feature_index("has_url"), Some(3));
        assert_eq!(layout.feature_index("urgency_words"), Some(4));
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(layout().layout_hash(), layout().layout_hash());
        assert_ne!(layout().layout_hash(), 0);
    }

    #[test]
    fn test_layout_hash_depends_on_term_order() {
        let swapped = FeatureLayout::new(vec!["click".into(), "account".into(), "verify".into()]);
        assert_ne!(layout().layout_hash(), swapped.layout_hash());
    }

    #[test]
    fn test_validate_layout() {
        let layout = layout();
        assert!(layout.validate(layout.layout_hash()).is_ok());

        let err = layout.validate(layout.layout_hash().wrapping_add(1)).unwrap_err();
        assert_eq!(err.width, 5);
    }
}
