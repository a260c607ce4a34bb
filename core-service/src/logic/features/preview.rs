//! Text Preview - inverse lookup from lexical weights to vocabulary terms
//!
//! The vectorized input no longer carries the original text, so the register
//! shows the first few vocabulary terms present in each row instead.

use super::vector::FeatureVector;
use crate::error::{GrcError, GrcResult};

/// Shown when a row has no vocabulary term
pub const PREVIEW_PLACEHOLDER: &str = "No text preview";

/// Maximum number of terms in a preview
pub const PREVIEW_MAX_TERMS: usize = 5;

/// Appended to every non-empty preview
pub const PREVIEW_SUFFIX: &str = "...";

/// Column → term lookup over a vocabulary-indexed weight slice
pub trait TermLookup {
    fn vocabulary_size(&self) -> usize;

    fn term(&self, column: usize) -> Option<&str>;

    /// Terms with a non-zero weight, ranked by column index.
    ///
    /// `weights` must be vocabulary-indexed: a slice wider than the
    /// vocabulary (e.g. a full vector including engineered features) is
    /// rejected.
    fn ranked_terms(&self, weights: &[f32]) -> GrcResult<Vec<&str>> {
        if weights.len() > self.vocabulary_size() {
            return Err(GrcError::VocabularyMismatch {
                expected: self.vocabulary_size(),
                found: weights.len(),
            });
        }

        Ok(weights
            .iter()
            .enumerate()
            .filter(|(_, &w)| w != 0.0)
            .filter_map(|(column, _)| self.term(column))
            .collect())
    }
}

/// Preview for one vector: first five terms joined by spaces + "..."
pub fn preview_text<L: TermLookup + ?Sized>(lookup: &L, vector: &FeatureVector) -> GrcResult<String> {
    let terms = lookup.ranked_terms(vector.lexical())?;

    if terms.is_empty() {
        return Ok(PREVIEW_PLACEHOLDER.to_string());
    }

    let shown = &terms[..terms.len().min(PREVIEW_MAX_TERMS)];
    Ok(format!("{}{}", shown.join(" "), PREVIEW_SUFFIX))
}
