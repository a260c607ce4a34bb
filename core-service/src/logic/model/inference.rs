//! Inference Engine - classifier seam and batch scorer
//!
//! The classifier is loaded once at startup and injected into the scorer,
//! so tests can substitute a fixed-score classifier.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{GrcError, GrcResult};
use crate::logic::features::FeatureVector;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub struct InferenceError(pub String);

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InferenceError: {}", self.0)
    }
}

impl std::error::Error for InferenceError {}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Binary classifier exposing the probability of the positive (phishing) class
pub trait Classifier {
    /// Short name for logs and metadata
    fn name(&self) -> &str;

    /// Feature width the model was trained on
    fn n_features(&self) -> usize;

    /// One probability per input vector, same order
    fn predict_proba(&self, batch: &[FeatureVector]) -> Result<Vec<f64>, InferenceError>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn n_features(&self) -> usize {
        (**self).n_features()
    }

    fn predict_proba(&self, batch: &[FeatureVector]) -> Result<Vec<f64>, InferenceError> {
        (**self).predict_proba(batch)
    }
}

// ============================================================================
// SCORER
// ============================================================================

/// Scoring summary for logs and UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringStats {
    pub method: String,
    pub rows: usize,
    pub inference_time_us: u64,
}

/// Batch scorer with input and output validation
pub struct RiskScorer<'a> {
    classifier: &'a dyn Classifier,
}

impl<'a> RiskScorer<'a> {
    pub fn new(classifier: &'a dyn Classifier) -> Self {
        Self { classifier }
    }

    /// Fail before any inference if a single row has the wrong width
    pub fn check_widths(&self, batch: &[FeatureVector]) -> GrcResult<()> {
        let expected = self.classifier.n_features();
        match batch.iter().position(|v| v.len() != expected) {
            Some(row) => Err(GrcError::FeatureWidthMismatch {
                row,
                expected,
                found: batch[row].len(),
            }),
            None => Ok(()),
        }
    }

    /// Score a batch: N vectors in, N probabilities in [0, 1] out
    pub fn score(&self, batch: &[FeatureVector]) -> GrcResult<(Vec<f64>, ScoringStats)> {
        self.check_widths(batch)?;

        let start_time = Instant::now();
        let scores = self.classifier.predict_proba(batch)?;
        let inference_time_us = start_time.elapsed().as_micros() as u64;

        if scores.len() != batch.len() {
            return Err(InferenceError(format!(
                "classifier returned {} scores for {} rows",
                scores.len(),
                batch.len()
            ))
            .into());
        }

        if let Some((row, &score)) = scores
            .iter()
            .enumerate()
            .find(|(_, s)| !(0.0..=1.0).contains(*s))
        {
            return Err(GrcError::InvalidScore { row, score });
        }

        let stats = ScoringStats {
            method: self.classifier.name().to_string(),
            rows: batch.len(),
            inference_time_us,
        };
        log::debug!(
            "Scored {} rows with {} in {} us",
            stats.rows,
            stats.method,
            stats.inference_time_us
        );

        Ok((scores, stats))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::EngineeredFeatures;

    struct FixedClassifier {
        width: usize,
        scores: Vec<f64>,
    }

    impl Classifier for FixedClassifier {
        fn name(&self) -> &str {
            "fixed"
        }

        fn n_features(&self) -> usize {
            self.width
        }

        fn predict_proba(&self, batch: &[FeatureVector]) -> Result<Vec<f64>, InferenceError> {
            Ok(self.scores.iter().copied().take(batch.len()).collect())
        }
    }

    fn vector(lexical: usize) -> FeatureVector {
        FeatureVector::new(vec![0.0; lexical], EngineeredFeatures::default())
    }

    #[test]
    fn test_score_passes_through() {
        let model = FixedClassifier { width: 5, scores: vec![0.1, 0.9] };
        let (scores, stats) = RiskScorer::new(&model).score(&[vector(3), vector(3)]).unwrap();
        assert_eq!(scores, vec![0.1, 0.9]);
        assert_eq!(stats.rows, 2);
        assert_eq!(stats.method, "fixed");
    }

    #[test]
    fn test_width_mismatch_is_fatal() {
        let model = FixedClassifier { width: 5, scores: vec![0.1, 0.9] };
        let err = RiskScorer::new(&model).score(&[vector(3), vector(4)]).unwrap_err();
        assert!(matches!(
            err,
            GrcError::FeatureWidthMismatch { row: 1, expected: 5, found: 6 }
        ));
    }

    #[test]
    fn test_out_of_range_score_is_rejected() {
        let model = FixedClassifier { width: 5, scores: vec![0.2, 1.5] };
        let err = RiskScorer::new(&model).score(&[vector(3), vector(3)]).unwrap_err();
        assert!(matches!(err, GrcError::InvalidScore { row: 1, .. }));

        let model = FixedClassifier { width: 5, scores: vec![f64::NAN] };
        assert!(RiskScorer::new(&model).score(&[vector(3)]).is_err());
    }

    #[test]
    fn test_short_output_is_rejected() {
        let model = FixedClassifier { width: 5, scores: vec![0.2] };
        let err = RiskScorer::new(&model).score(&[vector(3), vector(3)]).unwrap_err();
        assert!(matches!(err, GrcError::Inference(_)));
    }
}
