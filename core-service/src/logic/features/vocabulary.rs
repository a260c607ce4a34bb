//! Vocabulary - TF-IDF transform from a fitted vectorizer artifact
//!
//! The vectorizer is fitted offline. This module only loads its vocabulary
//! and idf weights and reproduces the transform:
//! lowercase → tokenize (`\b\w\w+\b`) → term counts → tf * idf → normalize.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::layout::{FeatureLayout, MAX_VOCABULARY};
use super::preview::TermLookup;
use crate::error::{GrcError, GrcResult};

/// Default token pattern: words of two or more characters
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

// ============================================================================
// ARTIFACT
// ============================================================================

/// On-disk vectorizer artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerArtifact {
    /// term -> column index
    pub vocabulary: HashMap<String, usize>,
    /// idf weight per column
    pub idf: Vec<f64>,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<String>,
    #[serde(default)]
    pub sublinear_tf: bool,
}

fn default_lowercase() -> bool {
    true
}

fn default_norm() -> Option<String> {
    Some("l2".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Norm {
    L1,
    L2,
    None,
}

impl Norm {
    fn parse(value: Option<&str>) -> GrcResult<Self> {
        match value {
            Some("l2") => Ok(Norm::L2),
            Some("l1") => Ok(Norm::L1),
            None => Ok(Norm::None),
            Some(other) => Err(GrcError::InvalidVectorizer(format!("unknown norm '{}'", other))),
        }
    }
}

// ============================================================================
// VOCABULARY
// ============================================================================

#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// column -> term
    terms: Vec<String>,
    index: HashMap<String, usize>,
    idf: Vec<f32>,
    lowercase: bool,
    norm: Norm,
    sublinear_tf: bool,
}

impl Vocabulary {
    /// Build from terms in column order and their idf weights (l2, lowercase)
    pub fn new(terms: Vec<String>, idf: Vec<f32>) -> GrcResult<Self> {
        if terms.len() != idf.len() {
            return Err(GrcError::InvalidVectorizer(format!(
                "{} terms but {} idf weights",
                terms.len(),
                idf.len()
            )));
        }
        if terms.len() > MAX_VOCABULARY {
            return Err(GrcError::InvalidVectorizer(format!(
                "vocabulary has {} terms, at most {} supported",
                terms.len(),
                MAX_VOCABULARY
            )));
        }

        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect::<HashMap<_, _>>();
        if index.len() != terms.len() {
            return Err(GrcError::InvalidVectorizer("duplicate vocabulary terms".into()));
        }

        Ok(Self {
            terms,
            index,
            idf,
            lowercase: true,
            norm: Norm::L2,
            sublinear_tf: false,
        })
    }

    pub fn from_artifact(artifact: VectorizerArtifact) -> GrcResult<Self> {
        let n = artifact.vocabulary.len();
        let mut terms = vec![String::new(); n];
        let mut seen = vec![false; n];

        for (term, idx) in artifact.vocabulary {
            if idx >= n || seen[idx] {
                return Err(GrcError::InvalidVectorizer(format!(
                    "column indices must be unique and dense in 0..{}, got {} for '{}'",
                    n, idx, term
                )));
            }
            seen[idx] = true;
            terms[idx] = term;
        }

        let idf = artifact.idf.iter().map(|&w| w as f32).collect();
        let mut vocabulary = Self::new(terms, idf)?;
        vocabulary.lowercase = artifact.lowercase;
        vocabulary.norm = Norm::parse(artifact.norm.as_deref())?;
        vocabulary.sublinear_tf = artifact.sublinear_tf;
        Ok(vocabulary)
    }

    /// Load a vectorizer artifact from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> GrcResult<Self> {
        let path = path.as_ref();
        log::info!("Loading vectorizer from: {}", path.display());

        let file = File::open(path)?;
        let artifact: VectorizerArtifact = serde_json::from_reader(std::io::BufReader::new(file))?;
        let vocabulary = Self::from_artifact(artifact)?;

        log::info!(
            "Vectorizer loaded: {} terms, norm {:?}",
            vocabulary.len(),
            vocabulary.norm
        );
        Ok(vocabulary)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn column(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn layout(&self) -> FeatureLayout {
        FeatureLayout::new(self.terms.clone())
    }

    /// Lexical block for one document
    pub fn transform(&self, text: &str) -> Vec<f32> {
        let mut weights = vec![0.0f32; self.terms.len()];

        let lowered;
        let text = if self.lowercase {
            lowered = text.to_lowercase();
            lowered.as_str()
        } else {
            text
        };

        for token in TOKEN_RE.find_iter(text) {
            if let Some(&idx) = self.index.get(token.as_str()) {
                weights[idx] += 1.0;
            }
        }

        for (idx, w) in weights.iter_mut().enumerate() {
            if *w > 0.0 {
                let tf = if self.sublinear_tf { 1.0 + w.ln() } else { *w };
                *w = tf * self.idf[idx];
            }
        }

        let norm = match self.norm {
            Norm::L2 => weights.iter().map(|w| w * w).sum::<f32>().sqrt(),
            Norm::L1 => weights.iter().map(|w| w.abs()).sum::<f32>(),
            Norm::None => 0.0,
        };
        if norm > 0.0 {
            weights.iter_mut().for_each(|w| *w /= norm);
        }

        weights
    }
}

impl TermLookup for Vocabulary {
    fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    fn term(&self, column: usize) -> Option<&str> {
        self.terms.get(column).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::new(
            vec!["account".into(), "click".into(), "verify".into()],
            vec![1.0, 2.0, 1.5],
        )
        .unwrap()
    }

    #[test]
    fn test_transform_tfidf_l2() {
        let v = vocab();
        // click x2, account x1, "a" is a single-char token and ignored
        let w = v.transform("Click a link, CLICK to see your account");

        let raw = [1.0f32 * 1.0, 2.0 * 2.0, 0.0];
        let norm = raw.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((w[0] - raw[0] / norm).abs() < 1e-6);
        assert!((w[1] - raw[1] / norm).abs() < 1e-6);
        assert_eq!(w[2], 0.0);
    }

    #[test]
    fn test_transform_unknown_text_is_zero() {
        let w = vocab().transform("nothing relevant");
        assert!(w.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_from_artifact_orders_by_column() {
        let artifact: VectorizerArtifact = serde_json::from_str(
            r#"{"vocabulary": {"verify": 2, "account": 0, "click": 1}, "idf": [1.0, 2.0, 1.5]}"#,
        )
        .unwrap();
        let v = Vocabulary::from_artifact(artifact).unwrap();
        assert_eq!(v.terms(), &["account", "click", "verify"]);
        assert_eq!(v.column("verify"), Some(2));
        assert_eq!(v.layout().width(), 5);
    }

    #[test]
    fn test_from_artifact_rejects_sparse_columns() {
        let artifact: VectorizerArtifact = serde_json::from_str(
            r#"{"vocabulary": {"account": 0, "click": 5}, "idf": [1.0, 2.0]}"#,
        )
        .unwrap();
        assert!(matches!(
            Vocabulary::from_artifact(artifact),
            Err(GrcError::InvalidVectorizer(_))
        ));
    }

    #[test]
    fn test_idf_length_mismatch() {
        assert!(Vocabulary::new(vec!["a".into()], vec![]).is_err());
    }

    #[test]
    fn test_vocabulary_cap() {
        let terms: Vec<String> = (0..=MAX_VOCABULARY).map(|i| format!("t{}", i)).collect();
        let idf = vec![1.0; terms.len()];
        assert!(Vocabulary::new(terms, idf).is_err());
    }
}
