//! Feature Vector - Core data structure for ML input
//!
//! A vector remembers where its lexical block ends so that consumers which
//! must only see vocabulary columns (text preview) cannot accidentally read
//! the engineered block. Vectors only come from `new`, so the engineered
//! block is always present.

use super::engineered::EngineeredFeatures;
use super::layout::ENGINEERED_COUNT;
use super::vocabulary::Vocabulary;

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    /// Lexical block followed by the engineered block
    values: Vec<f32>,
    lexical_width: usize,
}

impl FeatureVector {
    /// Assemble from a lexical block and engineered features
    pub fn new(mut lexical: Vec<f32>, engineered: EngineeredFeatures) -> Self {
        let lexical_width = lexical.len();
        lexical.extend_from_slice(&engineered.as_array());
        Self {
            values: lexical,
            lexical_width,
        }
    }

    /// Full vector width
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get values as slice (what the classifier sees)
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Vocabulary-indexed weights only
    pub fn lexical(&self) -> &[f32] {
        &self.values[..self.lexical_width]
    }

    pub fn engineered(&self) -> EngineeredFeatures {
        let tail = &self.values[self.lexical_width..];
        EngineeredFeatures {
            has_url: tail[0],
            urgency_words: tail[1],
        }
    }

    pub fn lexical_width(&self) -> usize {
        debug_assert_eq!(self.values.len(), self.lexical_width + ENGINEERED_COUNT);
        self.lexical_width
    }
}

/// Raw text → feature vector
pub struct FeatureBuilder<'a> {
    vocabulary: &'a Vocabulary,
}

impl<'a> FeatureBuilder<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn build(&self, text: &str) -> FeatureVector {
        FeatureVector::new(
            self.vocabulary.transform(text),
            EngineeredFeatures::extract(text),
        )
    }

    /// Width of every vector this builder produces
    pub fn width(&self) -> usize {
        self.vocabulary.len() + ENGINEERED_COUNT
    }
}
