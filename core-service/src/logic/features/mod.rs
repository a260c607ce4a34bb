//! Features Module - Feature Extraction Engine
//!
//! Raw email text → fixed-width vector (TF-IDF lexical block + engineered
//! block), plus the reverse direction used for register previews.

pub mod layout;
pub mod vocabulary;
pub mod engineered;
pub mod vector;
pub mod preview;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{FeatureLayout, ENGINEERED_COUNT, ENGINEERED_FEATURES};
pub use vocabulary::Vocabulary;
pub use engineered::EngineeredFeatures;
pub use vector::{FeatureBuilder, FeatureVector};
pub use preview::{preview_text, TermLookup, PREVIEW_PLACEHOLDER};
