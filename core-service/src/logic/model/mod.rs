//! Model Module - AI/ML Inference Engine
//!
//! Scoring is separated from data loading so models can be swapped:
//! ONNX Runtime, a portable tree ensemble, or a test double.

pub mod inference;
pub mod onnx;
pub mod forest;
pub mod manifest;
pub mod metrics;

// Re-export common types
pub use inference::{Classifier, InferenceError, RiskScorer, ScoringStats};
pub use onnx::OnnxClassifier;
pub use forest::ForestClassifier;
pub use manifest::{load_classifier, ModelKind, ModelManifest, ModelMetadata};
pub use metrics::ClassificationReport;
