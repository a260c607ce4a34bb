//! Logic Module - Risk Assessment Engine
//!
//! ## Architecture
//! - `features/` - Vectorizer, engineered features, text preview
//! - `model/` - Classifier loading and batch scoring (ONNX, tree ensemble)
//! - `risk/` - Low/Medium/High classification and control annotation
//! - `dataset/` - Input tables and seeded sampling
//! - `register/` - Risk register rows, CSV persistence, summaries
//! - `report/` - Markdown compliance report
//! - `pipeline` - End-to-end run

pub mod config;

pub mod features;
pub mod model;
pub mod risk;
pub mod dataset;
pub mod register;
pub mod report;

pub mod pipeline;
