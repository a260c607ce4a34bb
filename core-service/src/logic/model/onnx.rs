//! ONNX Runtime classifier
//!
//! Expects a binary classifier exported with a `[N, 2]` float probability
//! output (scikit-learn via skl2onnx with `zipmap=False`). A `[N]` or
//! `[N, 1]` output is read as the positive-class probability directly.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::inference::{Classifier, InferenceError};
use crate::logic::features::FeatureVector;

pub struct OnnxClassifier {
    session: Mutex<Session>,
    output_name: String,
    n_features: usize,
}

impl OnnxClassifier {
    /// Load ONNX model from file
    pub fn load<P: AsRef<Path>>(model_path: P, n_features: usize) -> Result<Self, InferenceError> {
        let model_path = model_path.as_ref();
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(InferenceError(format!("Model not found: {}", model_path.display())));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError(format!("Failed to load model: {}", e)))?;

        let output_name = pick_probability_output(session.outputs.iter().map(|o| o.name.as_str()))
            .ok_or_else(|| InferenceError("No output defined".to_string()))?;

        log::info!("ONNX model loaded successfully (probability output: {})", output_name);

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            n_features,
        })
    }
}

/// Prefer an output whose name mentions probabilities, else the last one
fn pick_probability_output<'a>(names: impl Iterator<Item = &'a str>) -> Option<String> {
    let names: Vec<&str> = names.collect();
    names
        .iter()
        .find(|n| n.to_ascii_lowercase().contains("prob"))
        .or_else(|| names.last())
        .map(|n| n.to_string())
}

/// Positive-class column out of a row-major probability buffer
fn positive_column(data: &[f32], rows: usize) -> Result<Vec<f64>, InferenceError> {
    if rows == 0 {
        return Ok(Vec::new());
    }
    if data.len() % rows != 0 {
        return Err(InferenceError(format!(
            "Output of {} values does not divide into {} rows",
            data.len(),
            rows
        )));
    }

    match data.len() / rows {
        1 => Ok(data.iter().map(|&p| p as f64).collect()),
        2 => Ok(data.chunks_exact(2).map(|row| row[1] as f64).collect()),
        cols => Err(InferenceError(format!(
            "Expected 1 or 2 probability columns, got {}",
            cols
        ))),
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        "onnx"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, batch: &[FeatureVector]) -> Result<Vec<f64>, InferenceError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let mut input_data = Vec::with_capacity(batch.len() * self.n_features);
        for vector in batch {
            input_data.extend_from_slice(vector.as_slice());
        }

        let input_array = Array2::<f32>::from_shape_vec((batch.len(), self.n_features), input_data)
            .map_err(|e| InferenceError(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| InferenceError("No output".to_string()))?;

        let output_tensor = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError(format!("Extract error: {}", e)))?;

        positive_column(output_tensor.1, batch.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_probability_output() {
        let names = ["output_label", "output_probability"];
        assert_eq!(
            pick_probability_output(names.iter().copied()).as_deref(),
            Some("output_probability")
        );

        let names = ["label", "scores"];
        assert_eq!(pick_probability_output(names.iter().copied()).as_deref(), Some("scores"));

        assert_eq!(pick_probability_output(std::iter::empty()), None);
    }

    #[test]
    fn test_positive_column_two_classes() {
        let data = [0.9f32, 0.1, 0.25, 0.75];
        let probs = positive_column(&data, 2).unwrap();
        assert!((probs[0] - 0.1).abs() < 1e-6);
        assert!((probs[1] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_positive_column_single_column() {
        let probs = positive_column(&[0.5f32, 0.25], 2).unwrap();
        assert_eq!(probs, vec![0.5, 0.25]);
    }

    #[test]
    fn test_positive_column_rejects_shape() {
        assert!(positive_column(&[0.1f32, 0.2, 0.7], 1).is_err());
        assert!(positive_column(&[0.1f32, 0.2, 0.7], 2).is_err());
    }
}
