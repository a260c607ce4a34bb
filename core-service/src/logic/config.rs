//! Pipeline configuration
//!
//! Resolution order: built-in default → environment variable → CLI flag.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{GrcError, GrcResult};
use crate::logic::dataset::InputFormat;
use crate::logic::risk::ControlPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub format: InputFormat,
    pub vectorizer: PathBuf,
    pub model: PathBuf,
    pub register: PathBuf,
    pub report: PathBuf,
    pub metrics: PathBuf,
    pub sample_size: usize,
    /// None = draw a seed and log it
    pub seed: Option<u64>,
    /// Optional ControlPolicy JSON; built-in controls otherwise
    pub policy: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: constants::DEFAULT_INPUT_PATH.into(),
            format: InputFormat::Text,
            vectorizer: constants::DEFAULT_VECTORIZER_PATH.into(),
            model: constants::DEFAULT_MODEL_PATH.into(),
            register: constants::DEFAULT_REGISTER_PATH.into(),
            report: constants::DEFAULT_REPORT_PATH.into(),
            metrics: constants::DEFAULT_METRICS_PATH.into(),
            sample_size: constants::DEFAULT_SAMPLE_SIZE,
            seed: None,
            policy: None,
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        Self {
            input: constants::get_input_path().into(),
            vectorizer: constants::get_vectorizer_path().into(),
            model: constants::get_model_path().into(),
            register: constants::get_register_path().into(),
            report: constants::get_report_path().into(),
            metrics: constants::get_metrics_path().into(),
            sample_size: constants::get_sample_size(),
            seed: constants::get_seed(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> GrcResult<()> {
        if self.sample_size == 0 {
            return Err(GrcError::InvalidConfig("sample size must be at least 1".to_string()));
        }

        let outputs = [&self.register, &self.report, &self.metrics];
        for (i, a) in outputs.iter().enumerate() {
            if outputs[i + 1..].contains(a) {
                return Err(GrcError::InvalidConfig(format!(
                    "output path {} is used twice",
                    a.display()
                )));
            }
        }
        Ok(())
    }

    pub fn load_policy(&self) -> GrcResult<ControlPolicy> {
        match &self.policy {
            Some(path) => ControlPolicy::load(path),
            None => Ok(ControlPolicy::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = PipelineConfig::default();
        assert_eq!(config.sample_size, 5000);
        assert_eq!(config.format, InputFormat::Text);
        assert!(config.validate().is_ok());
        assert_eq!(config.load_policy().unwrap(), ControlPolicy::default());
    }

    #[test]
    fn test_zero_sample_size_rejected() {
        let config = PipelineConfig {
            sample_size: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(config.validate(), Err(GrcError::InvalidConfig(_))));
    }

    #[test]
    fn test_shared_output_path_rejected() {
        let config = PipelineConfig {
            report: PipelineConfig::default().register,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_policy_file_is_fatal() {
        let config = PipelineConfig {
            policy: Some("does/not/exist.json".into()),
            ..PipelineConfig::default()
        };
        assert!(matches!(config.load_policy(), Err(GrcError::Io(_))));
    }
}
