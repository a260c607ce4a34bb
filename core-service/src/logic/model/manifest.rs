//! Model manifest - describes a trained artifact and how to load it
//!
//! ```json
//! {
//!   "kind": "onnx",
//!   "artifact": "phishing_model.onnx",
//!   "n_features": 502,
//!   "sha256": "…",
//!   "layout_hash": 305419896
//! }
//! ```
//! `artifact` is resolved relative to the manifest's directory.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::forest::ForestClassifier;
use super::inference::Classifier;
use super::onnx::OnnxClassifier;
use crate::error::{GrcError, GrcResult};
use crate::logic::features::FeatureLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Onnx,
    Forest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelManifest {
    pub kind: ModelKind,
    pub artifact: PathBuf,
    pub n_features: usize,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub layout_hash: Option<u32>,
}

/// What was loaded, for logs and reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub kind: ModelKind,
    pub features: usize,
    pub sha256: String,
    pub loaded_at: DateTime<Utc>,
}

impl ModelManifest {
    pub fn load<P: AsRef<Path>>(path: P) -> GrcResult<Self> {
        let file = File::open(path.as_ref())?;
        let manifest: ModelManifest = serde_json::from_reader(BufReader::new(file))?;
        Ok(manifest)
    }

    /// Artifact path resolved against the manifest location
    pub fn artifact_path(&self, manifest_path: &Path) -> PathBuf {
        if self.artifact.is_absolute() {
            return self.artifact.clone();
        }
        manifest_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(&self.artifact)
    }

    /// Reject a model whose width or pinned layout disagrees with the vectorizer
    pub fn check_layout(&self, layout: &FeatureLayout) -> GrcResult<()> {
        if self.n_features != layout.width() {
            return Err(GrcError::FeatureWidthMismatch {
                row: 0,
                expected: self.n_features,
                found: layout.width(),
            });
        }
        if let Some(hash) = self.layout_hash {
            layout.validate(hash)?;
        }
        Ok(())
    }
}

/// Hex SHA-256 of a file
pub fn sha256_file(path: &Path) -> GrcResult<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Compare a file's checksum with the expected hex digest (case-insensitive)
pub fn verify_checksum(path: &Path, expected: &str) -> GrcResult<String> {
    let actual = sha256_file(path)?;
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(GrcError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(actual)
}

/// Load the classifier a manifest points at, verifying its checksum first
pub fn load_classifier(manifest_path: &Path) -> GrcResult<(Box<dyn Classifier>, ModelMetadata)> {
    log::info!("Loading model manifest from: {}", manifest_path.display());
    let manifest = ModelManifest::load(manifest_path)?;
    load_from_manifest(&manifest, manifest_path)
}

pub fn load_from_manifest(
    manifest: &ModelManifest,
    manifest_path: &Path,
) -> GrcResult<(Box<dyn Classifier>, ModelMetadata)> {
    let artifact = manifest.artifact_path(manifest_path);

    let sha256 = match &manifest.sha256 {
        Some(expected) => verify_checksum(&artifact, expected)?,
        None => {
            log::warn!("Model manifest has no sha256, skipping checksum verification");
            sha256_file(&artifact)?
        }
    };

    let classifier: Box<dyn Classifier> = match manifest.kind {
        ModelKind::Onnx => Box::new(OnnxClassifier::load(&artifact, manifest.n_features)?),
        ModelKind::Forest => {
            let forest = ForestClassifier::load(&artifact)?;
            if forest.n_features() != manifest.n_features {
                return Err(GrcError::InvalidModel(format!(
                    "manifest declares {} features, forest artifact has {}",
                    manifest.n_features,
                    forest.n_features()
                )));
            }
            Box::new(forest)
        }
    };

    let metadata = ModelMetadata {
        model_path: artifact.display().to_string(),
        kind: manifest.kind,
        features: manifest.n_features,
        sha256,
        loaded_at: Utc::now(),
    };

    Ok((classifier, metadata))
}
