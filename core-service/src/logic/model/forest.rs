//! Tree Ensemble - portable random forest evaluation
//!
//! Artifact layout follows scikit-learn's `tree_` arrays, one entry per
//! estimator. A node is a leaf when `children_left == -1`.
//! Probability = mean over trees of the normalized leaf class distribution.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::inference::{Classifier, InferenceError};
use crate::error::{GrcError, GrcResult};
use crate::logic::features::FeatureVector;

const LEAF: i64 = -1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeArrays {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights (counts or fractions)
    pub value: Vec<Vec<f64>>,
}

impl TreeArrays {
    fn validate(&self, tree: usize, n_features: usize, positive_class: usize) -> GrcResult<()> {
        let n = self.children_left.len();
        let invalid = |reason: String| GrcError::InvalidModel(format!("tree {}: {}", tree, reason));

        if n == 0 {
            return Err(invalid("no nodes".into()));
        }
        if [self.children_right.len(), self.feature.len(), self.threshold.len(), self.value.len()]
            .iter()
            .any(|&len| len != n)
        {
            return Err(invalid("node arrays have different lengths".into()));
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF || right == LEAF {
                if left != right {
                    return Err(invalid(format!("node {} has a single child", node)));
                }
                if self.value[node].len() <= positive_class {
                    return Err(invalid(format!("leaf {} has no weight for class {}", node, positive_class)));
                }
                continue;
            }

            // Children always come after their parent, so traversal terminates
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(invalid(format!("node {} has invalid child {}", node, child)));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(invalid(format!("node {} splits on feature {}", node, feature)));
            }
        }

        Ok(())
    }

    fn positive_proba(&self, x: &[f32], positive_class: usize) -> f64 {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let feature = self.feature[node] as usize;
            node = if (x[feature] as f64) <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        let weights = &self.value[node];
        let total: f64 = weights.iter().sum();
        if total > 0.0 {
            weights[positive_class] / total
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestArtifact {
    pub n_features: usize,
    #[serde(default = "default_positive_class")]
    pub positive_class: usize,
    pub trees: Vec<TreeArrays>,
}

fn default_positive_class() -> usize {
    1
}

#[derive(Debug, Clone)]
pub struct ForestClassifier {
    n_features: usize,
    positive_class: usize,
    trees: Vec<TreeArrays>,
}

impl ForestClassifier {
    pub fn from_artifact(artifact: ForestArtifact) -> GrcResult<Self> {
        if artifact.trees.is_empty() {
            return Err(GrcError::InvalidModel("forest has no trees".into()));
        }
        for (i, tree) in artifact.trees.iter().enumerate() {
            tree.validate(i, artifact.n_features, artifact.positive_class)?;
        }

        Ok(Self {
            n_features: artifact.n_features,
            positive_class: artifact.positive_class,
            trees: artifact.trees,
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> GrcResult<Self> {
        let path = path.as_ref();
        log::info!("Loading tree ensemble from: {}", path.display());

        let file = File::open(path)?;
        let artifact: ForestArtifact = serde_json::from_reader(std::io::BufReader::new(file))?;
        let forest = Self::from_artifact(artifact)?;

        log::info!("Tree ensemble loaded: {} trees, {} features", forest.trees.len(), forest.n_features);
        Ok(forest)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn predict_one(&self, x: &[f32]) -> f64 {
        let sum: f64 = self
            .trees
            .iter()
            .map(|t| t.positive_proba(x, self.positive_class))
            .sum();
        sum / self.trees.len() as f64
    }
}

impl Classifier for ForestClassifier {
    fn name(&self) -> &str {
        "forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, batch: &[FeatureVector]) -> Result<Vec<f64>, InferenceError> {
        batch
            .iter()
            .map(|v| {
                if v.len() != self.n_features {
                    return Err(InferenceError(format!(
                        "expected {} features, got {}",
                        self.n_features,
                        v.len()
                    )));
                }
                Ok(self.predict_one(v.as_slice()))
            })
            .collect()
    }
}
