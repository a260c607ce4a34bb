//! Classification metrics over the labelled part of a scored sample
//!
//! Serialized in the same dict shape scikit-learn's `classification_report`
//! produces, so existing dashboards can read it unchanged.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GrcResult;

/// Predicted phishing iff score > this
pub const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "f1-score")]
    pub f1_score: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    #[serde(rename = "0")]
    pub legitimate: ClassMetrics,
    #[serde(rename = "1")]
    pub phishing: ClassMetrics,
    pub accuracy: f64,
    #[serde(rename = "macro avg")]
    pub macro_avg: ClassMetrics,
    #[serde(rename = "weighted avg")]
    pub weighted_avg: ClassMetrics,
    /// `[[tn, fp], [fn, tp]]`, rows = actual class
    pub confusion_matrix: [[usize; 2]; 2],
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

impl ClassificationReport {
    /// Evaluate scores against labels; rows without a label are skipped.
    /// Returns None when no row is labelled.
    pub fn evaluate(labels: &[Option<u8>], scores: &[f64]) -> Option<Self> {
        let mut cm = [[0usize; 2]; 2];

        for (label, &score) in labels.iter().zip(scores) {
            let Some(actual) = label else { continue };
            let predicted = usize::from(score > DECISION_THRESHOLD);
            cm[usize::from(*actual != 0)][predicted] += 1;
        }

        let total: usize = cm.iter().flatten().sum();
        if total == 0 {
            return None;
        }

        let [[tn, fp], [fn_, tp]] = cm;

        let class = |correct: usize, predicted: usize, actual: usize| {
            let precision = ratio(correct, predicted);
            let recall = ratio(correct, actual);
            ClassMetrics {
                precision,
                recall,
                f1_score: f1(precision, recall),
                support: actual,
            }
        };

        let legitimate = class(tn, tn + fn_, tn + fp);
        let phishing = class(tp, tp + fp, tp + fn_);

        let macro_avg = ClassMetrics {
            precision: (legitimate.precision + phishing.precision) / 2.0,
            recall: (legitimate.recall + phishing.recall) / 2.0,
            f1_score: (legitimate.f1_score + phishing.f1_score) / 2.0,
            support: total,
        };

        let weight = |a: f64, b: f64| {
            (a * legitimate.support as f64 + b * phishing.support as f64) / total as f64
        };
        let weighted_avg = ClassMetrics {
            precision: weight(legitimate.precision, phishing.precision),
            recall: weight(legitimate.recall, phishing.recall),
            f1_score: weight(legitimate.f1_score, phishing.f1_score),
            support: total,
        };

        Some(Self {
            accuracy: ratio(tn + tp, total),
            legitimate,
            phishing,
            macro_avg,
            weighted_avg,
            confusion_matrix: cm,
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> GrcResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> GrcResult<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confusion_matrix_and_scores() {
        // actual:    0    0    0    1    1    1    1
        // predicted: 0    0    1    1    1    0    1
        let labels = [Some(0), Some(0), Some(0), Some(1), Some(1), Some(1), Some(1)];
        let scores = [0.1, 0.5, 0.9, 0.8, 0.51, 0.2, 0.99];

        let report = ClassificationReport::evaluate(&labels, &scores).unwrap();
        assert_eq!(report.confusion_matrix, [[2, 1], [1, 3]]);

        assert!((report.legitimate.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((report.legitimate.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((report.phishing.precision - 0.75).abs() < 1e-12);
        assert!((report.phishing.recall - 0.75).abs() < 1e-12);
        assert!((report.accuracy - 5.0 / 7.0).abs() < 1e-12);
        assert_eq!(report.legitimate.support, 3);
        assert_eq!(report.phishing.support, 4);
        assert_eq!(report.macro_avg.support, 7);

        let expected_weighted = (2.0 / 3.0 * 3.0 + 0.75 * 4.0) / 7.0;
        assert!((report.weighted_avg.precision - expected_weighted).abs() < 1e-12);
    }

    #[test]
    fn test_unlabelled_rows_are_skipped() {
        let labels = [None, Some(1), None];
        let scores = [0.9, 0.9, 0.1];
        let report = ClassificationReport::evaluate(&labels, &scores).unwrap();
        assert_eq!(report.confusion_matrix, [[0, 0], [0, 1]]);
        // no legitimate rows: zero-division yields 0
        assert_eq!(report.legitimate.precision, 0.0);
        assert_eq!(report.accuracy, 1.0);

        assert!(ClassificationReport::evaluate(&[None, None], &[0.3, 0.7]).is_none());
    }

    #[test]
    fn test_json_uses_report_keys() {
        let report = ClassificationReport::evaluate(&[Some(0), Some(1)], &[0.2, 0.8]).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("0").is_some());
        assert!(json["1"].get("f1-score").is_some());
        assert!(json.get("macro avg").is_some());
        assert!(json.get("weighted avg").is_some());
    }
}
