//! End-to-end run against on-disk artifacts

use std::fs;
use std::path::Path;

use phishguard_core::logic::config::PipelineConfig;
use phishguard_core::logic::dataset::InputFormat;
use phishguard_core::logic::dataset::read_text;
use phishguard_core::logic::features::{FeatureVector, Vocabulary};
use phishguard_core::logic::model::{ClassificationReport, Classifier, InferenceError};
use phishguard_core::logic::pipeline::{self, Pipeline};
use phishguard_core::logic::register::{read_register, summarize, write_register};
use phishguard_core::logic::report::ComplianceReport;
use phishguard_core::logic::risk::{ControlPolicy, RiskLevel};
use phishguard_core::GrcError;

const VECTORIZER: &str = r#"{
    "vocabulary": {"account": 0, "click": 1, "verify": 2},
    "idf": [1.0, 1.0, 1.0]
}"#;

// click absent → 0.1; click present → 0.45, or 0.85 with urgency words
const FOREST: &str = r#"{
    "n_features": 5,
    "trees": [{
        "children_left":  [1, -1, 3, -1, -1],
        "children_right": [2, -1, 4, -1, -1],
        "feature":        [1, -2, 4, -2, -2],
        "threshold":      [0.0, -2.0, 0.5, -2.0, -2.0],
        "value": [[0.5, 0.5], [0.9, 0.1], [0.5, 0.5], [0.55, 0.45], [0.15, 0.85]]
    }]
}"#;

const INPUT: &str = "\
text_combined,label
See you at lunch on Friday,0
Please click to verify the invoice,0
URGENT click now to verify your account,1
,1
";

fn write_artifacts(dir: &Path) -> PipelineConfig {
    fs::write(dir.join("vectorizer.json"), VECTORIZER).unwrap();
    fs::write(dir.join("forest.json"), FOREST).unwrap();
    fs::write(
        dir.join("model.json"),
        r#"{"kind": "forest", "artifact": "forest.json", "n_features": 5}"#,
    )
    .unwrap();
    fs::write(dir.join("emails.csv"), INPUT).unwrap();

    PipelineConfig {
        input: dir.join("emails.csv"),
        format: InputFormat::Text,
        vectorizer: dir.join("vectorizer.json"),
        model: dir.join("model.json"),
        register: dir.join("out/register.csv"),
        report: dir.join("out/report.md"),
        metrics: dir.join("out/metrics.json"),
        sample_size: 5000,
        seed: Some(42),
        policy: None,
    }
}

#[test]
fn test_full_run_writes_all_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_artifacts(dir.path());

    let outcome = pipeline::run(&config).unwrap();
    assert_eq!(outcome.seed, 42);
    assert_eq!(outcome.summary.total, 3);
    assert_eq!(outcome.summary.average_compliance_score, Some(70.0));

    let rows = read_register(&config.register).unwrap();
    let levels: Vec<RiskLevel> = rows.iter().map(|r| r.risk_level).collect();
    assert_eq!(levels, vec![RiskLevel::Low, RiskLevel::Medium, RiskLevel::High]);
    assert_eq!(rows[0].risk_score, 0.1);
    assert_eq!(rows[2].risk_score, 0.85);
    assert_eq!(rows[0].email_preview, "No text preview");
    assert_eq!(rows[2].email_preview, "account click verify...");

    let report = fs::read_to_string(&config.report).unwrap();
    assert!(report.contains("- Total Sampled: 3\n"));
    assert!(report.contains("- High Risk: 1 (GDPR Article 33)\n"));
    assert!(report.contains("- Average GDPR Compliance Score: 70.0/100\n"));

    let metrics = ClassificationReport::load(&config.metrics).unwrap();
    // 0.45 is not phishing at the 0.5 decision threshold
    assert_eq!(metrics.confusion_matrix, [[2, 0], [0, 1]]);
    assert_eq!(outcome.metrics_path.as_deref(), Some(config.metrics.as_path()));
}

#[test]
fn test_same_seed_same_register() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_artifacts(dir.path());
    config.sample_size = 2;

    pipeline::run(&config).unwrap();
    let first = read_register(&config.register).unwrap();
    pipeline::run(&config).unwrap();
    let second = read_register(&config.register).unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[test]
fn test_unlabelled_input_skips_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_artifacts(dir.path());
    fs::write(&config.input, "text\nclick here\nhello there\n").unwrap();

    let outcome = pipeline::run(&config).unwrap();
    assert_eq!(outcome.summary.total, 2);
    assert!(outcome.metrics.is_none());
    assert!(!config.metrics.exists());
}

#[test]
fn test_model_width_mismatch_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_artifacts(dir.path());
    fs::write(
        &config.model,
        r#"{"kind": "forest", "artifact": "forest.json", "n_features": 502}"#,
    )
    .unwrap();

    let err = pipeline::run(&config).unwrap_err();
    assert!(matches!(err, GrcError::FeatureWidthMismatch { expected: 502, found: 5, .. }));
    assert!(!config.register.exists());
    assert!(!config.report.exists());
}

#[test]
fn test_missing_text_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_artifacts(dir.path());
    fs::write(&config.input, "body,label\nhello,0\n").unwrap();

    let err = pipeline::run(&config).unwrap_err();
    assert!(err.to_string().contains("text_combined"));
    assert!(!config.register.exists());
}

/// Scores each row by its `has_url` feature: 0.85 with a URL, else 0.1
struct UrlOnly {
    width: usize,
}

impl Classifier for UrlOnly {
    fn name(&self) -> &str {
        "url-only"
    }

    fn n_features(&self) -> usize {
        self.width
    }

    fn predict_proba(&self, batch: &[FeatureVector]) -> Result<Vec<f64>, InferenceError> {
        Ok(batch
            .iter()
            .map(|v| if v.engineered().has_url > 0.0 { 0.85 } else { 0.1 })
            .collect())
    }
}

#[test]
fn test_injected_classifier_outputs_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("vectorizer.json"), VECTORIZER).unwrap();
    let vocabulary = Vocabulary::load(dir.path().join("vectorizer.json")).unwrap();
    let policy = ControlPolicy::default();
    let classifier = UrlOnly { width: 5 };

    let input = "text\nverify at http://example.test\nlunch?\nclick http://x.test now\n";
    let table = read_text(input.as_bytes(), &vocabulary, "mem").unwrap();

    let assessment = Pipeline::new(&vocabulary, &classifier, &policy)
        .assess(table, 10, 3)
        .unwrap();
    assert_eq!(assessment.stats.method, "url-only");

    let register = dir.path().join("register.csv");
    write_register(&register, &assessment.rows).unwrap();
    let rows = read_register(&register).unwrap();
    assert_eq!(rows, assessment.rows);

    let summary = summarize(&rows, &policy);
    assert_eq!(summary.count(RiskLevel::High), 2);
    assert_eq!(summary.count(RiskLevel::Low), 1);
    assert_eq!(rows[1].email_preview, "No text preview");
    assert_eq!(rows[1].gdpr_compliance_score, 90);

    let report = ComplianceReport::new(&rows, &policy).render();
    assert!(report.contains("- High Risk: 2 (GDPR Article 33)"));
    assert!(report.contains("- Average GDPR Compliance Score: 63.3/100"));
}
