//! Risk assessment pipeline
//!
//! load artifacts → load input → sample → score → classify/annotate →
//! register + report + metrics. Every output is written only after the
//! whole sample has been scored, so a failing run leaves nothing behind.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;

use crate::error::GrcResult;
use crate::logic::config::PipelineConfig;
use crate::logic::dataset::{load_input, resolve_seed, sample_indices, take_sample, InputTable};
use crate::logic::features::layout::LayoutInfo;
use crate::logic::features::{preview_text, Vocabulary};
use crate::logic::model::manifest::load_from_manifest;
use crate::logic::model::{ClassificationReport, Classifier, ModelManifest, ModelMetadata, RiskScorer, ScoringStats};
use crate::logic::register::{summarize, write_register, RegisterRow, RegisterSummary};
use crate::logic::report::ComplianceReport;
use crate::logic::risk::{annotate, classify_with_thresholds, ControlPolicy};

/// Scored sample, nothing persisted yet
#[derive(Debug, Clone)]
pub struct Assessment {
    pub rows: Vec<RegisterRow>,
    /// Unrounded, aligned with `rows`
    pub scores: Vec<f64>,
    pub labels: Vec<Option<u8>>,
    pub stats: ScoringStats,
    pub seed: u64,
}

impl Assessment {
    pub fn metrics(&self) -> Option<ClassificationReport> {
        ClassificationReport::evaluate(&self.labels, &self.scores)
    }
}

pub struct Pipeline<'a> {
    vocabulary: &'a Vocabulary,
    classifier: &'a dyn Classifier,
    policy: &'a ControlPolicy,
}

impl<'a> Pipeline<'a> {
    pub fn new(vocabulary: &'a Vocabulary, classifier: &'a dyn Classifier, policy: &'a ControlPolicy) -> Self {
        Self {
            vocabulary,
            classifier,
            policy,
        }
    }

    pub fn assess(&self, table: InputTable, sample_size: usize, seed: u64) -> GrcResult<Assessment> {
        // 1. Sample
        let indices = sample_indices(table.len(), sample_size, seed);
        let sample = take_sample(table.rows, &indices);
        log::info!("Sampled {} rows (seed {})", sample.len(), seed);

        let (vectors, labels): (Vec<_>, Vec<_>) = sample.into_iter().map(|r| (r.vector, r.label)).unzip();

        // 2. Score (width-checked before any inference)
        let (scores, stats) = RiskScorer::new(self.classifier).score(&vectors)?;

        // 3. Classify, annotate, preview
        let mut rows = Vec::with_capacity(vectors.len());
        for (vector, &score) in vectors.iter().zip(&scores) {
            let level = classify_with_thresholds(score, &self.policy.thresholds);
            let preview = preview_text(self.vocabulary, vector)?;
            rows.push(RegisterRow::new(preview, score, level, annotate(level, self.policy)));
        }

        Ok(Assessment {
            rows,
            scores,
            labels,
            stats,
            seed,
        })
    }
}

/// What a run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub register_path: PathBuf,
    pub report_path: PathBuf,
    /// None when the sample had no labels
    pub metrics_path: Option<PathBuf>,
    pub seed: u64,
    pub summary: RegisterSummary,
    pub metrics: Option<ClassificationReport>,
    pub model: ModelMetadata,
    pub stats: ScoringStats,
    pub elapsed_ms: u64,
}

pub fn run(config: &PipelineConfig) -> GrcResult<RunSummary> {
    let start_time = Instant::now();
    config.validate()?;
    let policy = config.load_policy()?;

    // Artifacts
    let vocabulary = Vocabulary::load(&config.vectorizer)?;
    let layout = vocabulary.layout();
    let info = LayoutInfo::from(&layout);
    log::info!(
        "Feature layout v{}: {} features, hash {:08x}",
        info.version,
        info.feature_count,
        info.hash
    );
    let manifest = ModelManifest::load(&config.model)?;
    manifest.check_layout(&layout)?;
    let (classifier, model) = load_from_manifest(&manifest, &config.model)?;
    log::info!(
        "Model ready: {} ({} features, sha256 {})",
        classifier.name(),
        model.features,
        model.sha256
    );

    // Input + assessment
    let table = load_input(&config.input, config.format, &vocabulary)?;
    let seed = resolve_seed(config.seed);
    let assessment = Pipeline::new(&vocabulary, classifier.as_ref(), &policy).assess(table, config.sample_size, seed)?;
    let metrics = assessment.metrics();

    // Outputs
    write_register(&config.register, &assessment.rows)?;

    let metrics_path = match &metrics {
        Some(report) => {
            report.save(&config.metrics)?;
            log::info!("Classification metrics written to: {}", config.metrics.display());
            Some(config.metrics.clone())
        }
        None => {
            log::info!("Sample has no labels, skipping metrics");
            None
        }
    };

    ComplianceReport::new(&assessment.rows, &policy)
        .with_metrics(metrics.as_ref())
        .write(&config.report)?;

    let summary = summarize(&assessment.rows, &policy);
    let elapsed_ms = start_time.elapsed().as_millis() as u64;
    log::info!(
        "Assessed {} emails in {} ms (High {}, Medium {}, Low {})",
        summary.total,
        elapsed_ms,
        summary.levels[0].count,
        summary.levels[1].count,
        summary.levels[2].count
    );

    Ok(RunSummary {
        register_path: config.register.clone(),
        report_path: config.report.clone(),
        metrics_path,
        seed,
        summary,
        metrics,
        model,
        stats: assessment.stats,
        elapsed_ms,
    })
}
