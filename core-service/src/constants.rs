//! Central Configuration Constants
//!
//! Single source of truth for all pipeline defaults.
//! Every path default can be overridden by an environment variable and then
//! by a CLI flag.

/// Default labelled input table (raw email text)
pub const DEFAULT_INPUT_PATH: &str = "data/phishing_email.csv";

/// Default vectorizer artifact (vocabulary + idf)
pub const DEFAULT_VECTORIZER_PATH: &str = "models/vectorizer.json";

/// Default model manifest
pub const DEFAULT_MODEL_PATH: &str = "models/phishing_model.json";

/// Default persisted register
pub const DEFAULT_REGISTER_PATH: &str = "data/risk_register_full.csv";

/// Default narrative report
pub const DEFAULT_REPORT_PATH: &str = "reports/grc_compliance_report_full.md";

/// Default evaluation metrics output
pub const DEFAULT_METRICS_PATH: &str = "models/classification_metrics.json";

/// Maximum number of held-out rows scored per run
pub const DEFAULT_SAMPLE_SIZE: usize = 5000;

/// Rows shown in the report's sample table
pub const REPORT_SAMPLE_ROWS: usize = 10;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "PhishGuard GRC";

// ============================================
// Helper functions to read from env with fallback
// ============================================

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get input table path from environment or use default
pub fn get_input_path() -> String {
    env_or("PHISHGUARD_INPUT", DEFAULT_INPUT_PATH)
}

/// Get vectorizer artifact path from environment or use default
pub fn get_vectorizer_path() -> String {
    env_or("PHISHGUARD_VECTORIZER", DEFAULT_VECTORIZER_PATH)
}

/// Get model manifest path from environment or use default
pub fn get_model_path() -> String {
    env_or("PHISHGUARD_MODEL", DEFAULT_MODEL_PATH)
}

/// Get register output path from environment or use default
pub fn get_register_path() -> String {
    env_or("PHISHGUARD_REGISTER", DEFAULT_REGISTER_PATH)
}

/// Get report output path from environment or use default
pub fn get_report_path() -> String {
    env_or("PHISHGUARD_REPORT", DEFAULT_REPORT_PATH)
}

/// Get metrics output path from environment or use default
pub fn get_metrics_path() -> String {
    env_or("PHISHGUARD_METRICS", DEFAULT_METRICS_PATH)
}

/// Get sample cap from environment or use default
pub fn get_sample_size() -> usize {
    std::env::var("PHISHGUARD_SAMPLE_SIZE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SAMPLE_SIZE)
}

/// Get sampling seed from environment (None = draw one per run)
pub fn get_seed() -> Option<u64> {
    std::env::var("PHISHGUARD_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
}
