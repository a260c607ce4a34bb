//! Configuration module

use std::env;
use std::path::PathBuf;

use phishguard_core::constants;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Register served at startup and restored by DELETE /api/v1/register
    pub register_path: PathBuf,

    /// Classification metrics written by the pipeline
    pub metrics_path: PathBuf,

    /// Optional control policy JSON (built-in controls otherwise)
    pub policy_path: Option<PathBuf>,

    /// Largest accepted register upload in bytes
    pub max_upload_bytes: usize,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            register_path: env::var("REGISTER_PATH")
                .unwrap_or_else(|_| constants::DEFAULT_REGISTER_PATH.to_string())
                .into(),

            metrics_path: env::var("METRICS_PATH")
                .unwrap_or_else(|_| constants::DEFAULT_METRICS_PATH.to_string())
                .into(),

            policy_path: env::var("POLICY_PATH").ok().map(PathBuf::from),

            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(16 * 1024 * 1024),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
