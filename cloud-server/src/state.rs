//! Shared application state
//!
//! The served register is an immutable snapshot; uploads and resets build a
//! new snapshot and swap it in under the write lock.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use phishguard_core::logic::register::{read_register_from, RegisterRow};
use phishguard_core::logic::risk::ControlPolicy;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct RegisterSnapshot {
    pub id: Uuid,
    /// File path, or "upload"
    pub source: String,
    pub loaded_at: DateTime<Utc>,
    pub rows: Vec<RegisterRow>,
}

impl RegisterSnapshot {
    pub fn new(rows: Vec<RegisterRow>, source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            loaded_at: Utc::now(),
            rows,
        }
    }

    /// Parse and validate CSV bytes
    pub fn from_csv(bytes: &[u8], source: &str) -> AppResult<Self> {
        let rows = read_register_from(bytes, source)?;
        Ok(Self::new(rows, source))
    }

    /// Load the persisted register; a missing file yields an empty register
    pub async fn load_default(path: &Path) -> AppResult<Self> {
        let source = path.display().to_string();
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let snapshot = Self::from_csv(&bytes, &source)?;
                tracing::info!("Loaded register {} ({} rows)", source, snapshot.rows.len());
                Ok(snapshot)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Register {} not found, serving an empty register", source);
                Ok(Self::new(Vec::new(), source))
            }
            Err(e) => Err(AppError::InternalError(format!("failed to read {}: {}", source, e))),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub policy: Arc<ControlPolicy>,
    pub register: Arc<RwLock<Arc<RegisterSnapshot>>>,
}

impl AppState {
    pub fn new(config: Config, policy: ControlPolicy, snapshot: RegisterSnapshot) -> Self {
        Self {
            config,
            policy: Arc::new(policy),
            register: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    /// Current snapshot; the lock is released before the caller uses it
    pub async fn snapshot(&self) -> Arc<RegisterSnapshot> {
        self.register.read().await.clone()
    }

    pub async fn replace(&self, snapshot: RegisterSnapshot) -> Arc<RegisterSnapshot> {
        let snapshot = Arc::new(snapshot);
        *self.register.write().await = snapshot.clone();
        snapshot
    }
}
