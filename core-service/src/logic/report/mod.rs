//! Compliance Report Module
//!
//! Renders the register as a Markdown GRC report.

pub mod markdown;

use std::fs;
use std::path::Path;

use chrono::{DateTime, FixedOffset, Local};

use crate::error::GrcResult;
use crate::logic::model::ClassificationReport;
use crate::logic::register::RegisterRow;
use crate::logic::risk::ControlPolicy;

pub use markdown::render;

pub struct ComplianceReport<'a> {
    rows: &'a [RegisterRow],
    policy: &'a ControlPolicy,
    metrics: Option<&'a ClassificationReport>,
    generated_at: DateTime<FixedOffset>,
}

impl<'a> ComplianceReport<'a> {
    pub fn new(rows: &'a [RegisterRow], policy: &'a ControlPolicy) -> Self {
        Self {
            rows,
            policy,
            metrics: None,
            generated_at: Local::now().fixed_offset(),
        }
    }

    pub fn with_metrics(mut self, metrics: Option<&'a ClassificationReport>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn generated_at(mut self, at: DateTime<FixedOffset>) -> Self {
        self.generated_at = at;
        self
    }

    pub fn render(&self) -> String {
        markdown::render(self.rows, self.policy, self.metrics, &self.generated_at)
    }

    /// Overwrites `path`, creating parent directories
    pub fn write<P: AsRef<Path>>(&self, path: P) -> GrcResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render())?;
        log::info!("GRC compliance report written to: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("grc.md");
        let policy = ControlPolicy::default();

        ComplianceReport::new(&[], &policy).write(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Comprehensive GRC Compliance Report"));

        // second write overwrites
        ComplianceReport::new(&[], &policy).write(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().matches("# Comprehensive").count(), 1);
    }

    #[test]
    fn test_generated_at_pins_written_date() {
        use chrono::TimeZone;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grc.md");
        let policy = ControlPolicy::default();
        let at = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 19, 8, 0, 0)
            .unwrap();

        ComplianceReport::new(&[], &policy).generated_at(at).write(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("## Date: 2026-10-19 08:00:00 +00:00\n"));
    }
}
