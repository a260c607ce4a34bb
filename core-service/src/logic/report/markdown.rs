//! Markdown rendering for the compliance report

use std::fmt::Write;

use chrono::{DateTime, FixedOffset};

use crate::logic::model::ClassificationReport;
use crate::logic::register::{summarize, RegisterRow, REGISTER_COLUMNS};
use crate::logic::risk::{ControlPolicy, RiskLevel};

pub const REPORT_TITLE: &str = "# Comprehensive GRC Compliance Report";
pub const REPORT_INTRO: &str = "This report integrates AI risk scoring with GRC frameworks, emphasizing GDPR for data protection in phishing threats.";
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// Rows shown under "Sample Risks"
pub const SAMPLE_ROWS: usize = crate::constants::REPORT_SAMPLE_ROWS;

pub fn render(
    rows: &[RegisterRow],
    policy: &ControlPolicy,
    metrics: Option<&ClassificationReport>,
    generated_at: &DateTime<FixedOffset>,
) -> String {
    let summary = summarize(rows, policy);
    let mut out = String::new();

    // fmt::Write into a String cannot fail
    let _ = writeln!(out, "{}", REPORT_TITLE);
    let _ = writeln!(out, "## Date: {}\n", generated_at.format(DATE_FORMAT));
    let _ = writeln!(out, "{}\n", REPORT_INTRO);

    let _ = writeln!(out, "### Risk Summary");
    let _ = writeln!(out, "- Total Sampled: {}", summary.total);
    for level in &summary.levels {
        let _ = writeln!(
            out,
            "- {} Risk: {} (GDPR {})",
            level.risk_level,
            level.count,
            article(&level.gdpr_reference)
        );
    }
    let _ = writeln!(out, "- Average GDPR Compliance Score: {}\n", summary.average_display());

    let _ = writeln!(out, "### GRC Control Mapping");
    let _ = writeln!(out, "| Risk Level | Frameworks |");
    let _ = writeln!(out, "|------------|------------|");
    for level in RiskLevel::SUMMARY_ORDER {
        let _ = writeln!(out, "| {} | {} |", level, escape_cell(&policy.control(level).grc_control));
    }
    out.push('\n');

    let _ = writeln!(out, "### Recommendations");
    for level in RiskLevel::SUMMARY_ORDER {
        let _ = writeln!(out, "- **{} Risk**: {}", level, policy.control(level).recommendation);
    }
    let _ = writeln!(out, "- Overall: {}\n", policy.overall_recommendation);

    if let Some(metrics) = metrics {
        render_metrics(&mut out, metrics);
    }

    let _ = writeln!(out, "### Sample Risks");
    out.push_str(&sample_table(&rows[..rows.len().min(SAMPLE_ROWS)]));
    out
}

/// "Article 33 - Breach Notification" → "Article 33"
fn article(reference: &str) -> &str {
    reference.split(" - ").next().unwrap_or(reference).trim()
}

fn render_metrics(out: &mut String, metrics: &ClassificationReport) {
    let _ = writeln!(out, "### Model Evaluation");
    let _ = writeln!(out, "- Accuracy: {:.4}", metrics.accuracy);
    let _ = writeln!(out, "| Class | Precision | Recall | F1-Score | Support |");
    let _ = writeln!(out, "|-------|-----------|--------|----------|---------|");
    for (name, class) in [
        ("Legitimate (0)", &metrics.legitimate),
        ("Phishing (1)", &metrics.phishing),
        ("Macro avg", &metrics.macro_avg),
        ("Weighted avg", &metrics.weighted_avg),
    ] {
        let _ = writeln!(
            out,
            "| {} | {:.4} | {:.4} | {:.4} | {} |",
            name, class.precision, class.recall, class.f1_score, class.support
        );
    }
    let [[tn, fp], [fn_, tp]] = metrics.confusion_matrix;
    let _ = writeln!(out, "- Confusion matrix: TN={} FP={} FN={} TP={}\n", tn, fp, fn_, tp);
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Pipe table with padded columns; numeric columns right-aligned
fn sample_table(rows: &[RegisterRow]) -> String {
    let numeric = [false, true, false, false, true];
    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|r| {
            [
                escape_cell(&r.email_preview),
                format!("{:.2}", r.risk_score),
                r.risk_level.to_string(),
                escape_cell(&r.grc_control),
                r.gdpr_compliance_score.to_string(),
            ]
        })
        .collect();

    let mut widths: [usize; 5] = REGISTER_COLUMNS.map(|c| c.chars().count());
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |values: &[String]| -> String {
        let padded: Vec<String> = values
            .iter()
            .zip(widths)
            .zip(numeric)
            .map(|((v, w), right)| if right { format!("{:>w$}", v) } else { format!("{:<w$}", v) })
            .collect();
        format!("| {} |\n", padded.join(" | "))
    };

    let header: Vec<String> = REGISTER_COLUMNS.iter().map(|c| c.to_string()).collect();
    let mut out = line(&header);

    let rule: Vec<String> = widths
        .iter()
        .zip(numeric)
        .map(|(&w, right)| {
            if right {
                format!("{}:", "-".repeat(w + 1))
            } else {
                format!(":{}", "-".repeat(w + 1))
            }
        })
        .collect();
    out.push_str(&format!("|{}|\n", rule.join("|")));

    for row in &cells {
        out.push_str(&line(row));
    }
    out
}
