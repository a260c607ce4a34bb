use super::*;
use crate::error::GrcError;
use crate::logic::risk::{annotate, classify, ControlPolicy, RiskLevel};

fn row_for(score: f64, preview: &str) -> RegisterRow {
    let policy = ControlPolicy::default();
    let level = classify(score);
    RegisterRow::new(preview.to_string(), score, level, annotate(level, &policy))
}

fn sample_rows() -> Vec<RegisterRow> {
    vec![
        row_for(0.1, "lunch friday..."),
        row_for(0.45, "invoice attached..."),
        row_for(0.85, "urgent verify account..."),
    ]
}

#[test]
fn test_summary_of_three_scores() {
    let rows = sample_rows();
    let summary = summarize(&rows, &ControlPolicy::default());

    assert_eq!(summary.total, 3);
    assert_eq!(summary.count(RiskLevel::High), 1);
    assert_eq!(summary.count(RiskLevel::Medium), 1);
    assert_eq!(summary.count(RiskLevel::Low), 1);
    assert_eq!(summary.average_compliance_score, Some(70.0));
    assert_eq!(summary.average_display(), "70.0/100");

    let order: Vec<RiskLevel> = summary.levels.iter().map(|l| l.risk_level).collect();
    assert_eq!(order, vec![RiskLevel::High, RiskLevel::Medium, RiskLevel::Low]);
    assert_eq!(summary.levels[0].gdpr_reference, "Article 33 - Breach Notification");
}

#[test]
fn test_empty_register_summary() {
    let summary = summarize(&[], &ControlPolicy::default());
    assert_eq!(summary.total, 0);
    assert_eq!(summary.levels.len(), 3);
    assert!(summary.levels.iter().all(|l| l.count == 0));
    assert_eq!(summary.average_compliance_score, None);
    assert_eq!(summary.average_display(), "n/a");
}

#[test]
fn test_filter_and_levels_present() {
    let mut rows = sample_rows();
    rows.push(row_for(0.95, "reset password now..."));

    let high = filter_by_level(&rows, Some(RiskLevel::High));
    assert_eq!(high.len(), 2);
    assert!(high.iter().all(|r| r.risk_level == RiskLevel::High));
    assert_eq!(high[0].email_preview, "urgent verify account...");

    assert_eq!(filter_by_level(&rows, None).len(), 4);

    assert_eq!(
        levels_present(&rows),
        vec![RiskLevel::Low, RiskLevel::Medium, RiskLevel::High]
    );

    let only_low = vec![row_for(0.2, "a...")];
    assert_eq!(levels_present(&only_low), vec![RiskLevel::Low]);
    assert!(filter_by_level(&only_low, Some(RiskLevel::Medium)).is_empty());
}

#[test]
fn test_write_then_read_register() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("register.csv");
    let rows = sample_rows();

    write_register(&path, &rows).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("email_preview,risk_score,risk_level,grc_control,gdpr_compliance_score"));
    assert!(text.contains(",0.85,High,"));

    let back = read_register(&path).unwrap();
    assert_eq!(back, rows);
}

#[test]
fn test_empty_register_keeps_header() {
    let mut buf = Vec::new();
    write_register_to(&mut buf, &[]).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text.trim(), REGISTER_COLUMNS.join(","));
    assert!(read_register_from(text.as_bytes(), "mem").unwrap().is_empty());
}

#[test]
fn test_preview_with_comma_is_quoted() {
    let rows = vec![row_for(0.5, "hello, world...")];
    let mut buf = Vec::new();
    write_register_to(&mut buf, &rows).unwrap();
    let back = read_register_from(buf.as_slice(), "mem").unwrap();
    assert_eq!(back[0].email_preview, "hello, world...");
}

#[test]
fn test_read_rejects_missing_column() {
    let data = "email_preview,risk_score,risk_level\nx,0.5,Medium\n";
    let err = read_register_from(data.as_bytes(), "register.csv").unwrap_err();
    match err {
        GrcError::MissingColumns { expected, .. } => {
            assert_eq!(expected, vec!["grc_control", "gdpr_compliance_score"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_read_rejects_bad_rows() {
    let header = "email_preview,risk_score,risk_level,grc_control,gdpr_compliance_score\n";

    let bad_level = format!("{header}x,0.5,Critical,c,70\n");
    assert!(matches!(
        read_register_from(bad_level.as_bytes(), "mem"),
        Err(GrcError::InvalidRegister { row: 0, .. })
    ));

    let bad_score = format!("{header}x,0.5,Medium,c,70\ny,1.5,High,c,50\n");
    assert!(matches!(
        read_register_from(bad_score.as_bytes(), "mem"),
        Err(GrcError::InvalidRegister { row: 1, .. })
    ));

    let bad_compliance = format!("{header}x,0.5,Medium,c,170\n");
    assert!(read_register_from(bad_compliance.as_bytes(), "mem").is_err());
}

#[test]
fn test_read_accepts_lowercase_level_and_float_compliance() {
    let data = "email_preview,risk_score,risk_level,grc_control,gdpr_compliance_score\nx,0.9,high,c,50.0\n";
    let rows = read_register_from(data.as_bytes(), "mem").unwrap();
    assert_eq!(rows[0].risk_level, RiskLevel::High);
    assert_eq!(rows[0].gdpr_compliance_score, 50);
}
