//! Register CSV persistence
//!
//! Writing overwrites the target file. Reading validates the schema and
//! every row so a hand-edited register fails loudly instead of skewing
//! the summary.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use super::record::{RegisterRow, REGISTER_COLUMNS};
use crate::error::{GrcError, GrcResult};
use crate::logic::risk::RiskLevel;

pub fn write_register<P: AsRef<Path>>(path: P, rows: &[RegisterRow]) -> GrcResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    write_register_to(file, rows)?;
    log::info!("Wrote {} register rows to: {}", rows.len(), path.display());
    Ok(())
}

pub fn write_register_to<W: Write>(writer: W, rows: &[RegisterRow]) -> GrcResult<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    // Header is written explicitly so an empty register still carries it
    wtr.write_record(REGISTER_COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_register<P: AsRef<Path>>(path: P) -> GrcResult<Vec<RegisterRow>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let rows = read_register_from(file, &path.display().to_string())?;
    log::debug!("Read {} register rows from: {}", rows.len(), path.display());
    Ok(rows)
}

pub fn read_register_from<R: Read>(reader: R, source_name: &str) -> GrcResult<Vec<RegisterRow>> {
    let mut rdr = ReaderBuilder::new().from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut idx = [0usize; 5];
    let mut missing = Vec::new();
    for (slot, name) in idx.iter_mut().zip(REGISTER_COLUMNS) {
        match headers.iter().position(|h| h.trim() == name) {
            Some(i) => *slot = i,
            None => missing.push(name),
        }
    }
    if !missing.is_empty() {
        return Err(GrcError::MissingColumns {
            source_name: source_name.to_string(),
            expected: missing.iter().map(|s| s.to_string()).collect(),
            found: headers.iter().map(|s| s.to_string()).collect(),
        });
    }

    let mut rows = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        rows.push(parse_row(&record, &idx, row)?);
    }
    Ok(rows)
}

fn parse_row(record: &StringRecord, idx: &[usize; 5], row: usize) -> GrcResult<RegisterRow> {
    let field = |i: usize| record.get(idx[i]).unwrap_or("");
    let invalid = |reason: String| GrcError::InvalidRegister { row, reason };

    let risk_score: f64 = field(1)
        .trim()
        .parse()
        .map_err(|_| invalid(format!("risk_score '{}' is not a number", field(1))))?;
    if !(0.0..=1.0).contains(&risk_score) {
        return Err(invalid(format!("risk_score {} outside [0, 1]", risk_score)));
    }

    let risk_level: RiskLevel = field(2)
        .parse()
        .map_err(|e: crate::logic::risk::ParseRiskLevelError| invalid(e.to_string()))?;

    let gdpr_compliance_score: u8 = field(4)
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.fract() == 0.0 && (0.0..=100.0).contains(v))
        .map(|v| v as u8)
        .ok_or_else(|| invalid(format!("gdpr_compliance_score '{}' is not an integer in 0..=100", field(4))))?;

    Ok(RegisterRow {
        email_preview: field(0).to_string(),
        risk_score,
        risk_level,
        grc_control: field(3).to_string(),
        gdpr_compliance_score,
    })
}
