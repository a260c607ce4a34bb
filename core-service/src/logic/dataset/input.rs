//! Input tables
//!
//! Two layouts are accepted:
//! - text: `text_combined` (or `text`) + optional `label`, vectorized here
//! - features: one column per vocabulary term (file order) + `has_url` +
//!   `urgency_words` + optional `label`. Lexical columns are headed by
//!   their column index or their term.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};

use crate::error::{GrcError, GrcResult};
use crate::logic::features::{EngineeredFeatures, FeatureBuilder, FeatureVector, Vocabulary};

pub const TEXT_COLUMN: &str = "text_combined";
pub const TEXT_ALIAS: &str = "text";
pub const LABEL_COLUMN: &str = "label";
pub const HAS_URL_COLUMN: &str = "has_url";
pub const URGENCY_COLUMN: &str = "urgency_words";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    Text,
    Features,
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(InputFormat::Text),
            "features" => Ok(InputFormat::Features),
            other => Err(format!("unknown input format '{}' (expected text or features)", other)),
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Text => write!(f, "text"),
            InputFormat::Features => write!(f, "features"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputRow {
    pub vector: FeatureVector,
    pub label: Option<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct InputTable {
    pub rows: Vec<InputRow>,
    /// Rows skipped for a missing text or label
    pub dropped: usize,
}

impl InputTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_labels(&self) -> bool {
        self.rows.iter().any(|r| r.label.is_some())
    }
}

// ============================================================================
// LOADERS
// ============================================================================

pub fn load_input<P: AsRef<Path>>(path: P, format: InputFormat, vocabulary: &Vocabulary) -> GrcResult<InputTable> {
    let path = path.as_ref();
    log::info!("Loading {} input from: {}", format, path.display());

    let file = File::open(path)?;
    let source_name = path.display().to_string();
    let table = match format {
        InputFormat::Text => read_text(file, vocabulary, &source_name)?,
        InputFormat::Features => read_features(file, vocabulary, &source_name)?,
    };

    if table.dropped > 0 {
        log::warn!("Dropped {} rows with missing text or label", table.dropped);
    }
    log::info!("Loaded {} rows ({} labelled)", table.len(), table.rows.iter().filter(|r| r.label.is_some()).count());
    Ok(table)
}

pub fn read_text<R: Read>(reader: R, vocabulary: &Vocabulary, source_name: &str) -> GrcResult<InputTable> {
    let mut rdr = ReaderBuilder::new().from_reader(reader);
    let headers = rdr.headers()?.clone();

    let text_idx = column(&headers, TEXT_COLUMN)
        .or_else(|| column(&headers, TEXT_ALIAS))
        .ok_or_else(|| missing(source_name, &[TEXT_COLUMN], &headers))?;
    let label_idx = column(&headers, LABEL_COLUMN);

    let builder = FeatureBuilder::new(vocabulary);
    let mut table = InputTable::default();

    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let text = record.get(text_idx).unwrap_or("");

        let label = match label_idx {
            Some(idx) => match parse_label(record.get(idx).unwrap_or(""), row)? {
                Some(label) => Some(label),
                None => {
                    table.dropped += 1;
                    continue;
                }
            },
            None => None,
        };

        if text.trim().is_empty() {
            table.dropped += 1;
            continue;
        }

        table.rows.push(InputRow {
            vector: builder.build(text),
            label,
        });
    }

    Ok(table)
}

pub fn read_features<R: Read>(reader: R, vocabulary: &Vocabulary, source_name: &str) -> GrcResult<InputTable> {
    let mut rdr = ReaderBuilder::new().from_reader(reader);
    let headers = rdr.headers()?.clone();

    let has_url_idx = column(&headers, HAS_URL_COLUMN);
    let urgency_idx = column(&headers, URGENCY_COLUMN);
    let (has_url_idx, urgency_idx) = match (has_url_idx, urgency_idx) {
        (Some(h), Some(u)) => (h, u),
        _ => return Err(missing(source_name, &[HAS_URL_COLUMN, URGENCY_COLUMN], &headers)),
    };
    let label_idx = column(&headers, LABEL_COLUMN);

    let lexical_idx: Vec<usize> = (0..headers.len())
        .filter(|&i| i != has_url_idx && i != urgency_idx && Some(i) != label_idx)
        .collect();
    if lexical_idx.len() != vocabulary.len() {
        return Err(GrcError::VocabularyMismatch {
            expected: vocabulary.len(),
            found: lexical_idx.len(),
        });
    }
    check_lexical_headers(&headers, &lexical_idx, vocabulary)?;

    let mut table = InputTable::default();

    for (row, record) in rdr.records().enumerate() {
        let record = record?;

        let label = match label_idx {
            Some(idx) => match parse_label(record.get(idx).unwrap_or(""), row)? {
                Some(label) => Some(label),
                None => {
                    table.dropped += 1;
                    continue;
                }
            },
            None => None,
        };

        let lexical = lexical_idx
            .iter()
            .map(|&i| parse_float(&headers, &record, i, row))
            .collect::<GrcResult<Vec<f32>>>()?;
        let engineered = EngineeredFeatures {
            has_url: parse_float(&headers, &record, has_url_idx, row)?,
            urgency_words: parse_float(&headers, &record, urgency_idx, row)?,
        };

        table.rows.push(InputRow {
            vector: FeatureVector::new(lexical, engineered),
            label,
        });
    }

    Ok(table)
}

// ============================================================================
// HELPERS
// ============================================================================

fn column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

/// Position k must be headed `k` or the k-th vocabulary term
fn check_lexical_headers(headers: &StringRecord, lexical_idx: &[usize], vocabulary: &Vocabulary) -> GrcResult<()> {
    for (position, (&idx, term)) in lexical_idx.iter().zip(vocabulary.terms()).enumerate() {
        let found = headers.get(idx).unwrap_or("").trim();
        if found != term && found.parse::<usize>().ok() != Some(position) {
            return Err(GrcError::LexicalColumnMismatch {
                position,
                expected: term.clone(),
                found: found.to_string(),
            });
        }
    }
    Ok(())
}

fn missing(source_name: &str, expected: &[&str], headers: &StringRecord) -> GrcError {
    GrcError::MissingColumns {
        source_name: source_name.to_string(),
        expected: expected.iter().map(|s| s.to_string()).collect(),
        found: headers.iter().map(|s| s.to_string()).collect(),
    }
}

/// Empty → None (row is dropped); 0/1 (also "0.0"/"1.0") → label
fn parse_label(raw: &str, row: usize) -> GrcResult<Option<u8>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    match raw.parse::<f64>() {
        Ok(v) if v == 0.0 => Ok(Some(0)),
        Ok(v) if v == 1.0 => Ok(Some(1)),
        _ => Err(GrcError::InvalidValue {
            column: LABEL_COLUMN.to_string(),
            row,
            value: raw.to_string(),
        }),
    }
}

fn parse_float(headers: &StringRecord, record: &StringRecord, idx: usize, row: usize) -> GrcResult<f32> {
    let raw = record.get(idx).unwrap_or("").trim();
    raw.parse::<f32>().map_err(|_| GrcError::InvalidValue {
        column: headers.get(idx).unwrap_or("?").to_string(),
        row,
        value: raw.to_string(),
    })
}
