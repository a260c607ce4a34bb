//! Risk Register Module
//!
//! The register is the pipeline's primary output: one row per assessed
//! email, persisted as CSV and read back by the summary CLI and the
//! register API.

pub mod record;
pub mod writer;
pub mod summary;

#[cfg(test)]
mod tests;

pub use record::{round2, RegisterRow, REGISTER_COLUMNS};
pub use writer::{read_register, read_register_from, write_register, write_register_to};
pub use summary::{filter_by_level, levels_present, summarize, LevelCount, RegisterSummary};
