//! Dataset Module - held-out input loading and sampling
//!
//! Reads the input table (raw text or precomputed feature vectors) and picks
//! the rows that will be scored.

pub mod input;
pub mod sample;


pub use input::{load_input, read_features, read_text, InputFormat, InputRow, InputTable};
pub use sample::{resolve_seed, sample_indices, take_sample};
