//! PhishGuard GRC core
//!
//! Scores emails with a pre-trained phishing classifier, maps each score to
//! a risk level and compliance controls, and writes the risk register and
//! compliance report consumed by the register API.

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{GrcError, GrcResult};
