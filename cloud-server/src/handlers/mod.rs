//! HTTP handlers

pub mod health;
pub mod register;
pub mod reports;
pub mod metrics;
