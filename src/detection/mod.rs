//! Detection engine
//!
//! Classifies each record's request path and applies the denied-access
//! heuristics. Every record is judged on its own; nothing carries over
//! from one record to the next.

pub mod engine;
pub mod request_target;
pub mod rules;

pub use engine::{DetectionEngine, ScanReport, ScanSummary};
pub use request_target::RequestTarget;
pub use rules::{AdminAccessRule, BalanceAccessRule};

use crate::models::{Finding, NumberedRecord};
use thiserror::Error;

/// Recoverable errors raised while examining a single record
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Error parsing URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// A single path-and-status heuristic
pub trait DetectionRule: Send + Sync {
    /// Name used in findings and the scan summary
    fn name(&self) -> &str;

    /// Inspect one record, returning a finding if it looks like abuse
    fn evaluate(&self, entry: &NumberedRecord, target: &RequestTarget) -> Option<Finding>;
}
