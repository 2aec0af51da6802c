pub mod config;
pub mod detection;
pub mod input;
pub mod models;
pub mod output;

// Re-export commonly used types
pub use config::Config;
pub use detection::{DetectionEngine, DetectionRule, ScanReport, ScanSummary};
pub use input::{LogReader, ParsedLog};
pub use models::{Finding, FindingKind, LogRecord, NumberedRecord};
pub use output::{OutputFormat, OutputHandler};
