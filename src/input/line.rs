use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::LogRecord;

/// Two leading tokens (typically date and time), each followed by whitespace
static LINE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\S+\s+\S+\s+").expect("LINE_PREFIX pattern is valid"));

/// Result of parsing a single log line
#[derive(Debug)]
pub enum LineOutcome {
    /// The line held a well-formed record
    Record(LogRecord),
    /// Empty or non-JSON line, dropped without a diagnostic
    Skipped,
    /// Looked like JSON but did not decode into a record
    Malformed(serde_json::Error),
}

/// Drop the two-token prefix in front of the JSON payload.
///
/// Strips through the whitespace that follows the second token. Lines without
/// two whitespace-terminated tokens are returned unchanged.
pub fn strip_line_prefix(line: &str) -> &str {
    match LINE_PREFIX.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// Parse one raw line into a record
pub fn parse_line(line: &str) -> LineOutcome {
    let payload = strip_line_prefix(line);

    if !payload.starts_with('{') {
        return LineOutcome::Skipped;
    }

    match serde_json::from_str::<LogRecord>(payload) {
        Ok(record) => LineOutcome::Record(record),
        Err(e) => LineOutcome::Malformed(e),
    }
}
