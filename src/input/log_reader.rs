use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::line::{parse_line, LineOutcome};
use super::InputError;
use crate::models::NumberedRecord;

/// Per-run counters collected while parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines_read: usize,
    pub records: usize,
    pub skipped: usize,
    pub malformed: usize,
}

/// Everything read from one log source
#[derive(Debug, Default)]
pub struct ParsedLog {
    pub records: Vec<NumberedRecord>,
    pub stats: ParseStats,
}

/// Reads a whole access log into structured records
pub struct LogReader<R> {
    reader: R,
}

impl LogReader<BufReader<File>> {
    /// Open a log file for reading
    pub fn open(path: &Path) -> Result<Self, InputError> {
        let file = File::open(path).map_err(|source| InputError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(LogReader::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> LogReader<R> {
    pub fn from_reader(reader: R) -> Self {
        LogReader { reader }
    }

    /// Read every line to the end of the source.
    ///
    /// Undecodable JSON lines are logged and dropped; only I/O failures abort.
    pub fn read_records(mut self) -> Result<ParsedLog, InputError> {
        let mut parsed = ParsedLog::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let line_no = parsed.stats.lines_read + 1;
            let bytes_read = self
                .reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| InputError::Read {
                    line: line_no,
                    source,
                })?;

            if bytes_read == 0 {
                break; // EOF
            }
            parsed.stats.lines_read = line_no;

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(&['\n', '\r'][..]);

            match parse_line(line) {
                LineOutcome::Record(record) => {
                    parsed.stats.records += 1;
                    parsed.records.push(NumberedRecord {
                        line: line_no,
                        record,
                    });
                }
                LineOutcome::Skipped => parsed.stats.skipped += 1,
                LineOutcome::Malformed(e) => {
                    parsed.stats.malformed += 1;
                    log::warn!("Error unmarshaling log entry at line {}: {}", line_no, e);
                }
            }
        }

        log::debug!(
            "Read {} line(s): {} record(s), {} skipped, {} malformed",
            parsed.stats.lines_read,
            parsed.stats.records,
            parsed.stats.skipped,
            parsed.stats.malformed
        );

        Ok(parsed)
    }
}
