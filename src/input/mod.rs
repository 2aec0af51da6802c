//! Log parser
//!
//! Turns raw access-log lines into structured records. Lines that are not
//! JSON are skipped silently, JSON lines that fail to decode are reported
//! and dropped. Only failing to open or read the file is fatal.

pub mod line;
pub mod log_reader;

pub use line::{parse_line, strip_line_prefix, LineOutcome};
pub use log_reader::{LogReader, ParseStats, ParsedLog};

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors while reading a log source
#[derive(Error, Debug)]
pub enum InputError {
    #[error("could not read log file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading log at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}
