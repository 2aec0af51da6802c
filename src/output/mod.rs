use crate::models::Finding;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing results
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Console,
    Json,
    Jsonl,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "console" => OutputFormat::Console,
            "json" => OutputFormat::Json,
            "jsonl" => OutputFormat::Jsonl,
            other => {
                log::warn!("Unknown output format '{}', using console", other);
                OutputFormat::Console
            }
        }
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    parsed_logs: usize,
    findings: &'a [Finding],
}

/// Writes the parsed-record count and findings for one run
pub struct OutputHandler {
    format: OutputFormat,
    writer: Box<dyn Write>,
    parsed_logs: usize,
    pending: Vec<Finding>,
}

impl OutputHandler {
    /// Create a handler writing to a file (appending) or to standard output
    pub fn new(format: OutputFormat, file_path: Option<PathBuf>) -> Result<Self, OutputError> {
        let writer: Box<dyn Write> = match file_path {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(io::stdout()),
        };

        Ok(Self::with_writer(format, writer))
    }

    pub fn with_writer(format: OutputFormat, writer: Box<dyn Write>) -> Self {
        OutputHandler {
            format,
            writer,
            parsed_logs: 0,
            pending: Vec::new(),
        }
    }

    /// Report how many records were parsed, before any finding is written
    pub fn write_parsed_count(&mut self, count: usize) -> Result<(), OutputError> {
        self.parsed_logs = count;
        match self.format {
            OutputFormat::Console => {
                writeln!(self.writer, "Number of parsed logs: {}", count)?;
            }
            OutputFormat::Jsonl => {
                let line = serde_json::json!({ "parsed_logs": count });
                writeln!(self.writer, "{}", serde_json::to_string(&line)?)?;
            }
            OutputFormat::Json => {}
        }
        Ok(())
    }

    /// Write a single finding
    pub fn write_finding(&mut self, finding: &Finding) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Console => writeln!(self.writer, "{}", finding)?,
            OutputFormat::Jsonl => {
                writeln!(self.writer, "{}", serde_json::to_string(finding)?)?;
            }
            OutputFormat::Json => self.pending.push(finding.clone()),
        }
        Ok(())
    }

    /// Emit anything buffered and flush the writer
    pub fn finish(&mut self) -> Result<(), OutputError> {
        if self.format == OutputFormat::Json {
            let document = JsonDocument {
                parsed_logs: self.parsed_logs,
                findings: &self.pending,
            };
            let json = serde_json::to_string_pretty(&document)?;
            writeln!(self.writer, "{}", json)?;
            self.pending.clear();
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FindingKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Writer that keeps its bytes inspectable after being boxed
    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    fn balance_finding(user_id: Option<&str>) -> Finding {
        Finding {
            rule_name: "Unauthorized Balance Access".to_string(),
            line: 1,
            method: "GET".to_string(),
            path: "/balance".to_string(),
            status_code: 403,
            logged_user_id: 7,
            kind: FindingKind::BalanceAccess {
                target_user_id: user_id.map(str::to_string),
            },
        }
    }

    fn run(format: OutputFormat, count: usize, findings: &[Finding]) -> String {
        let buf = SharedBuf::default();
        let mut handler = OutputHandler::with_writer(format, Box::new(buf.clone()));
        handler.write_parsed_count(count).unwrap();
        for f in findings {
            handler.write_finding(f).unwrap();
        }
        handler.finish().unwrap();
        buf.contents()
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from_str("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("jsonl"), OutputFormat::Jsonl);
        assert_eq!(OutputFormat::from_str("console"), OutputFormat::Console);
        assert_eq!(OutputFormat::from_str("xml"), OutputFormat::Console);
    }

    #[test]
    fn test_console_empty_run() {
        assert_eq!(run(OutputFormat::Console, 0, &[]), "Number of parsed logs: 0\n");
    }

    #[test]
    fn test_console_findings() {
        let out = run(OutputFormat::Console, 2, &[balance_finding(Some("42"))]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Number of parsed logs: 2");
        assert!(lines[1].ends_with("belonging to user_id: 42"));
    }

    #[test]
    fn test_jsonl_one_object_per_line() {
        let out = run(
            OutputFormat::Jsonl,
            3,
            &[balance_finding(Some("1")), balance_finding(None)],
        );
        let values: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(values.len(), 3);
        assert_eq!(values[0]["parsed_logs"], 3);
        assert_eq!(values[1]["target_user_id"], "1");
        assert!(values[2]["target_user_id"].is_null());
    }

    #[test]
    fn test_json_single_document() {
        let out = run(OutputFormat::Json, 5, &[balance_finding(Some("42"))]);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["parsed_logs"], 5);
        assert_eq!(value["findings"].as_array().unwrap().len(), 1);
        assert_eq!(value["findings"][0]["type"], "balance_access");
    }

    #[test]
    fn test_file_output_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("findings.log");

        for _ in 0..2 {
            let mut handler = OutputHandler::new(OutputFormat::Console, Some(path.clone())).unwrap();
            handler.write_parsed_count(0).unwrap();
            handler.finish().unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
