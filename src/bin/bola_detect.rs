use std::path::PathBuf;
use structopt::StructOpt;

use bola_detect::config::Config;
use bola_detect::detection::DetectionEngine;
use bola_detect::input::LogReader;
use bola_detect::output::{OutputFormat, OutputHandler};

/// Scan an HTTP access log for denied cross-account and admin-only requests
#[derive(StructOpt, Debug)]
#[structopt(name = "bola_detect", about = "Broken Object Level Authorization log scanner")]
struct Cli {
    /// Path to the access log to scan
    #[structopt(parse(from_os_str))]
    log_file: PathBuf,

    /// Path to a TOML configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Output format: console, json or jsonl (overrides the config file)
    #[structopt(short, long)]
    format: Option<String>,

    /// Write results to this file instead of standard output
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::from_args();

    if let Err(e) = run(cli) {
        // Printed directly so the message survives RUST_LOG=off
        eprintln!("Error detecting BOLA attacks: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match cli.config {
        Some(ref path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(path) = cli.output {
        config.output.file_path = Some(path);
    }

    // Read the log before touching the output file
    log::info!("Scanning {:?}", cli.log_file);
    let parsed = LogReader::open(&cli.log_file)?.read_records()?;

    let mut output = OutputHandler::new(
        OutputFormat::from_str(&config.output.format),
        config.output.file_path.clone(),
    )?;
    output.write_parsed_count(parsed.records.len())?;

    let engine = DetectionEngine::new(&config.detection);
    log::info!("Rules enabled: {}", engine.rule_names().join(", "));
    let report = engine.scan(&parsed.records);
    for finding in &report.findings {
        output.write_finding(finding)?;
    }
    output.finish()?;

    log::info!(
        "Scan complete: {} line(s), {} record(s), {} malformed, {} invalid URL(s), {} finding(s)",
        parsed.stats.lines_read,
        parsed.stats.records,
        parsed.stats.malformed,
        report.summary.invalid_urls,
        report.summary.total_findings()
    );
    for (rule, count) in &report.summary.findings_by_rule {
        log::info!("  {}: {}", rule, count);
    }

    Ok(())
}
