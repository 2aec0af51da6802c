use std::collections::BTreeMap;

use super::rules::{AdminAccessRule, BalanceAccessRule};
use super::{DetectionRule, RequestTarget};
use crate::config::DetectionConfig;
use crate::models::{Finding, NumberedRecord};

/// Counters accumulated over a single scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub records_examined: usize,
    /// Records whose URL could not be decomposed
    pub invalid_urls: usize,
    pub findings_by_rule: BTreeMap<String, usize>,
}

impl ScanSummary {
    pub fn total_findings(&self) -> usize {
        self.findings_by_rule.values().sum()
    }
}

/// Result of running the engine over a record sequence
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Findings in input order
    pub findings: Vec<Finding>,
    pub summary: ScanSummary,
}

/// Runs every rule against every record
pub struct DetectionEngine {
    rules: Vec<Box<dyn DetectionRule>>,
}

impl DetectionEngine {
    /// Engine with the built-in balance and admin rules
    pub fn new(config: &DetectionConfig) -> Self {
        DetectionEngine::with_rules(vec![
            Box::new(BalanceAccessRule::with_config(config)),
            Box::new(AdminAccessRule::with_config(config)),
        ])
    }

    pub fn with_rules(rules: Vec<Box<dyn DetectionRule>>) -> Self {
        DetectionEngine { rules }
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Evaluate all records in order.
    ///
    /// Rules are not mutually exclusive: each rule sees each record.
    pub fn scan(&self, records: &[NumberedRecord]) -> ScanReport {
        let mut report = ScanReport::default();
        for rule in &self.rules {
            report
                .summary
                .findings_by_rule
                .insert(rule.name().to_string(), 0);
        }

        for entry in records {
            let target = match RequestTarget::parse(&entry.record.req.url) {
                Ok(target) => target,
                Err(e) => {
                    log::warn!("Skipping record at line {}: {}", entry.line, e);
                    report.summary.invalid_urls += 1;
                    continue;
                }
            };
            report.summary.records_examined += 1;

            for rule in &self.rules {
                if let Some(finding) = rule.evaluate(entry, &target) {
                    log::debug!("[{}] line {}: {}", rule.name(), entry.line, finding);
                    *report
                        .summary
                        .findings_by_rule
                        .entry(rule.name().to_string())
                        .or_insert(0) += 1;
                    report.findings.push(finding);
                }
            }
        }

        report
    }
}

impl Default for DetectionEngine {
    fn default() -> Self {
        Self::new(&DetectionConfig::default())
    }
}
