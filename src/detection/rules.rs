use super::{DetectionRule, RequestTarget};
use crate::config::DetectionConfig;
use crate::models::{Finding, FindingKind, NumberedRecord};

pub const BALANCE_RULE_NAME: &str = "Unauthorized Balance Access";
pub const ADMIN_RULE_NAME: &str = "Unauthorized Admin Action";

fn new_finding(
    rule: &str,
    entry: &NumberedRecord,
    target: &RequestTarget,
    kind: FindingKind,
) -> Finding {
    Finding {
        rule_name: rule.to_string(),
        line: entry.line,
        method: entry.record.req.method.clone(),
        path: target.path().to_string(),
        status_code: entry.record.rsp.status_code,
        logged_user_id: entry.record.req.user_id,
        kind,
    }
}

/// Flags denied attempts to read the balance of an account
pub struct BalanceAccessRule {
    path_marker: String,
    user_id_param: String,
    denied_status_codes: Vec<i64>,
}

impl BalanceAccessRule {
    pub fn new() -> Self {
        Self::with_config(&DetectionConfig::default())
    }

    pub fn with_config(config: &DetectionConfig) -> Self {
        BalanceAccessRule {
            path_marker: config.balance_path_marker.clone(),
            user_id_param: config.user_id_param.clone(),
            denied_status_codes: config.denied_status_codes.clone(),
        }
    }
}

impl Default for BalanceAccessRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionRule for BalanceAccessRule {
    fn name(&self) -> &str {
        BALANCE_RULE_NAME
    }

    fn evaluate(&self, entry: &NumberedRecord, target: &RequestTarget) -> Option<Finding> {
        if !target.path().contains(self.path_marker.as_str()) {
            return None;
        }
        if !self.denied_status_codes.contains(&entry.record.rsp.status_code) {
            return None;
        }

        // An empty value counts as no user id at all
        let target_user_id = target
            .first_param(&self.user_id_param)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Some(new_finding(
            BALANCE_RULE_NAME,
            entry,
            target,
            FindingKind::BalanceAccess { target_user_id },
        ))
    }
}

/// Flags denied calls to admin-only endpoints
pub struct AdminAccessRule {
    endpoints: Vec<String>,
    denied_status_codes: Vec<i64>,
}

impl AdminAccessRule {
    pub fn new() -> Self {
        Self::with_config(&DetectionConfig::default())
    }

    pub fn with_config(config: &DetectionConfig) -> Self {
        AdminAccessRule {
            endpoints: config.admin_endpoints.clone(),
            denied_status_codes: config.denied_status_codes.clone(),
        }
    }
}

impl Default for AdminAccessRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionRule for AdminAccessRule {
    fn name(&self) -> &str {
        ADMIN_RULE_NAME
    }

    fn evaluate(&self, entry: &NumberedRecord, target: &RequestTarget) -> Option<Finding> {
        if !self.endpoints.iter().any(|e| e == target.path()) {
            return None;
        }
        if !self.denied_status_codes.contains(&entry.record.rsp.status_code) {
            return None;
        }

        Some(new_finding(ADMIN_RULE_NAME, entry, target, FindingKind::AdminAccess))
    }
}
