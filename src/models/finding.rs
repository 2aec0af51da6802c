use serde::Serialize;
use std::fmt;

/// What kind of denied access a finding describes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FindingKind {
    /// Someone asked for another account's balance and was refused
    BalanceAccess { target_user_id: Option<String> },
    /// A regular user called an admin-only endpoint and was refused
    AdminAccess,
}

/// A suspicious request flagged by one detection rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub rule_name: String,
    /// Source line of the record that triggered the rule
    pub line: usize,
    pub method: String,
    pub path: String,
    pub status_code: i64,
    pub logged_user_id: i64,
    #[serde(flatten)]
    pub kind: FindingKind,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FindingKind::BalanceAccess {
                target_user_id: Some(user_id),
            } => write!(
                f,
                "Unauthorized access attempt: Someone without authorization tried to get the \
                 balance of the account belonging to user_id: {}",
                user_id
            ),
            FindingKind::BalanceAccess {
                target_user_id: None,
            } => write!(
                f,
                "Unauthorized access attempt: Someone without authorization tried to access the \
                 balance endpoint, but no user_id was provided in the query."
            ),
            FindingKind::AdminAccess => write!(
                f,
                "Unauthorized access attempt: request type: {}, endpoint: {}. \
                 A regular user is trying to perform admin actions.",
                self.method, self.path
            ),
        }
    }
}
