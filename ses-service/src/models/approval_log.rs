//! Approval log entries recorded against a purchase order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Action recorded in an approval log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogAction {
    Create,
    Approve,
    SendBack,
    Reject,
    EditResubmit,
    #[serde(untagged)]
    Other(String),
}

impl LogAction {
    pub fn as_str(&self) -> &str {
        match self {
            LogAction::Create => "CREATE",
            LogAction::Approve => "APPROVE",
            LogAction::SendBack => "SEND_BACK",
            LogAction::Reject => "REJECT",
            LogAction::EditResubmit => "EDIT_RESUBMIT",
            LogAction::Other(s) => s.as_str(),
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "CREATE" => LogAction::Create,
            "APPROVE" => LogAction::Approve,
            "SEND_BACK" => LogAction::SendBack,
            "REJECT" => LogAction::Reject,
            "EDIT_RESUBMIT" => LogAction::EditResubmit,
            other => LogAction::Other(other.to_string()),
        }
    }

    /// Whether the action hands the sheet back to the supplier.
    pub fn returns_to_supplier(&self) -> bool {
        matches!(self, LogAction::Reject | LogAction::SendBack)
    }
}

/// One step of the approval trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalLogEntry {
    pub timestamp: DateTime<Utc>,
    pub action: LogAction,
    pub approver_id: String,
    #[serde(default)]
    pub approver_role: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub approval_level: Option<u32>,
}
