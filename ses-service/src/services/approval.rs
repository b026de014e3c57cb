//! Read-only view over a PO's approval trail.

use crate::models::ApprovalLogEntry;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApprovalHistory {
    entries: Vec<ApprovalLogEntry>,
}

impl ApprovalHistory {
    /// Entries are sorted by timestamp, oldest first.
    pub fn new(mut entries: Vec<ApprovalLogEntry>) -> Self {
        entries.sort_by_key(|entry| entry.timestamp);
        Self { entries }
    }

    pub fn entries(&self) -> &[ApprovalLogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&ApprovalLogEntry> {
        self.entries.last()
    }

    pub fn highest_level(&self) -> Option<u32> {
        self.entries.iter().filter_map(|e| e.approval_level).max()
    }

    /// Whether the sheet was last handed back to the supplier.
    pub fn is_returned_to_supplier(&self) -> bool {
        self.latest()
            .map(|entry| entry.action.returns_to_supplier())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogAction;
    use chrono::{TimeZone, Utc};

    fn entry(day: u32, action: LogAction, level: Option<u32>) -> ApprovalLogEntry {
        ApprovalLogEntry {
            timestamp: Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap(),
            action,
            approver_id: format!("user-{}", day),
            approver_role: None,
            comment: None,
            approval_level: level,
        }
    }

    #[test]
    fn test_history_orders_and_summarizes() {
        let history = ApprovalHistory::new(vec![
            entry(5, LogAction::SendBack, Some(2)),
            entry(1, LogAction::Create, None),
            entry(3, LogAction::Approve, Some(1)),
        ]);

        assert_eq!(history.entries()[0].action, LogAction::Create);
        assert_eq!(history.latest().unwrap().action, LogAction::SendBack);
        assert_eq!(history.highest_level(), Some(2));
        assert!(history.is_returned_to_supplier());
    }

    #[test]
    fn test_empty_history() {
        let history = ApprovalHistory::new(Vec::new());
        assert!(history.is_empty());
        assert!(history.latest().is_none());
        assert_eq!(history.highest_level(), None);
        assert!(!history.is_returned_to_supplier());
    }

    #[test]
    fn test_unknown_action_is_kept() {
        let history = ApprovalHistory::new(vec![entry(
            2,
            LogAction::from_string("ESCALATE"),
            Some(3),
        )]);
        assert_eq!(history.latest().unwrap().action.as_str(), "ESCALATE");
        assert!(!history.is_returned_to_supplier());
    }
}
