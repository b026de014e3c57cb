//! Ordered in-memory collection of service items.

use super::service_item::{ItemField, ServiceItem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Step between serial numbers of rows added by the user.
pub const SR_NO_STEP: u32 = 10;

/// Items of one sheet, kept ordered by serial number, plus the inline error
/// attached to each rejected cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemLedger {
    items: Vec<ServiceItem>,
    #[serde(skip)]
    field_errors: BTreeMap<(u32, ItemField), String>,
}

impl ItemLedger {
    pub fn new(mut items: Vec<ServiceItem>) -> Self {
        items.sort_by_key(|item| item.sr_no);
        Self {
            items,
            field_errors: BTreeMap::new(),
        }
    }

    pub fn items(&self) -> &[ServiceItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, sr_no: u32) -> Option<&ServiceItem> {
        self.items.iter().find(|item| item.sr_no == sr_no)
    }

    pub(crate) fn get_mut(&mut self, sr_no: u32) -> Option<&mut ServiceItem> {
        self.items.iter_mut().find(|item| item.sr_no == sr_no)
    }

    /// Serial and item numbers for the next user-added row.
    pub fn next_numbers(&self) -> (u32, u32) {
        let last_sr_no = self.items.iter().map(|i| i.sr_no).max().unwrap_or(0);
        let last_item_number = self.items.iter().map(|i| i.item_number).max().unwrap_or(0);
        (last_sr_no + SR_NO_STEP, last_item_number + 1)
    }

    pub(crate) fn push(&mut self, item: ServiceItem) {
        self.items.push(item);
        self.items.sort_by_key(|item| item.sr_no);
    }

    /// Remove rows by serial number, returning how many were removed.
    pub(crate) fn remove(&mut self, sr_nos: &[u32]) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !sr_nos.contains(&item.sr_no));
        self.field_errors.retain(|(sr_no, _), _| !sr_nos.contains(sr_no));
        before - self.items.len()
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
        self.field_errors.clear();
    }

    pub fn field_error(&self, sr_no: u32, field: ItemField) -> Option<&str> {
        self.field_errors.get(&(sr_no, field)).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.field_errors.is_empty()
    }

    pub(crate) fn set_field_error(&mut self, sr_no: u32, field: ItemField, message: String) {
        self.field_errors.insert((sr_no, field), message);
    }

    pub(crate) fn clear_field_error(&mut self, sr_no: u32, field: ItemField) {
        self.field_errors.remove(&(sr_no, field));
    }
}
