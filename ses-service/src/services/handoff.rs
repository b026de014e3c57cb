//! Selection stage and the handoff between selection and sheet entry.

use crate::models::{PurchaseOrderContext, ServiceItem, ServiceType};
use crate::services::error::SesError;
use crate::services::totals::previous_total;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

pub const SELECTED_ITEMS_KEY: &str = "selectedItems";

/// Items carried from the selection stage into the entry stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedItems {
    pub service_type: ServiceType,
    pub items: Vec<ServiceItem>,
}

/// Outcome of the selection stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub selected: SelectedItems,
    /// Serial numbers left out because nothing remained to service.
    pub skipped: Vec<u32>,
}

/// Pick the items a new sheet starts from.
///
/// Planned: the chosen rows minus fully utilized ones. Un-planned: every PO
/// row, carried as prior consumption and checked against the order limit.
pub fn select_items(
    context: &PurchaseOrderContext,
    po_items: &[ServiceItem],
    selected_sr_nos: &[u32],
) -> Result<Selection, SesError> {
    match context.service_type {
        ServiceType::Planned => {
            if selected_sr_nos.is_empty() {
                return Err(SesError::RequiredField(
                    "Please select at least one item".to_string(),
                ));
            }
            let (usable, exhausted): (Vec<&ServiceItem>, Vec<&ServiceItem>) = po_items
                .iter()
                .filter(|item| selected_sr_nos.contains(&item.sr_no))
                .partition(|item| !item.is_fully_utilized());

            if usable.is_empty() {
                return Err(SesError::RequiredField(
                    "All selected items are fully utilized".to_string(),
                ));
            }
            Ok(Selection {
                selected: SelectedItems {
                    service_type: ServiceType::Planned,
                    items: usable.into_iter().cloned().collect(),
                },
                skipped: exhausted.iter().map(|item| item.sr_no).collect(),
            })
        }
        ServiceType::Unplanned => {
            let consumed = previous_total(po_items)?;
            if consumed > context.order_limit {
                return Err(SesError::AmountCeiling {
                    total: consumed,
                    limit: context.order_limit,
                });
            }
            Ok(Selection {
                selected: SelectedItems {
                    service_type: ServiceType::Unplanned,
                    items: po_items.to_vec(),
                },
                skipped: Vec::new(),
            })
        }
    }
}

/// Session-scoped store owned by the caller and shared by both stages.
#[derive(Debug, Default)]
pub struct HandoffStore {
    entries: Mutex<HashMap<String, SelectedItems>>,
}

impl HandoffStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending selection.
    pub fn put(&self, selected: SelectedItems) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(SELECTED_ITEMS_KEY.to_string(), selected);
        }
    }

    /// Read the pending selection once, removing it.
    pub fn take(&self) -> Option<SelectedItems> {
        self.entries
            .lock()
            .ok()
            .and_then(|mut entries| entries.remove(SELECTED_ITEMS_KEY))
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.is_empty())
            .unwrap_or(true)
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}
