//! Purchase order context for a service entry sheet session.

use super::service_item::ServiceItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Accounting regime of a service purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    /// Quantities are tracked per item against a fixed ordered quantity.
    Planned,
    /// Only the aggregate value is capped by the order limit.
    #[serde(rename = "Un-planned")]
    Unplanned,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Planned => "Planned",
            ServiceType::Unplanned => "Un-planned",
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering constraints of the PO a sheet is raised against.
///
/// Loaded once per session and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderContext {
    pub po_number: String,
    pub order_limit: Decimal,
    pub company_code: String,
    pub supplier_id: String,
    pub supplier_name: String,
    pub service_type: ServiceType,
}

/// Result of reading a purchase order from the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderRecord {
    pub header: PurchaseOrderContext,
    pub ordered_items: Vec<ServiceItem>,
}
