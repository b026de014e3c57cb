//! Service line item model.

use super::purchase_order::ServiceType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One service line of a sheet.
///
/// Planned sheets use `ordered_quantity`, `serviced_quantity` and
/// `quantity_input`; un-planned sheets only use `quantity`. The line total is
/// always derived through [`ServiceItem::line_total`], which yields `None`
/// when the product does not fit a `Decimal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub sr_no: u32,
    pub item_number: u32,
    #[serde(default)]
    pub service_number: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub unit_of_measure: String,
    #[serde(default)]
    pub unit_price: Decimal,
    #[serde(default)]
    pub ordered_quantity: Decimal,
    /// Already consumed by earlier submissions.
    #[serde(default)]
    pub serviced_quantity: Decimal,
    /// New quantity claimed by this submission; `None` until entered.
    #[serde(default)]
    pub quantity_input: Option<Decimal>,
    #[serde(default)]
    pub quantity: Decimal,

    // Backend package references, forwarded untouched.
    #[serde(default)]
    pub package_no: Option<String>,
    #[serde(default)]
    pub internal_row: Option<String>,
    #[serde(default)]
    pub package_no_from_po: Option<String>,

    // Internal-only, never part of a submission.
    #[serde(default = "Uuid::new_v4")]
    pub row_id: Uuid,
    #[serde(default)]
    pub binding_path: Option<String>,
}

impl ServiceItem {
    /// Blank row as created by the "add" action on un-planned sheets.
    pub fn blank(sr_no: u32, item_number: u32) -> Self {
        Self {
            sr_no,
            item_number,
            service_number: String::new(),
            description: String::new(),
            unit_of_measure: String::new(),
            unit_price: Decimal::ZERO,
            ordered_quantity: Decimal::ZERO,
            serviced_quantity: Decimal::ZERO,
            quantity_input: None,
            quantity: Decimal::ONE,
            package_no: None,
            internal_row: None,
            package_no_from_po: None,
            row_id: Uuid::new_v4(),
            binding_path: None,
        }
    }

    /// Quantity still open against the ordered quantity.
    pub fn remaining_quantity(&self) -> Decimal {
        self.ordered_quantity.saturating_sub(self.serviced_quantity)
    }

    /// Whether nothing is left to service on a planned line.
    pub fn is_fully_utilized(&self) -> bool {
        self.serviced_quantity >= self.ordered_quantity
    }

    /// Quantity priced in this submission.
    pub fn priced_quantity(&self, service_type: ServiceType) -> Decimal {
        match service_type {
            ServiceType::Planned => self.quantity_input.unwrap_or(Decimal::ZERO),
            ServiceType::Unplanned => self.quantity,
        }
    }

    /// Quantity as recorded on a persisted sheet.
    pub fn recorded_quantity(&self, service_type: ServiceType) -> Decimal {
        match service_type {
            ServiceType::Planned => self.serviced_quantity,
            ServiceType::Unplanned => self.quantity,
        }
    }

    /// Quantity reported to the backend: cumulative for planned lines.
    pub fn submitted_quantity(&self, service_type: ServiceType) -> Option<Decimal> {
        match service_type {
            ServiceType::Planned => self
                .quantity_input
                .unwrap_or(Decimal::ZERO)
                .checked_add(self.serviced_quantity),
            ServiceType::Unplanned => Some(self.quantity),
        }
    }

    /// Full-precision line total for this submission.
    pub fn line_total(&self, service_type: ServiceType) -> Option<Decimal> {
        self.unit_price.checked_mul(self.priced_quantity(service_type))
    }

    /// Line total as recorded on a persisted sheet.
    pub fn recorded_line_total(&self, service_type: ServiceType) -> Option<Decimal> {
        self.unit_price
            .checked_mul(self.recorded_quantity(service_type))
    }
}

/// Value-help selection applied to a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCatalogEntry {
    pub service_number: String,
    pub description: String,
    pub unit_of_measure: String,
}

/// Editable numeric columns of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemField {
    UnitPrice,
    QuantityInput,
    Quantity,
}

impl ItemField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemField::UnitPrice => "unit_price",
            ItemField::QuantityInput => "quantity_input",
            ItemField::Quantity => "quantity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemField::UnitPrice => "Unit Price",
            ItemField::QuantityInput | ItemField::Quantity => "Service Quantity",
        }
    }

    /// Whether the field can be edited under the given regime.
    pub fn is_editable(&self, service_type: ServiceType) -> bool {
        match service_type {
            ServiceType::Planned => matches!(self, ItemField::QuantityInput),
            ServiceType::Unplanned => matches!(self, ItemField::UnitPrice | ItemField::Quantity),
        }
    }
}

/// A raw user edit against one cell of the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub sr_no: u32,
    pub field: ItemField,
    pub raw: String,
}

impl FieldEdit {
    pub fn new(sr_no: u32, field: ItemField, raw: impl Into<String>) -> Self {
        Self {
            sr_no,
            field,
            raw: raw.into(),
        }
    }
}
