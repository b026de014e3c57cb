//! Service entry sheet aggregate.

use super::attachment::Attachment;
use super::ledger::ItemLedger;
use super::purchase_order::{PurchaseOrderContext, ServiceType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Approval status of a persisted sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SheetStatus {
    #[default]
    Draft,
    #[serde(rename = "In-Process")]
    InProcess,
    Approved,
    Rejected,
}

impl SheetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetStatus::Draft => "Draft",
            SheetStatus::InProcess => "In-Process",
            SheetStatus::Approved => "Approved",
            SheetStatus::Rejected => "Rejected",
        }
    }
}

/// Date range a sheet claims services for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServicePeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl ServicePeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

impl std::fmt::Display for ServicePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y")
        )
    }
}

/// Fields the customer fills in before approving or rejecting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDetails {
    #[serde(default)]
    pub final_entry: Option<String>,
    #[serde(default)]
    pub site_person: String,
    #[serde(default)]
    pub service_text: String,
}

/// Aggregate root: one supplier claim against one purchase order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEntrySheet {
    pub context: PurchaseOrderContext,
    #[serde(default)]
    pub request_no: Option<String>,
    #[serde(default)]
    pub status: SheetStatus,
    #[serde(default)]
    pub items: ItemLedger,
    #[serde(default)]
    pub attachment: Option<Attachment>,
    /// Derived; refreshed after every accepted change.
    #[serde(default)]
    pub total_value: Decimal,
    /// Value of earlier un-planned submissions against the same PO.
    #[serde(default)]
    pub previous_total_value: Decimal,
    #[serde(default)]
    pub service_period: String,
    #[serde(default)]
    pub service_location: String,
    #[serde(default)]
    pub person_responsible: String,
    #[serde(default)]
    pub review: ReviewDetails,
}

impl ServiceEntrySheet {
    /// Fresh, unsaved sheet for the given PO.
    pub fn new(context: PurchaseOrderContext) -> Self {
        Self {
            context,
            request_no: None,
            status: SheetStatus::Draft,
            items: ItemLedger::default(),
            attachment: None,
            total_value: Decimal::ZERO,
            previous_total_value: Decimal::ZERO,
            service_period: String::new(),
            service_location: String::new(),
            person_responsible: String::new(),
            review: ReviewDetails::default(),
        }
    }

    pub fn service_type(&self) -> ServiceType {
        self.context.service_type
    }

    pub fn attachment_count(&self) -> usize {
        usize::from(self.attachment.is_some())
    }

    /// Drop everything entered in this session, keeping the PO context.
    pub fn reset(&mut self) {
        self.items.clear();
        self.attachment = None;
        self.total_value = Decimal::ZERO;
        self.previous_total_value = Decimal::ZERO;
        self.service_period.clear();
        self.service_location.clear();
        self.person_responsible.clear();
        self.review = ReviewDetails::default();
    }
}
