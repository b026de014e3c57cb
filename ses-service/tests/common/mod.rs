//! Common test utilities for ses-service integration tests.

use rust_decimal::Decimal;
use ses_service::models::{
    Attachment, AttachmentContent, ItemLedger, PurchaseOrderContext, PurchaseOrderRecord,
    ServiceEntrySheet, ServiceItem, ServiceType, SheetStatus,
};
use ses_service::services::{
    select_items, AttachmentPolicy, HandoffStore, MockGateway, SubmissionWorkflow,
};
use std::str::FromStr;
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

pub const PLANNED_PO: &str = "4500000101";
pub const UNPLANNED_PO: &str = "4500000202";
pub const REJECTED_SHEET: &str = "SES-1001";
pub const IN_PROCESS_SHEET: &str = "SES-1002";

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,ses_service=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn context(po_number: &str, service_type: ServiceType, limit: &str) -> PurchaseOrderContext {
    PurchaseOrderContext {
        po_number: po_number.to_string(),
        order_limit: dec(limit),
        company_code: "1000".to_string(),
        supplier_id: "S-0042".to_string(),
        supplier_name: "Northwind Facility Services".to_string(),
        service_type,
    }
}

pub fn planned_item(sr_no: u32, price: &str, ordered: &str, serviced: &str) -> ServiceItem {
    let mut item = ServiceItem::blank(sr_no, sr_no / 10);
    item.service_number = format!("30001{:02}", sr_no / 10);
    item.description = format!("Maintenance line {}", sr_no);
    item.unit_of_measure = "EA".to_string();
    item.unit_price = dec(price);
    item.ordered_quantity = dec(ordered);
    item.serviced_quantity = dec(serviced);
    item
}

pub fn unplanned_item(sr_no: u32, price: &str, quantity: &str) -> ServiceItem {
    let mut item = ServiceItem::blank(sr_no, sr_no / 10);
    item.service_number = format!("30009{:02}", sr_no / 10);
    item.description = format!("Ad-hoc service {}", sr_no);
    item.unit_of_measure = "HR".to_string();
    item.unit_price = dec(price);
    item.quantity = dec(quantity);
    item
}

pub fn planned_po() -> PurchaseOrderRecord {
    PurchaseOrderRecord {
        header: context(PLANNED_PO, ServiceType::Planned, "5000"),
        ordered_items: vec![
            planned_item(10, "10", "100", "40"),
            planned_item(20, "25", "4", "4"),
            planned_item(30, "7.5", "20", "0"),
        ],
    }
}

/// Un-planned PO whose earlier submissions add up to 200.
pub fn unplanned_po() -> PurchaseOrderRecord {
    PurchaseOrderRecord {
        header: context(UNPLANNED_PO, ServiceType::Unplanned, "1000"),
        ordered_items: vec![
            unplanned_item(10, "50", "2"),
            unplanned_item(20, "25", "4"),
        ],
    }
}

pub fn pdf_attachment() -> Attachment {
    Attachment {
        file_name: "timesheet.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        size_bytes: 4,
        content: AttachmentContent::Stored {
            url: "https://files.example/ses/timesheet.pdf".to_string(),
        },
        description: "timesheet.pdf".to_string(),
        comment: String::new(),
    }
}

/// Persisted planned sheet in the given status.
pub fn persisted_sheet(request_no: &str, status: SheetStatus) -> ServiceEntrySheet {
    let mut sheet = ServiceEntrySheet::new(planned_po().header);
    let mut item = planned_item(10, "10", "100", "40");
    item.package_no = Some("0000004711".to_string());
    item.internal_row = Some("1".to_string());
    sheet.items = ItemLedger::new(vec![item]);
    sheet.request_no = Some(request_no.to_string());
    sheet.status = status;
    sheet.service_period = "01/02/2026 to 28/02/2026".to_string();
    sheet.service_location = "Plant 7".to_string();
    sheet.person_responsible = "R. Ortiz".to_string();
    sheet.attachment = Some(pdf_attachment());
    sheet
}

pub fn gateway() -> MockGateway {
    MockGateway::new()
        .with_purchase_order(planned_po())
        .with_purchase_order(unplanned_po())
        .with_sheet(
            REJECTED_SHEET,
            persisted_sheet(REJECTED_SHEET, SheetStatus::Rejected),
        )
        .with_sheet(
            IN_PROCESS_SHEET,
            persisted_sheet(IN_PROCESS_SHEET, SheetStatus::InProcess),
        )
}

/// Test harness holding the collaborators a workflow shares with its caller.
#[allow(dead_code)]
pub struct TestSession {
    pub gateway: Arc<MockGateway>,
    pub handoff: Arc<HandoffStore>,
}

#[allow(dead_code)]
impl TestSession {
    pub fn new(gateway: MockGateway) -> Self {
        init_tracing();
        Self {
            gateway: Arc::new(gateway),
            handoff: Arc::new(HandoffStore::new()),
        }
    }

    /// Run the selection stage and start a create workflow from it.
    pub async fn start_create(
        &self,
        record: &PurchaseOrderRecord,
        selected_sr_nos: &[u32],
    ) -> SubmissionWorkflow {
        let selection = select_items(&record.header, &record.ordered_items, selected_sr_nos)
            .expect("selection should succeed");
        self.handoff.put(selection.selected);

        SubmissionWorkflow::start_create(
            self.gateway.clone(),
            self.handoff.clone(),
            AttachmentPolicy::create_flow(),
            &record.header.po_number,
        )
        .await
        .expect("Failed to start create workflow")
    }
}
