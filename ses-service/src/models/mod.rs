//! Domain models for ses-service.

mod approval_log;
mod attachment;
mod ledger;
mod payload;
mod purchase_order;
mod service_item;
mod sheet;

pub use approval_log::{ApprovalLogEntry, LogAction};
pub(crate) use attachment::file_extension;
pub use attachment::{Attachment, AttachmentContent, FileSelection};
pub use ledger::{ItemLedger, SR_NO_STEP};
pub use payload::{
    PayloadAttachment, PayloadItem, ServiceHead, SubmissionAction, SubmissionPayload,
    SubmitResponse,
};
pub use purchase_order::{PurchaseOrderContext, PurchaseOrderRecord, ServiceType};
pub use service_item::{FieldEdit, ItemField, ServiceCatalogEntry, ServiceItem};
pub use sheet::{ReviewDetails, ServiceEntrySheet, ServicePeriod, SheetStatus};
