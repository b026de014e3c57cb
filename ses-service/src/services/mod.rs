//! Services module for ses-service.

pub mod approval;
pub mod attachments;
pub mod error;
pub mod gateway;
pub mod handoff;
pub mod ledger;
pub mod metrics;
pub mod payload;
pub mod totals;
pub mod validator;
pub mod workflow;

pub use approval::ApprovalHistory;
pub use attachments::{AllowedTypes, AttachmentManager, AttachmentPolicy, PreviewIntent};
pub use error::{AttachmentError, SesError};
pub use gateway::{mock::MockGateway, GatewayError, SesGateway};
pub use handoff::{select_items, HandoffStore, SelectedItems, Selection};
pub use metrics::{
    get_metrics, init_metrics, record_attachment_operation, record_submission,
    record_submission_duration, record_validation_rejection,
};
pub use payload::build_payload;
pub use totals::{compute_total, previous_total, recorded_total, round_money};
pub use workflow::{Navigation, SubmissionWorkflow, WorkflowMode, WorkflowState};
