//! Submission workflow for one service entry sheet.
//!
//! Owns the sheet for the lifetime of a session and gates every mutation on
//! the current state. Only two operations suspend: reading attachment bytes
//! and the submission round trip.

use crate::models::{
    Attachment, FieldEdit, FileSelection, ItemLedger, ReviewDetails, ServiceCatalogEntry,
    ServiceEntrySheet, ServicePeriod, ServiceType, SheetStatus, SubmissionAction,
    SubmissionPayload,
};
use crate::services::approval::ApprovalHistory;
use crate::services::attachments::{
    preview_intent, AttachmentManager, AttachmentPolicy, PreviewIntent,
};
use crate::services::error::SesError;
use crate::services::gateway::SesGateway;
use crate::services::handoff::HandoffStore;
use crate::services::payload::build_payload;
use crate::services::totals::previous_total;
use crate::services::{ledger, metrics};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncRead;
use tracing::instrument;

pub const DEFAULT_SUCCESS_MESSAGE: &str =
    "Your Service Entry Sheet has been submitted successfully!";

/// How the sheet was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowMode {
    /// Supplier raising a new sheet from a selection.
    Create,
    /// Supplier revising a rejected sheet.
    Edit,
    /// Customer approving or rejecting a submitted sheet.
    Review,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    Viewing,
    Editing,
    Submitting,
    Succeeded { message: String },
    Failed { message: String },
}

/// Where the caller should go after a cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    ReturnToList,
    Stay,
}

pub struct SubmissionWorkflow {
    gateway: Arc<dyn SesGateway>,
    handoff: Arc<HandoffStore>,
    attachments: AttachmentManager,
    mode: WorkflowMode,
    state: WorkflowState,
    sheet: ServiceEntrySheet,
    history: ApprovalHistory,
    pending: Option<SubmissionPayload>,
    /// State to return to once a failed submission is dismissed.
    resume_state: WorkflowState,
    busy: bool,
}

impl SubmissionWorkflow {
    /// Start a new sheet from the pending selection for `po_number`.
    #[instrument(skip(gateway, handoff, policy))]
    pub async fn start_create(
        gateway: Arc<dyn SesGateway>,
        handoff: Arc<HandoffStore>,
        policy: AttachmentPolicy,
        po_number: &str,
    ) -> Result<Self, SesError> {
        let selected = handoff.take().ok_or_else(|| {
            SesError::RequiredField("Please select at least one item".to_string())
        })?;

        let record = gateway
            .read_purchase_order(po_number)
            .await
            .map_err(|e| e.into_query_error())?;

        if record.header.service_type != selected.service_type {
            return Err(SesError::NotPermitted(format!(
                "Selection is {} but purchase order {} is {}",
                selected.service_type, po_number, record.header.service_type
            )));
        }

        let mut sheet = ServiceEntrySheet::new(record.header);
        match sheet.service_type() {
            ServiceType::Planned => sheet.items = ItemLedger::new(selected.items),
            ServiceType::Unplanned => {
                sheet.previous_total_value = previous_total(&selected.items)?;
            }
        }
        ledger::recalculate(&mut sheet)?;

        tracing::info!(
            po_number = %sheet.context.po_number,
            service_type = %sheet.service_type(),
            items = sheet.items.len(),
            "Service entry sheet started"
        );

        Ok(Self {
            gateway,
            handoff,
            attachments: AttachmentManager::new(policy),
            mode: WorkflowMode::Create,
            state: WorkflowState::Editing,
            sheet,
            history: ApprovalHistory::default(),
            pending: None,
            resume_state: WorkflowState::Editing,
            busy: false,
        })
    }

    /// Open a persisted sheet for editing or review.
    #[instrument(skip(gateway, handoff, policy))]
    pub async fn open_existing(
        gateway: Arc<dyn SesGateway>,
        handoff: Arc<HandoffStore>,
        policy: AttachmentPolicy,
        request_no: &str,
        mode: WorkflowMode,
    ) -> Result<Self, SesError> {
        if mode == WorkflowMode::Create {
            return Err(SesError::NotPermitted(
                "New sheets are started from a selection".to_string(),
            ));
        }

        let mut sheet = gateway
            .read_existing_sheet(request_no)
            .await
            .map_err(|e| e.into_query_error())?;
        sheet.request_no.get_or_insert_with(|| request_no.to_string());

        let logs = gateway
            .read_prior_approval_logs(&sheet.context.po_number)
            .await
            .map_err(|e| e.into_query_error())?;

        tracing::info!(
            request_no = %request_no,
            status = sheet.status.as_str(),
            approval_entries = logs.len(),
            "Service entry sheet opened"
        );

        Ok(Self {
            gateway,
            handoff,
            attachments: AttachmentManager::new(policy),
            mode,
            state: WorkflowState::Viewing,
            sheet,
            history: ApprovalHistory::new(logs),
            pending: None,
            resume_state: WorkflowState::Viewing,
            busy: false,
        })
    }

    pub fn mode(&self) -> WorkflowMode {
        self.mode
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn sheet(&self) -> &ServiceEntrySheet {
        &self.sheet
    }

    pub fn history(&self) -> &ApprovalHistory {
        &self.history
    }

    pub fn pending_payload(&self) -> Option<&SubmissionPayload> {
        self.pending.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Switch a rejected sheet into editing.
    pub fn begin_edit(&mut self) -> Result<(), SesError> {
        if self.mode != WorkflowMode::Edit || self.state != WorkflowState::Viewing {
            return Err(SesError::NotPermitted(
                "Editing is not available here".to_string(),
            ));
        }
        if self.sheet.status != SheetStatus::Rejected {
            return Err(SesError::NotPermitted(format!(
                "Only rejected sheets can be edited (status: {})",
                self.sheet.status.as_str()
            )));
        }
        self.state = WorkflowState::Editing;
        self.resume_state = WorkflowState::Editing;
        Ok(())
    }

    fn ensure_editing(&mut self) -> Result<(), SesError> {
        if self.state != WorkflowState::Editing {
            return Err(SesError::NotPermitted(
                "Sheet is not being edited".to_string(),
            ));
        }
        self.pending = None;
        Ok(())
    }

    pub fn apply_edit(&mut self, edit: &FieldEdit) -> Result<Decimal, SesError> {
        self.ensure_editing()?;
        ledger::apply_edit(&mut self.sheet, edit)
    }

    pub fn add_item(&mut self) -> Result<u32, SesError> {
        self.ensure_editing()?;
        ledger::add_item(&mut self.sheet)
    }

    pub fn remove_items(&mut self, sr_nos: &[u32]) -> Result<usize, SesError> {
        self.ensure_editing()?;
        ledger::remove_items(&mut self.sheet, sr_nos)
    }

    pub fn assign_service(
        &mut self,
        sr_no: u32,
        entry: &ServiceCatalogEntry,
    ) -> Result<(), SesError> {
        self.ensure_editing()?;
        ledger::assign_service(&mut self.sheet, sr_no, entry)
    }

    pub fn set_service_period(&mut self, period: ServicePeriod) -> Result<(), SesError> {
        self.ensure_editing()?;
        self.sheet.service_period = period.to_string();
        Ok(())
    }

    pub fn set_service_location(&mut self, location: &str) -> Result<(), SesError> {
        self.ensure_editing()?;
        self.sheet.service_location = location.trim().to_string();
        Ok(())
    }

    pub fn set_person_responsible(&mut self, person: &str) -> Result<(), SesError> {
        self.ensure_editing()?;
        self.sheet.person_responsible = person.trim().to_string();
        Ok(())
    }

    /// Reviewer fields, filled in before approving or rejecting.
    pub fn set_review_details(&mut self, review: ReviewDetails) -> Result<(), SesError> {
        if self.mode != WorkflowMode::Review || self.state != WorkflowState::Viewing {
            return Err(SesError::NotPermitted(
                "Review details can only be set while reviewing".to_string(),
            ));
        }
        self.pending = None;
        self.sheet.review = review;
        Ok(())
    }

    pub async fn attach<R>(
        &mut self,
        selection: FileSelection,
        reader: R,
    ) -> Result<Attachment, SesError>
    where
        R: AsyncRead + Unpin,
    {
        self.ensure_editing()?;
        self.attachments
            .add(&mut self.sheet.attachment, selection, reader)
            .await
            .map_err(|e| {
                let err = SesError::from(e);
                metrics::record_validation_rejection(err.kind());
                err
            })
    }

    pub fn remove_attachment(&mut self) -> Result<Option<Attachment>, SesError> {
        self.ensure_editing()?;
        Ok(self.attachments.remove(&mut self.sheet.attachment))
    }

    pub fn preview_attachment(&self) -> Result<PreviewIntent, SesError> {
        let attachment = self
            .sheet
            .attachment
            .as_ref()
            .ok_or_else(|| SesError::RequiredField("No attachment to preview".to_string()))?;
        Ok(preview_intent(&attachment.file_name)?)
    }

    fn check_action(&self, action: SubmissionAction) -> Result<(), SesError> {
        let allowed = match (self.mode, action) {
            (WorkflowMode::Create, SubmissionAction::Create)
            | (WorkflowMode::Edit, SubmissionAction::Edit) => self.state == WorkflowState::Editing,
            (WorkflowMode::Review, SubmissionAction::Approve)
            | (WorkflowMode::Review, SubmissionAction::Reject) => {
                self.state == WorkflowState::Viewing
            }
            _ => false,
        };
        if !allowed {
            return Err(SesError::NotPermitted(format!(
                "{} is not available here",
                action.as_str()
            )));
        }
        Ok(())
    }

    /// Build and hold the payload for confirmation.
    ///
    /// Builder failures are returned and nothing is held.
    pub fn request_submit(
        &mut self,
        action: SubmissionAction,
        comment: Option<&str>,
    ) -> Result<&SubmissionPayload, SesError> {
        if self.busy {
            return Err(SesError::SubmissionInFlight);
        }
        self.check_action(action)?;
        self.pending = None;

        let payload = build_payload(&self.sheet, action, comment).map_err(|e| {
            metrics::record_validation_rejection(e.kind());
            tracing::debug!(action = action.as_str(), error = %e, "Submission blocked");
            e
        })?;
        Ok(self.pending.insert(payload))
    }

    /// Withdraw a requested but unconfirmed submission.
    pub fn cancel_confirmation(&mut self) -> Option<SubmissionPayload> {
        self.pending.take()
    }

    /// Dispatch the held payload.
    ///
    /// Returns the backend message (or the default one) on success.
    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub async fn confirm_submit(&mut self) -> Result<String, SesError> {
        if self.busy {
            return Err(SesError::SubmissionInFlight);
        }
        let payload = self.pending.take().ok_or_else(|| {
            SesError::NotPermitted("No submission is awaiting confirmation".to_string())
        })?;
        let action = payload.action.as_str();

        self.resume_state = self.state.clone();
        self.busy = true;
        self.state = WorkflowState::Submitting;
        let start = Instant::now();

        let result = self.gateway.submit(&payload).await;

        metrics::record_submission_duration(action, start.elapsed().as_secs_f64());
        self.busy = false;

        match result {
            Ok(response) => {
                let message = if response.return_message.trim().is_empty() {
                    DEFAULT_SUCCESS_MESSAGE.to_string()
                } else {
                    response.return_message
                };
                metrics::record_submission(action, "success");
                tracing::info!(
                    action = action,
                    po_number = %self.sheet.context.po_number,
                    total = %payload.total_amount,
                    "Service entry sheet submitted"
                );
                self.sheet.reset();
                self.handoff.clear();
                self.state = WorkflowState::Succeeded {
                    message: message.clone(),
                };
                Ok(message)
            }
            Err(e) => {
                let err = e.into_submission_error();
                metrics::record_submission(action, "failure");
                tracing::error!(action = action, error = %err, "Submission failed");
                self.state = WorkflowState::Failed {
                    message: err.to_string(),
                };
                Err(err)
            }
        }
    }

    /// Acknowledge a failed submission and resume where it started.
    pub fn dismiss_error(&mut self) {
        if matches!(self.state, WorkflowState::Failed { .. }) {
            self.state = self.resume_state.clone();
        }
    }

    /// Discard in-memory changes.
    ///
    /// A new sheet is reset and the caller returns to the list; an existing
    /// sheet is reloaded from the backend.
    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub async fn cancel(&mut self) -> Result<Navigation, SesError> {
        if self.busy {
            return Err(SesError::SubmissionInFlight);
        }
        self.pending = None;

        match self.mode {
            WorkflowMode::Create => {
                self.sheet.reset();
                self.handoff.clear();
                self.state = WorkflowState::Viewing;
                Ok(Navigation::ReturnToList)
            }
            WorkflowMode::Edit | WorkflowMode::Review => {
                let request_no = self.sheet.request_no.clone().unwrap_or_default();
                let mut sheet = self
                    .gateway
                    .read_existing_sheet(&request_no)
                    .await
                    .map_err(|e| e.into_query_error())?;
                sheet.request_no.get_or_insert(request_no);
                self.sheet = sheet;
                self.state = WorkflowState::Viewing;
                self.resume_state = WorkflowState::Viewing;
                Ok(Navigation::Stay)
            }
        }
    }
}
