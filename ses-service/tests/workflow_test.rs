//! Integration tests for the submission workflow state machine.

mod common;

use common::{dec, gateway, planned_po, TestSession, IN_PROCESS_SHEET, REJECTED_SHEET};
use ses_service::models::{
    FieldEdit, ItemField, LogAction, ReviewDetails, SubmissionAction,
};
use ses_service::services::{
    AttachmentPolicy, GatewayError, Navigation, SesError, SubmissionWorkflow, WorkflowMode,
    WorkflowState,
};
use std::sync::Arc;
use std::time::Duration;

async fn open(session: &TestSession, request_no: &str, mode: WorkflowMode) -> SubmissionWorkflow {
    SubmissionWorkflow::open_existing(
        session.gateway.clone(),
        Arc::clone(&session.handoff),
        AttachmentPolicy::edit_flow(),
        request_no,
        mode,
    )
    .await
    .expect("Failed to open sheet")
}

fn review_details() -> ReviewDetails {
    ReviewDetails {
        final_entry: Some("Yes".to_string()),
        site_person: "K. Lee".to_string(),
        service_text: "February maintenance".to_string(),
    }
}

#[tokio::test]
async fn missing_attachment_blocks_confirmation() {
    let session = TestSession::new(gateway());
    let mut workflow = open(&session, REJECTED_SHEET, WorkflowMode::Edit).await;
    workflow.begin_edit().unwrap();
    workflow
        .apply_edit(&FieldEdit::new(10, ItemField::QuantityInput, "5"))
        .unwrap();
    workflow.remove_attachment().unwrap();

    let err = workflow
        .request_submit(SubmissionAction::Edit, None)
        .unwrap_err();
    assert!(matches!(err, SesError::RequiredField(_)));
    assert!(workflow.pending_payload().is_none());

    let err = workflow.confirm_submit().await.unwrap_err();
    assert!(matches!(err, SesError::NotPermitted(_)));
    assert!(session.gateway.submissions().is_empty());
    assert_eq!(*workflow.state(), WorkflowState::Editing);
}

#[tokio::test]
async fn only_rejected_sheets_can_be_edited() {
    let session = TestSession::new(gateway());

    let mut in_process = open(&session, IN_PROCESS_SHEET, WorkflowMode::Edit).await;
    assert!(matches!(
        in_process.begin_edit(),
        Err(SesError::NotPermitted(_))
    ));
    assert!(in_process
        .apply_edit(&FieldEdit::new(10, ItemField::QuantityInput, "1"))
        .is_err());

    let mut rejected = open(&session, REJECTED_SHEET, WorkflowMode::Edit).await;
    assert_eq!(*rejected.state(), WorkflowState::Viewing);
    rejected.begin_edit().unwrap();
    assert_eq!(*rejected.state(), WorkflowState::Editing);
}

#[tokio::test]
async fn edit_resubmission_carries_request_number_and_default_comment() {
    let session = TestSession::new(gateway());
    let mut workflow = open(&session, REJECTED_SHEET, WorkflowMode::Edit).await;
    workflow.begin_edit().unwrap();
    workflow
        .apply_edit(&FieldEdit::new(10, ItemField::QuantityInput, "5"))
        .unwrap();

    workflow
        .request_submit(SubmissionAction::Edit, None)
        .unwrap();
    workflow.confirm_submit().await.unwrap();

    let submitted = &session.gateway.submissions()[0];
    let head = &submitted.servicehead[0];
    assert_eq!(submitted.action, SubmissionAction::Edit);
    assert_eq!(head.request_no.as_deref(), Some(REJECTED_SHEET));
    assert_eq!(head.comment.as_deref(), Some("Revised and re-uploaded"));
    assert_eq!(
        submitted.attachments[0].url.as_deref(),
        Some("https://files.example/ses/timesheet.pdf")
    );
    assert_eq!(submitted.serviceitem[0].packno.as_deref(), Some("0000004711"));
}

#[tokio::test]
async fn review_approves_from_viewing() {
    let session = TestSession::new(gateway().with_approval_logs(
        planned_po().header.po_number,
        vec![
            serde_json::from_value(serde_json::json!({
                "timestamp": "2026-02-03T10:00:00Z",
                "action": "APPROVE",
                "approver_id": "approver-1",
                "approval_level": 1
            }))
            .unwrap(),
            serde_json::from_value(serde_json::json!({
                "timestamp": "2026-02-01T08:00:00Z",
                "action": "CREATE",
                "approver_id": "S-0042"
            }))
            .unwrap(),
        ],
    ));
    let mut workflow = open(&session, IN_PROCESS_SHEET, WorkflowMode::Review).await;

    assert_eq!(workflow.history().latest().unwrap().action, LogAction::Approve);
    assert_eq!(workflow.history().highest_level(), Some(1));
    assert!(workflow.add_item().is_err());

    let err = workflow
        .request_submit(SubmissionAction::Approve, Some("Looks good"))
        .unwrap_err();
    assert!(matches!(err, SesError::RequiredField(_)));

    workflow.set_review_details(review_details()).unwrap();
    assert!(workflow
        .request_submit(SubmissionAction::Edit, None)
        .is_err());

    let payload = workflow
        .request_submit(SubmissionAction::Approve, Some("Looks good"))
        .unwrap();
    assert_eq!(payload.total_amount, dec("400"));
    assert_eq!(payload.servicehead[0].final_ses_entry.as_deref(), Some("Yes"));

    workflow.confirm_submit().await.unwrap();
    let submitted = session.gateway.submissions();
    assert_eq!(submitted[0].action, SubmissionAction::Approve);
    assert_eq!(submitted[0].servicehead[0].comment.as_deref(), Some("Looks good"));
}

#[tokio::test]
async fn failed_submission_returns_to_editing() {
    let session = TestSession::new(
        gateway().failing_submit(GatewayError::Unavailable("connection refused".to_string())),
    );
    let mut workflow = open(&session, REJECTED_SHEET, WorkflowMode::Edit).await;
    workflow.begin_edit().unwrap();
    workflow
        .apply_edit(&FieldEdit::new(10, ItemField::QuantityInput, "5"))
        .unwrap();
    workflow
        .request_submit(SubmissionAction::Edit, None)
        .unwrap();

    let err = workflow.confirm_submit().await.unwrap_err();
    assert!(matches!(err, SesError::SubmissionTransport(_)));
    assert!(matches!(workflow.state(), WorkflowState::Failed { .. }));
    assert!(!workflow.is_busy());
    assert!(workflow
        .apply_edit(&FieldEdit::new(10, ItemField::QuantityInput, "6"))
        .is_err());

    workflow.dismiss_error();
    assert_eq!(*workflow.state(), WorkflowState::Editing);
    assert_eq!(
        workflow.sheet().items.get(10).unwrap().quantity_input,
        Some(dec("5"))
    );
}

#[tokio::test]
async fn mutation_invalidates_pending_payload() {
    let session = TestSession::new(gateway());
    let mut workflow = open(&session, REJECTED_SHEET, WorkflowMode::Edit).await;
    workflow.begin_edit().unwrap();
    workflow
        .apply_edit(&FieldEdit::new(10, ItemField::QuantityInput, "5"))
        .unwrap();

    workflow
        .request_submit(SubmissionAction::Edit, None)
        .unwrap();
    workflow
        .apply_edit(&FieldEdit::new(10, ItemField::QuantityInput, "6"))
        .unwrap();
    assert!(workflow.pending_payload().is_none());

    workflow
        .request_submit(SubmissionAction::Edit, None)
        .unwrap();
    assert!(workflow.cancel_confirmation().is_some());
    assert!(workflow.confirm_submit().await.is_err());
    assert!(session.gateway.submissions().is_empty());
}

#[tokio::test]
async fn abandoned_dispatch_keeps_workflow_busy() {
    let session = TestSession::new(gateway().with_submit_delay(Duration::from_secs(5)));
    let mut workflow = open(&session, REJECTED_SHEET, WorkflowMode::Edit).await;
    workflow.begin_edit().unwrap();
    workflow
        .apply_edit(&FieldEdit::new(10, ItemField::QuantityInput, "5"))
        .unwrap();
    workflow
        .request_submit(SubmissionAction::Edit, None)
        .unwrap();

    let timed_out =
        tokio::time::timeout(Duration::from_millis(20), workflow.confirm_submit()).await;
    assert!(timed_out.is_err());

    assert!(workflow.is_busy());
    assert_eq!(*workflow.state(), WorkflowState::Submitting);
    assert!(matches!(
        workflow.request_submit(SubmissionAction::Edit, None),
        Err(SesError::SubmissionInFlight)
    ));
    assert!(matches!(
        workflow.cancel().await,
        Err(SesError::SubmissionInFlight)
    ));
}

#[tokio::test]
async fn cancel_edit_reloads_persisted_sheet() {
    let session = TestSession::new(gateway());
    let mut workflow = open(&session, REJECTED_SHEET, WorkflowMode::Edit).await;
    workflow.begin_edit().unwrap();
    workflow
        .apply_edit(&FieldEdit::new(10, ItemField::QuantityInput, "5"))
        .unwrap();
    workflow.remove_attachment().unwrap();

    assert_eq!(workflow.cancel().await.unwrap(), Navigation::Stay);
    assert_eq!(*workflow.state(), WorkflowState::Viewing);
    assert_eq!(workflow.sheet().items.get(10).unwrap().quantity_input, None);
    assert!(workflow.sheet().attachment.is_some());
}

#[tokio::test]
async fn cancel_create_resets_and_clears_handoff() {
    let session = TestSession::new(gateway());
    let mut workflow = session.start_create(&planned_po(), &[10]).await;
    workflow
        .apply_edit(&FieldEdit::new(10, ItemField::QuantityInput, "5"))
        .unwrap();

    assert_eq!(workflow.cancel().await.unwrap(), Navigation::ReturnToList);
    assert!(workflow.sheet().items.is_empty());
    assert!(session.handoff.is_empty());
}

#[tokio::test]
async fn create_without_selection_fails() {
    let session = TestSession::new(gateway());
    let result = SubmissionWorkflow::start_create(
        session.gateway.clone(),
        Arc::clone(&session.handoff),
        AttachmentPolicy::create_flow(),
        &planned_po().header.po_number,
    )
    .await;
    assert!(matches!(result, Err(SesError::RequiredField(_))));
}

#[tokio::test]
async fn unknown_sheet_is_a_collaborator_error() {
    let session = TestSession::new(gateway());
    let result = SubmissionWorkflow::open_existing(
        session.gateway.clone(),
        Arc::clone(&session.handoff),
        AttachmentPolicy::edit_flow(),
        "SES-404",
        WorkflowMode::Review,
    )
    .await;
    assert!(matches!(result, Err(SesError::Collaborator(_))));
}
