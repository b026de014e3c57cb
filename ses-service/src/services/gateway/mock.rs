//! In-memory gateway for tests and the dry-run binary.

use super::{GatewayError, SesGateway};
use crate::models::{
    ApprovalLogEntry, PurchaseOrderRecord, ServiceEntrySheet, SubmissionPayload, SubmitResponse,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Mock backend with preloaded records that keeps every submitted payload.
#[derive(Default)]
pub struct MockGateway {
    purchase_orders: HashMap<String, PurchaseOrderRecord>,
    sheets: HashMap<String, ServiceEntrySheet>,
    approval_logs: HashMap<String, Vec<ApprovalLogEntry>>,
    return_message: String,
    submit_error: Option<GatewayError>,
    submit_delay: Option<Duration>,
    submissions: Mutex<Vec<SubmissionPayload>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_purchase_order(mut self, record: PurchaseOrderRecord) -> Self {
        self.purchase_orders
            .insert(record.header.po_number.clone(), record);
        self
    }

    pub fn with_sheet(mut self, request_no: impl Into<String>, sheet: ServiceEntrySheet) -> Self {
        self.sheets.insert(request_no.into(), sheet);
        self
    }

    pub fn with_approval_logs(
        mut self,
        po_number: impl Into<String>,
        logs: Vec<ApprovalLogEntry>,
    ) -> Self {
        self.approval_logs.insert(po_number.into(), logs);
        self
    }

    pub fn with_return_message(mut self, message: impl Into<String>) -> Self {
        self.return_message = message.into();
        self
    }

    /// Make every submission fail with `error`.
    pub fn failing_submit(mut self, error: GatewayError) -> Self {
        self.submit_error = Some(error);
        self
    }

    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = Some(delay);
        self
    }

    /// Payloads received so far, oldest first.
    pub fn submissions(&self) -> Vec<SubmissionPayload> {
        self.submissions
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SesGateway for MockGateway {
    async fn read_purchase_order(
        &self,
        po_number: &str,
    ) -> Result<PurchaseOrderRecord, GatewayError> {
        self.purchase_orders
            .get(po_number)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("Purchase order {}", po_number)))
    }

    async fn read_existing_sheet(
        &self,
        request_no: &str,
    ) -> Result<ServiceEntrySheet, GatewayError> {
        self.sheets
            .get(request_no)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("Service entry sheet {}", request_no)))
    }

    async fn read_prior_approval_logs(
        &self,
        po_number: &str,
    ) -> Result<Vec<ApprovalLogEntry>, GatewayError> {
        Ok(self
            .approval_logs
            .get(po_number)
            .cloned()
            .unwrap_or_default())
    }

    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmitResponse, GatewayError> {
        if let Some(delay) = self.submit_delay {
            tokio::time::sleep(delay).await;
        }

        tracing::info!(
            action = payload.action.as_str(),
            items = payload.serviceitem.len(),
            total = %payload.total_amount,
            "Mock gateway received submission"
        );

        if let Some(err) = &self.submit_error {
            return Err(err.clone());
        }

        if let Ok(mut submissions) = self.submissions.lock() {
            submissions.push(payload.clone());
        }

        Ok(SubmitResponse {
            return_message: self.return_message.clone(),
        })
    }
}
