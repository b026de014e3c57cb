//! Backend collaborator abstraction.
//!
//! The engine only talks to the backend through [`SesGateway`], so the
//! transport can be swapped (OData client, mock) without touching the
//! workflow.

pub mod mock;

use crate::models::{
    ApprovalLogEntry, PurchaseOrderRecord, ServiceEntrySheet, SubmissionPayload, SubmitResponse,
};
use crate::services::error::SesError;
use async_trait::async_trait;
use thiserror::Error;

/// Error type for gateway operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rejected by backend: {0}")]
    Rejected(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

impl GatewayError {
    /// Map a failed read into the domain taxonomy.
    pub fn into_query_error(self) -> SesError {
        SesError::Collaborator(self.to_string())
    }

    /// Map a failed submission into the domain taxonomy.
    pub fn into_submission_error(self) -> SesError {
        match self {
            GatewayError::Rejected(msg) => SesError::SubmissionTransport(msg),
            other => SesError::SubmissionTransport(other.to_string()),
        }
    }
}

#[async_trait]
pub trait SesGateway: Send + Sync {
    async fn read_purchase_order(&self, po_number: &str)
        -> Result<PurchaseOrderRecord, GatewayError>;

    async fn read_existing_sheet(&self, request_no: &str)
        -> Result<ServiceEntrySheet, GatewayError>;

    async fn read_prior_approval_logs(
        &self,
        po_number: &str,
    ) -> Result<Vec<ApprovalLogEntry>, GatewayError>;

    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmitResponse, GatewayError>;
}
