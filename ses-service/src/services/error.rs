//! Error taxonomy of service entry sheet handling.

use rust_decimal::Decimal;
use service_core::error::AppError;
use thiserror::Error;

/// Attachment handling failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("Maximum one attachment allowed. Delete existing file first.")]
    LimitExceeded,

    #[error("File size {size_bytes} bytes exceeds the {max_bytes} byte limit")]
    TooLarge { size_bytes: u64, max_bytes: u64 },

    #[error("File type '{mime_type}' is not allowed")]
    UnsupportedType { mime_type: String },

    #[error("Unsupported file type for preview: {0}")]
    Unsupported(String),

    #[error("Failed to read file: {0}")]
    Read(String),
}

/// Errors raised by validation, payload building and the submission workflow.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SesError {
    #[error("{message}")]
    InputFormat { field: String, message: String },

    #[error("Maximum allowed quantity is {}", .remaining.normalize())]
    QuantityCeiling { sr_no: u32, remaining: Decimal },

    #[error(
        "Total Service Sheet value {} cannot exceed the order amount {}",
        .total.normalize(),
        .limit.normalize()
    )]
    AmountCeiling { total: Decimal, limit: Decimal },

    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    #[error("{0}")]
    RequiredField(String),

    #[error("Submission failed: {0}")]
    SubmissionTransport(String),

    #[error("{0}")]
    Collaborator(String),

    #[error("Not permitted: {0}")]
    NotPermitted(String),

    #[error("A submission is already in progress")]
    SubmissionInFlight,
}

impl SesError {
    pub(crate) fn input(field: impl Into<String>, message: impl Into<String>) -> Self {
        SesError::InputFormat {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Stable label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            SesError::InputFormat { .. } => "input_format",
            SesError::QuantityCeiling { .. } => "quantity_ceiling",
            SesError::AmountCeiling { .. } => "amount_ceiling",
            SesError::Attachment(AttachmentError::LimitExceeded) => "attachment_limit",
            SesError::Attachment(AttachmentError::TooLarge { .. }) => "attachment_size",
            SesError::Attachment(AttachmentError::UnsupportedType { .. })
            | SesError::Attachment(AttachmentError::Unsupported(_)) => "attachment_type",
            SesError::Attachment(AttachmentError::Read(_)) => "attachment_read",
            SesError::RequiredField(_) => "required_field",
            SesError::SubmissionTransport(_) => "submission_transport",
            SesError::Collaborator(_) => "collaborator",
            SesError::NotPermitted(_) => "not_permitted",
            SesError::SubmissionInFlight => "submission_in_flight",
        }
    }

    /// Errors the user resolves by correcting a field; handled inline.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SesError::InputFormat { .. }
                | SesError::QuantityCeiling { .. }
                | SesError::AmountCeiling { .. }
                | SesError::Attachment(_)
                | SesError::RequiredField(_)
        )
    }
}

impl From<SesError> for AppError {
    fn from(err: SesError) -> Self {
        match err {
            SesError::SubmissionTransport(msg) => AppError::BadGateway(msg),
            SesError::Collaborator(msg) => AppError::NotFound(anyhow::anyhow!(msg)),
            SesError::SubmissionInFlight => {
                AppError::Conflict(anyhow::anyhow!("A submission is already in progress"))
            }
            SesError::NotPermitted(msg) => AppError::Conflict(anyhow::anyhow!(msg)),
            other => AppError::BadRequest(anyhow::Error::new(other)),
        }
    }
}
