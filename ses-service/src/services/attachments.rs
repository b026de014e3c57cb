//! Single-slot attachment handling and preview dispatch.

use crate::models::{file_extension, Attachment, AttachmentContent, FileSelection};
use crate::services::error::AttachmentError;
use crate::services::metrics;
use tokio::io::{AsyncRead, AsyncReadExt};

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_PNG: &str = "image/png";
pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_XLS: &str = "application/vnd.ms-excel";
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const MIME_MSG: &str = "application/vnd.ms-outlook";
pub const MIME_CSV: &str = "text/csv";
pub const MIME_TEXT: &str = "text/plain";

const PREVIEWABLE: &[&str] = &[
    MIME_PDF, MIME_PNG, MIME_JPEG, MIME_XLS, MIME_XLSX, MIME_MSG, MIME_CSV, MIME_TEXT,
];
const DOCUMENTS: &[&str] = &[MIME_PDF, MIME_XLS, MIME_XLSX, MIME_TEXT, MIME_CSV];

/// Default ceiling for the create flow.
pub const CREATE_FLOW_MAX_BYTES: u64 = 2 * 1024 * 1024;
/// Default ceiling for the edit flow.
pub const EDIT_FLOW_MAX_BYTES: u64 = 1024 * 1024;

/// MIME allow-list applied to new attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedTypes {
    /// Anything the preview dispatcher can show or download.
    Previewable,
    /// PDF, spreadsheets, plain text and CSV.
    Documents,
}

impl AllowedTypes {
    fn mime_types(&self) -> &'static [&'static str] {
        match self {
            AllowedTypes::Previewable => PREVIEWABLE,
            AllowedTypes::Documents => DOCUMENTS,
        }
    }

    pub fn allows(&self, mime_type: &str) -> bool {
        let essence = mime_essence(mime_type);
        self.mime_types().iter().any(|allowed| *allowed == essence)
    }
}

/// Size ceiling and allow-list for one flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentPolicy {
    pub max_size_bytes: u64,
    pub allowed: AllowedTypes,
}

impl AttachmentPolicy {
    pub fn create_flow() -> Self {
        Self {
            max_size_bytes: CREATE_FLOW_MAX_BYTES,
            allowed: AllowedTypes::Previewable,
        }
    }

    pub fn edit_flow() -> Self {
        Self {
            max_size_bytes: EDIT_FLOW_MAX_BYTES,
            allowed: AllowedTypes::Documents,
        }
    }
}

/// Lowercased MIME type without parameters.
fn mime_essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub struct AttachmentManager {
    policy: AttachmentPolicy,
}

impl AttachmentManager {
    pub fn new(policy: AttachmentPolicy) -> Self {
        Self { policy }
    }

    /// Metadata checks, run before any bytes are read.
    pub fn validate(
        &self,
        existing: Option<&Attachment>,
        selection: &FileSelection,
    ) -> Result<(), AttachmentError> {
        if existing.is_some() {
            return Err(AttachmentError::LimitExceeded);
        }
        if selection.size_bytes > self.policy.max_size_bytes {
            return Err(AttachmentError::TooLarge {
                size_bytes: selection.size_bytes,
                max_bytes: self.policy.max_size_bytes,
            });
        }
        if !self.policy.allowed.allows(&selection.mime_type) {
            return Err(AttachmentError::UnsupportedType {
                mime_type: selection.mime_type.clone(),
            });
        }
        Ok(())
    }

    /// Read the file bytes, enforcing the ceiling on what was actually read.
    pub async fn load<R>(&self, mut reader: R) -> Result<Vec<u8>, AttachmentError>
    where
        R: AsyncRead + Unpin,
    {
        let max = self.policy.max_size_bytes;
        let mut bytes = Vec::new();
        (&mut reader)
            .take(max.saturating_add(1))
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| AttachmentError::Read(e.to_string()))?;

        let size_bytes = bytes.len() as u64;
        if size_bytes > max {
            return Err(AttachmentError::TooLarge {
                size_bytes,
                max_bytes: max,
            });
        }
        Ok(bytes)
    }

    /// Validate, read and store a new attachment in the empty slot.
    pub async fn add<R>(
        &self,
        slot: &mut Option<Attachment>,
        selection: FileSelection,
        reader: R,
    ) -> Result<Attachment, AttachmentError>
    where
        R: AsyncRead + Unpin,
    {
        let result = self.try_add(slot, selection, reader).await;
        match &result {
            Ok(attachment) => {
                metrics::record_attachment_operation("add", "success");
                tracing::info!(
                    file_name = %attachment.file_name,
                    size_bytes = attachment.size_bytes,
                    "Attachment added"
                );
            }
            Err(e) => {
                metrics::record_attachment_operation("add", "rejected");
                tracing::warn!(error = %e, "Attachment rejected");
            }
        }
        result
    }

    async fn try_add<R>(
        &self,
        slot: &mut Option<Attachment>,
        selection: FileSelection,
        reader: R,
    ) -> Result<Attachment, AttachmentError>
    where
        R: AsyncRead + Unpin,
    {
        self.validate(slot.as_ref(), &selection)?;
        let bytes = self.load(reader).await?;

        let attachment = Attachment {
            description: selection.file_name.clone(),
            file_name: selection.file_name,
            mime_type: mime_essence(&selection.mime_type),
            size_bytes: bytes.len() as u64,
            content: AttachmentContent::Inline { bytes },
            comment: String::new(),
        };
        *slot = Some(attachment.clone());
        Ok(attachment)
    }

    /// Clear the slot, returning what was there.
    pub fn remove(&self, slot: &mut Option<Attachment>) -> Option<Attachment> {
        let removed = slot.take();
        if removed.is_some() {
            metrics::record_attachment_operation("remove", "success");
        }
        removed
    }
}

/// How a stored attachment is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewIntent {
    Inline { mime_type: &'static str },
    Download { mime_type: &'static str },
}

/// Decide preview handling from the file extension.
pub fn preview_intent(file_name: &str) -> Result<PreviewIntent, AttachmentError> {
    let extension = file_extension(file_name).unwrap_or_default();
    let intent = match extension.as_str() {
        "pdf" => PreviewIntent::Inline { mime_type: MIME_PDF },
        "png" => PreviewIntent::Inline { mime_type: MIME_PNG },
        "jpg" | "jpeg" => PreviewIntent::Inline { mime_type: MIME_JPEG },
        "xlsx" => PreviewIntent::Download { mime_type: MIME_XLSX },
        "xls" => PreviewIntent::Download { mime_type: MIME_XLS },
        "msg" => PreviewIntent::Download { mime_type: MIME_MSG },
        "csv" => PreviewIntent::Download { mime_type: MIME_CSV },
        "txt" => PreviewIntent::Download { mime_type: MIME_TEXT },
        _ => return Err(AttachmentError::Unsupported(file_name.to_string())),
    };
    Ok(intent)
}
