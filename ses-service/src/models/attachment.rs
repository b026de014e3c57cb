//! Attachment model for service entry sheets.

use serde::{Deserialize, Serialize};

/// Where the attachment bytes live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AttachmentContent {
    /// Freshly uploaded file, held in memory until submission.
    Inline {
        #[serde(with = "base64_bytes")]
        bytes: Vec<u8>,
    },
    /// Already persisted by the backend.
    Stored { url: String },
}

/// File attached to a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub content: AttachmentContent,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub comment: String,
}

impl Attachment {
    pub fn is_inline(&self) -> bool {
        matches!(self.content, AttachmentContent::Inline { .. })
    }
}

/// Metadata of a file picked by the user, known before its bytes are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl FileSelection {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }
}

pub(crate) fn file_extension(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.trim().to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Serde adapter carrying raw bytes as standard base64.
pub(crate) mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
