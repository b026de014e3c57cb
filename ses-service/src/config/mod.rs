//! Configuration module for ses-service.

use crate::services::attachments::{AllowedTypes, AttachmentPolicy};
use crate::services::attachments::{CREATE_FLOW_MAX_BYTES, EDIT_FLOW_MAX_BYTES};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct SesConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub attachments: AttachmentConfig,
}

/// Attachment policies for the two supplier flows.
#[derive(Debug, Clone)]
pub struct AttachmentConfig {
    pub create_flow: AttachmentPolicy,
    pub edit_flow: AttachmentPolicy,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            create_flow: AttachmentPolicy::create_flow(),
            edit_flow: AttachmentPolicy::edit_flow(),
        }
    }
}

fn max_bytes(var: &str, default: u64) -> Result<u64, AppError> {
    match env::var(var) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            AppError::ConfigError(anyhow::anyhow!("{} must be a byte count, got '{}'", var, raw))
        }),
        Err(_) => Ok(default),
    }
}

impl SesConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "ses-service".to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            attachments: AttachmentConfig {
                create_flow: AttachmentPolicy {
                    max_size_bytes: max_bytes("CREATE_ATTACHMENT_MAX_BYTES", CREATE_FLOW_MAX_BYTES)?,
                    allowed: AllowedTypes::Previewable,
                },
                edit_flow: AttachmentPolicy {
                    max_size_bytes: max_bytes("EDIT_ATTACHMENT_MAX_BYTES", EDIT_FLOW_MAX_BYTES)?,
                    allowed: AllowedTypes::Documents,
                },
            },
        })
    }
}
