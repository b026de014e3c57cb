//! Submission payload sent to the backend `submitSES` operation.
//!
//! The backend schema is fixed: identifiers travel as strings, quantities and
//! amounts as JSON numbers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Action requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionAction {
    Create,
    Approve,
    Reject,
    Edit,
}

impl SubmissionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionAction::Create => "CREATE",
            SubmissionAction::Approve => "APPROVE",
            SubmissionAction::Reject => "REJECT",
            SubmissionAction::Edit => "EDIT",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CREATE" => Some(SubmissionAction::Create),
            "APPROVE" => Some(SubmissionAction::Approve),
            "REJECT" => Some(SubmissionAction::Reject),
            "EDIT" => Some(SubmissionAction::Edit),
            _ => None,
        }
    }

    /// Customer-side decisions on an existing sheet.
    pub fn is_review(&self) -> bool {
        matches!(self, SubmissionAction::Approve | SubmissionAction::Reject)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub action: SubmissionAction,
    #[serde(rename = "TOTAL_AMOUNT", with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub servicehead: Vec<ServiceHead>,
    pub serviceitem: Vec<PayloadItem>,
    pub attachments: Vec<PayloadAttachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ServiceHead {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub request_no: Option<String>,
    pub service_period: String,
    pub service_location: String,
    pub person_responsible: String,
    pub company_code: String,
    pub po_number: String,
    pub amount: String,
    #[serde(rename = "TYPE")]
    pub service_type: String,
    pub supplier_number: String,
    pub supplier_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub final_ses_entry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub site_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub service_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadItem {
    #[serde(rename = "SR_NO")]
    pub sr_no: String,
    #[serde(rename = "ITEM_NUMBER")]
    pub item_number: String,
    #[serde(rename = "SERVICE_NUMBER")]
    pub service_number: String,
    #[serde(rename = "SERVICE_DESCRIPTION")]
    pub service_description: String,
    #[serde(rename = "UNIT_OF_MEASURE")]
    pub unit_of_measure: String,
    #[serde(rename = "ORDERED_QUANTITY", with = "rust_decimal::serde::float")]
    pub ordered_quantity: Decimal,
    #[serde(rename = "UNIT_PRICE", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(rename = "SERVICE_QUANTITY", with = "rust_decimal::serde::float")]
    pub service_quantity: Decimal,
    #[serde(rename = "TOTAL_PRICE", with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub packno: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub introw: Option<String>,
    #[serde(
        rename = "packageNofromPO",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub package_no_from_po: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadAttachment {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub base64value: Option<String>,
    #[serde(rename = "URL", skip_serializing_if = "Option::is_none", default)]
    pub url: Option<String>,
    #[serde(rename = "DESCRIPTION")]
    pub description: String,
    #[serde(rename = "COMMENT")]
    pub comment: String,
}

/// Backend answer to a successful submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(rename = "returnMessage", default)]
    pub return_message: String,
}
