//! Builds the backend submission payload from a sheet.

use crate::models::{
    Attachment, AttachmentContent, PayloadAttachment, PayloadItem, ServiceEntrySheet, ServiceHead,
    ServiceItem, ServiceType, SubmissionAction, SubmissionPayload,
};
use crate::services::error::SesError;
use crate::services::totals::{compute_total, recorded_total, round_money};
use crate::services::validator::validate_for_submit;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rust_decimal::Decimal;

pub const EDIT_DEFAULT_COMMENT: &str = "Revised and re-uploaded";

fn require(value: &str, label: &str) -> Result<(), SesError> {
    if value.trim().is_empty() {
        return Err(SesError::RequiredField(format!("{} is required", label)));
    }
    Ok(())
}

/// Validate the sheet for `action` and produce the payload.
///
/// Gates run in order: header fields, attachments, items, then the total.
pub fn build_payload(
    sheet: &ServiceEntrySheet,
    action: SubmissionAction,
    comment: Option<&str>,
) -> Result<SubmissionPayload, SesError> {
    require(&sheet.service_period, "Service Period")?;
    require(&sheet.service_location, "Service Location")?;
    require(&sheet.person_responsible, "Person Responsible")?;

    let request_no = match action {
        SubmissionAction::Create => None,
        _ => {
            let request_no = sheet.request_no.as_deref().unwrap_or_default();
            require(request_no, "Request Number")?;
            Some(request_no.to_string())
        }
    };

    let comment = comment.map(str::trim).filter(|c| !c.is_empty());
    let comment = match action {
        SubmissionAction::Approve | SubmissionAction::Reject => {
            let comment = comment.ok_or_else(|| {
                SesError::RequiredField("Comment is required".to_string())
            })?;
            let final_entry = sheet.review.final_entry.as_deref().unwrap_or_default();
            require(final_entry, "Final SES Entry")?;
            require(&sheet.review.site_person, "Site Person")?;
            require(&sheet.review.service_text, "Service Text")?;
            Some(comment.to_string())
        }
        SubmissionAction::Edit => Some(comment.unwrap_or(EDIT_DEFAULT_COMMENT).to_string()),
        SubmissionAction::Create => comment.map(str::to_string),
    };

    let attachment = sheet.attachment.as_ref().ok_or_else(|| {
        SesError::RequiredField("Please upload at least one attachment".to_string())
    })?;

    if sheet.items.is_empty() {
        return Err(SesError::RequiredField(
            "At least one service item is required".to_string(),
        ));
    }

    let service_type = sheet.service_type();
    let total = if action.is_review() {
        recorded_total(sheet.items.items(), service_type)?
    } else {
        for item in sheet.items.items() {
            validate_for_submit(item, service_type)?;
        }
        let total = compute_total(sheet.items.items(), &sheet.context, sheet.previous_total_value)?;
        if total <= Decimal::ZERO {
            return Err(SesError::RequiredField(
                "Total Service Sheet Value cannot be zero".to_string(),
            ));
        }
        total
    };
    let total = round_money(total);

    let review = action.is_review();
    let head = ServiceHead {
        request_no,
        service_period: sheet.service_period.clone(),
        service_location: sheet.service_location.clone(),
        person_responsible: sheet.person_responsible.clone(),
        company_code: sheet.context.company_code.clone(),
        po_number: sheet.context.po_number.clone(),
        amount: total.to_string(),
        service_type: service_type.as_str().to_string(),
        supplier_number: sheet.context.supplier_id.clone(),
        supplier_name: sheet.context.supplier_name.clone(),
        comment,
        final_ses_entry: review.then(|| sheet.review.final_entry.clone()).flatten(),
        site_person: review.then(|| sheet.review.site_person.clone()),
        service_text: review.then(|| sheet.review.service_text.clone()),
    };

    Ok(SubmissionPayload {
        action,
        total_amount: total,
        servicehead: vec![head],
        serviceitem: sheet
            .items
            .items()
            .iter()
            .map(|item| payload_item(item, service_type, review))
            .collect::<Result<_, _>>()?,
        attachments: vec![payload_attachment(attachment)],
    })
}

fn payload_item(
    item: &ServiceItem,
    service_type: ServiceType,
    recorded: bool,
) -> Result<PayloadItem, SesError> {
    let amounts = if recorded {
        item.recorded_line_total(service_type)
            .map(|line| (item.recorded_quantity(service_type), line))
    } else {
        item.submitted_quantity(service_type)
            .zip(item.line_total(service_type))
    };
    let (service_quantity, line_total) = amounts.ok_or_else(|| {
        SesError::input("amount", format!("Amount is too large (row {})", item.sr_no))
    })?;

    Ok(PayloadItem {
        sr_no: item.sr_no.to_string(),
        item_number: item.item_number.to_string(),
        service_number: item.service_number.clone(),
        service_description: item.description.clone(),
        unit_of_measure: item.unit_of_measure.clone(),
        ordered_quantity: item.ordered_quantity,
        unit_price: item.unit_price,
        service_quantity,
        total_price: round_money(line_total),
        packno: item.package_no.clone(),
        introw: item.internal_row.clone(),
        package_no_from_po: item.package_no_from_po.clone(),
    })
}

fn payload_attachment(attachment: &Attachment) -> PayloadAttachment {
    let (base64value, url) = match &attachment.content {
        AttachmentContent::Inline { bytes } => (Some(STANDARD.encode(bytes)), None),
        AttachmentContent::Stored { url } => (None, Some(url.clone())),
    };
    let description = if attachment.description.is_empty() {
        attachment.file_name.clone()
    } else {
        attachment.description.clone()
    };
    PayloadAttachment {
        base64value,
        url,
        description,
        comment: attachment.comment.clone(),
    }
}
