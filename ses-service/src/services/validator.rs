//! Quantity and amount validation for service items.
//!
//! Runs on every field edit (against a candidate ledger with the edit
//! applied) and again on full-sheet submit.

use crate::models::{FieldEdit, ItemField, PurchaseOrderContext, ServiceItem, ServiceType};
use crate::services::error::SesError;
use crate::services::totals::compute_total;
use rust_decimal::Decimal;
use std::str::FromStr;

const INVALID_NUMBER: &str = "Please enter a valid number";

/// Parse a user-entered decimal.
///
/// Accepts plain and scientific notation with surrounding whitespace.
/// An empty string yields `None`; whitespace-only input is not a number.
pub fn parse_numeric(field: ItemField, raw: &str) -> Result<Option<Decimal>, SesError> {
    if raw.is_empty() {
        return Ok(None);
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SesError::input(field.as_str(), INVALID_NUMBER));
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map(Some)
        .map_err(|_| SesError::input(field.as_str(), INVALID_NUMBER))
}

/// Parsed value of an edit, ready to be placed on a candidate item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditValue {
    /// Planned quantity cleared by the user.
    NotEntered,
    Value(Decimal),
}

/// Check that the edit targets an editable field and holds an acceptable number.
pub fn parse_edit(edit: &FieldEdit, service_type: ServiceType) -> Result<EditValue, SesError> {
    if !edit.field.is_editable(service_type) {
        return Err(SesError::NotPermitted(format!(
            "{} cannot be edited on a {} sheet",
            edit.field.label(),
            service_type
        )));
    }

    let value = match (parse_numeric(edit.field, &edit.raw)?, edit.field) {
        (Some(value), _) => value,
        (None, ItemField::UnitPrice) => Decimal::ZERO,
        (None, ItemField::QuantityInput) => return Ok(EditValue::NotEntered),
        (None, ItemField::Quantity) => {
            return Err(SesError::input(
                edit.field.as_str(),
                "Service Quantity is required",
            ));
        }
    };

    if value < Decimal::ZERO {
        return Err(SesError::input(
            edit.field.as_str(),
            format!("{} cannot be negative", edit.field.label()),
        ));
    }
    Ok(EditValue::Value(value))
}

/// Validate one item within the ledger it belongs to.
///
/// `items` must already contain `item` in its candidate state so that the
/// un-planned aggregate reflects the hypothetical total.
pub fn validate_item(
    item: &ServiceItem,
    context: &PurchaseOrderContext,
    items: &[ServiceItem],
    previous_total: Decimal,
) -> Result<(), SesError> {
    if item.unit_price < Decimal::ZERO {
        return Err(SesError::input(
            ItemField::UnitPrice.as_str(),
            "Unit Price cannot be negative",
        ));
    }

    match context.service_type {
        ServiceType::Planned => {
            let input = item.quantity_input.unwrap_or(Decimal::ZERO);
            if input < Decimal::ZERO {
                return Err(SesError::input(
                    ItemField::QuantityInput.as_str(),
                    "Service Quantity cannot be negative",
                ));
            }
            let remaining = item.remaining_quantity();
            if input > remaining {
                return Err(SesError::QuantityCeiling {
                    sr_no: item.sr_no,
                    remaining,
                });
            }
            Ok(())
        }
        ServiceType::Unplanned => {
            if item.quantity < Decimal::ZERO {
                return Err(SesError::input(
                    ItemField::Quantity.as_str(),
                    "Service Quantity cannot be negative",
                ));
            }
            compute_total(items, context, previous_total).map(|_| ())
        }
    }
}

/// Checks that only apply when the sheet is submitted.
pub fn validate_for_submit(item: &ServiceItem, service_type: ServiceType) -> Result<(), SesError> {
    if item.unit_price <= Decimal::ZERO {
        return Err(SesError::RequiredField(
            "Unit price cannot be empty or negative".to_string(),
        ));
    }

    match service_type {
        ServiceType::Planned => {
            if item.quantity_input.is_none() {
                return Err(SesError::RequiredField(format!(
                    "Service Quantity is required for item {}",
                    item.sr_no
                )));
            }
        }
        ServiceType::Unplanned => {
            if item.service_number.trim().is_empty() {
                return Err(SesError::RequiredField(format!(
                    "Service Number is required for item {}",
                    item.sr_no
                )));
            }
        }
    }
    Ok(())
}
