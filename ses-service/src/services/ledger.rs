//! Explicit update functions over a sheet's item ledger.
//!
//! Every mutation validates a candidate first and only commits on success,
//! so a rejected edit leaves the ledger exactly as it was.

use crate::models::{
    FieldEdit, ItemField, ServiceCatalogEntry, ServiceEntrySheet, ServiceItem, ServiceType,
};
use crate::services::error::SesError;
use crate::services::metrics;
use crate::services::totals::compute_total;
use crate::services::validator::{parse_edit, validate_item, EditValue};
use rust_decimal::Decimal;

/// Apply a raw cell edit and return the refreshed sheet total.
///
/// On rejection the error is recorded inline against `(sr_no, field)`.
pub fn apply_edit(sheet: &mut ServiceEntrySheet, edit: &FieldEdit) -> Result<Decimal, SesError> {
    match try_apply_edit(sheet, edit) {
        Ok(total) => {
            sheet.items.clear_field_error(edit.sr_no, edit.field);
            Ok(total)
        }
        Err(e) => {
            metrics::record_validation_rejection(e.kind());
            tracing::debug!(
                sr_no = edit.sr_no,
                field = edit.field.as_str(),
                error = %e,
                "Edit rejected"
            );
            if e.is_validation() && sheet.items.get(edit.sr_no).is_some() {
                sheet
                    .items
                    .set_field_error(edit.sr_no, edit.field, e.to_string());
            }
            Err(e)
        }
    }
}

fn try_apply_edit(sheet: &mut ServiceEntrySheet, edit: &FieldEdit) -> Result<Decimal, SesError> {
    let service_type = sheet.service_type();
    let value = parse_edit(edit, service_type)?;

    let mut candidate = sheet.items.items().to_vec();
    let position = candidate
        .iter()
        .position(|item| item.sr_no == edit.sr_no)
        .ok_or_else(|| SesError::NotPermitted(format!("Item {} does not exist", edit.sr_no)))?;

    set_field(&mut candidate[position], edit.field, value);
    validate_item(
        &candidate[position],
        &sheet.context,
        &candidate,
        sheet.previous_total_value,
    )?;

    let total = compute_total(&candidate, &sheet.context, sheet.previous_total_value)?;
    let committed = candidate.swap_remove(position);
    if let Some(item) = sheet.items.get_mut(edit.sr_no) {
        *item = committed;
    }
    sheet.total_value = total;
    Ok(total)
}

fn set_field(item: &mut ServiceItem, field: ItemField, value: EditValue) {
    match (field, value) {
        (ItemField::QuantityInput, EditValue::NotEntered) => item.quantity_input = None,
        (ItemField::QuantityInput, EditValue::Value(v)) => item.quantity_input = Some(v),
        (ItemField::UnitPrice, EditValue::Value(v)) => item.unit_price = v,
        (ItemField::Quantity, EditValue::Value(v)) => item.quantity = v,
        (_, EditValue::NotEntered) => {}
    }
}

/// Append a blank row to an un-planned sheet, returning its serial number.
pub fn add_item(sheet: &mut ServiceEntrySheet) -> Result<u32, SesError> {
    if sheet.service_type() != ServiceType::Unplanned {
        return Err(SesError::NotPermitted(
            "Items can only be added to un-planned sheets".to_string(),
        ));
    }
    let (sr_no, item_number) = sheet.items.next_numbers();
    let row = ServiceItem::blank(sr_no, item_number);

    let mut candidate = sheet.items.items().to_vec();
    candidate.push(row.clone());
    let total = compute_total(&candidate, &sheet.context, sheet.previous_total_value)?;

    sheet.items.push(row);
    sheet.total_value = total;
    Ok(sr_no)
}

/// Remove rows by serial number.
pub fn remove_items(sheet: &mut ServiceEntrySheet, sr_nos: &[u32]) -> Result<usize, SesError> {
    let removed = sheet.items.remove(sr_nos);
    recalculate(sheet)?;
    Ok(removed)
}

/// Fill service number, description and unit of measure from a value-help pick.
pub fn assign_service(
    sheet: &mut ServiceEntrySheet,
    sr_no: u32,
    entry: &ServiceCatalogEntry,
) -> Result<(), SesError> {
    if sheet.service_type() != ServiceType::Unplanned {
        return Err(SesError::NotPermitted(
            "Service Number cannot be changed on a planned sheet".to_string(),
        ));
    }
    let item = sheet
        .items
        .get_mut(sr_no)
        .ok_or_else(|| SesError::NotPermitted(format!("Item {} does not exist", sr_no)))?;
    item.service_number = entry.service_number.clone();
    item.description = entry.description.clone();
    item.unit_of_measure = entry.unit_of_measure.clone();
    Ok(())
}

/// Refresh the derived sheet total.
pub fn recalculate(sheet: &mut ServiceEntrySheet) -> Result<Decimal, SesError> {
    let total = compute_total(
        sheet.items.items(),
        &sheet.context,
        sheet.previous_total_value,
    )?;
    sheet.total_value = total;
    Ok(total)
}
