//! Sheet total calculation.
//!
//! All sums keep full precision; [`round_money`] is applied only when a
//! value is displayed or written into a payload.

use crate::models::{PurchaseOrderContext, ServiceItem, ServiceType};
use crate::services::error::SesError;
use rust_decimal::{Decimal, RoundingStrategy};

/// Total claimed by this submission.
///
/// Planned sheets sum `unit_price * quantity_input`; un-planned sheets sum
/// `unit_price * quantity` and add `previous_total`, failing with
/// [`SesError::AmountCeiling`] when the order limit would be exceeded.
/// Amounts outside the `Decimal` range are an input error.
pub fn compute_total(
    items: &[ServiceItem],
    context: &PurchaseOrderContext,
    previous_total: Decimal,
) -> Result<Decimal, SesError> {
    let service_type = context.service_type;
    let mut total = Decimal::ZERO;

    for item in items {
        if item.unit_price < Decimal::ZERO {
            return Err(SesError::input(
                "unit_price",
                format!("Unit price cannot be negative (row {})", item.sr_no),
            ));
        }
        let quantity = item.priced_quantity(service_type);
        if quantity < Decimal::ZERO {
            return Err(SesError::input(
                "quantity",
                format!("Quantity cannot be negative (row {})", item.sr_no),
            ));
        }
        let line = item
            .line_total(service_type)
            .ok_or_else(|| amount_too_large(item.sr_no))?;
        total = total
            .checked_add(line)
            .ok_or_else(|| amount_too_large(item.sr_no))?;
    }

    match service_type {
        ServiceType::Planned => Ok(total),
        ServiceType::Unplanned => {
            let total = total
                .checked_add(previous_total)
                .ok_or_else(sheet_total_too_large)?;
            if total > context.order_limit {
                return Err(SesError::AmountCeiling {
                    total,
                    limit: context.order_limit,
                });
            }
            Ok(total)
        }
    }
}

/// Total of a sheet as persisted by the backend.
pub fn recorded_total(
    items: &[ServiceItem],
    service_type: ServiceType,
) -> Result<Decimal, SesError> {
    items.iter().try_fold(Decimal::ZERO, |total, item| {
        item.recorded_line_total(service_type)
            .and_then(|line| total.checked_add(line))
            .ok_or_else(|| amount_too_large(item.sr_no))
    })
}

/// Value already consumed by earlier un-planned submissions.
pub fn previous_total(prior_items: &[ServiceItem]) -> Result<Decimal, SesError> {
    recorded_total(prior_items, ServiceType::Unplanned)
}

fn amount_too_large(sr_no: u32) -> SesError {
    SesError::input("amount", format!("Amount is too large (row {})", sr_no))
}

fn sheet_total_too_large() -> SesError {
    SesError::input("amount", "Total Service Sheet Value is too large")
}

/// Round a monetary amount to 2 dp, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn context(service_type: ServiceType, limit: i64) -> PurchaseOrderContext {
        PurchaseOrderContext {
            po_number: "4500000001".to_string(),
            order_limit: Decimal::from(limit),
            company_code: "1000".to_string(),
            supplier_id: "S-01".to_string(),
            supplier_name: "Acme Services".to_string(),
            service_type,
        }
    }

    fn planned(sr_no: u32, price: &str, ordered: i64, serviced: i64, input: Option<&str>) -> ServiceItem {
        let mut item = ServiceItem::blank(sr_no, sr_no / 10);
        item.unit_price = dec(price);
        item.ordered_quantity = Decimal::from(ordered);
        item.serviced_quantity = Decimal::from(serviced);
        item.quantity_input = input.map(dec);
        item
    }

    fn unplanned(sr_no: u32, price: &str, quantity: &str) -> ServiceItem {
        let mut item = ServiceItem::blank(sr_no, sr_no / 10);
        item.unit_price = dec(price);
        item.quantity = dec(quantity);
        item
    }

    #[test]
    fn test_planned_total_ignores_serviced_quantity() {
        let ctx = context(ServiceType::Planned, 0);
        let items = vec![
            planned(10, "10", 100, 40, Some("50")),
            planned(20, "2.5", 10, 0, None),
        ];
        assert_eq!(compute_total(&items, &ctx, Decimal::ZERO).unwrap(), dec("500"));
    }

    #[test]
    fn test_unplanned_total_includes_previous() {
        let ctx = context(ServiceType::Unplanned, 1000);
        let items = vec![unplanned(10, "50", "10")];
        assert_eq!(compute_total(&items, &ctx, dec("200")).unwrap(), dec("700"));
    }

    #[test]
    fn test_unplanned_total_over_limit_fails() {
        let ctx = context(ServiceType::Unplanned, 1000);
        let items = vec![unplanned(10, "50", "17")];
        let err = compute_total(&items, &ctx, dec("200")).unwrap_err();
        assert_eq!(
            err,
            SesError::AmountCeiling {
                total: dec("1050"),
                limit: dec("1000")
            }
        );
    }

    #[test]
    fn test_unplanned_total_at_limit_is_accepted() {
        let ctx = context(ServiceType::Unplanned, 1000);
        let items = vec![unplanned(10, "50", "16")];
        assert_eq!(compute_total(&items, &ctx, dec("200")).unwrap(), dec("1000"));
    }

    #[test]
    fn test_negative_values_are_rejected() {
        let ctx = context(ServiceType::Unplanned, 1000);
        let err = compute_total(&[unplanned(10, "-1", "1")], &ctx, Decimal::ZERO).unwrap_err();
        assert_eq!(err.kind(), "input_format");
        let err = compute_total(&[unplanned(10, "1", "-1")], &ctx, Decimal::ZERO).unwrap_err();
        assert_eq!(err.kind(), "input_format");
    }

    #[test]
    fn test_compute_total_is_idempotent() {
        let ctx = context(ServiceType::Unplanned, 10_000);
        let items = vec![unplanned(10, "12.345", "3"), unplanned(20, "0.005", "7")];
        let first = compute_total(&items, &ctx, dec("1.1")).unwrap();
        let second = compute_total(&items, &ctx, dec("1.1")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_full_precision_until_rounded() {
        let ctx = context(ServiceType::Unplanned, 10_000);
        let items = vec![unplanned(10, "0.005", "1"), unplanned(20, "0.005", "1")];
        let total = compute_total(&items, &ctx, Decimal::ZERO).unwrap();
        assert_eq!(total, dec("0.010"));
        assert_eq!(round_money(dec("0.005")), dec("0.01"));
        assert_eq!(round_money(dec("-0.005")), dec("-0.01"));
        assert_eq!(round_money(dec("2.344")), dec("2.34"));
    }

    #[test]
    fn test_recorded_and_previous_totals() {
        let items = vec![planned(10, "10", 100, 40, Some("5"))];
        assert_eq!(recorded_total(&items, ServiceType::Planned).unwrap(), dec("400"));

        let prior = vec![unplanned(10, "50", "2"), unplanned(20, "25", "4")];
        assert_eq!(previous_total(&prior).unwrap(), dec("200"));
        assert_eq!(
            recorded_total(&prior, ServiceType::Unplanned).unwrap(),
            dec("200")
        );
    }

    #[test]
    fn test_out_of_range_amounts_are_errors() {
        let ctx = context(ServiceType::Unplanned, 1000);
        let huge = unplanned(10, "50", "10000000000000000000000000000");
        let err = compute_total(&[huge.clone()], &ctx, Decimal::ZERO).unwrap_err();
        assert_eq!(err.kind(), "input_format");
        assert_eq!(previous_total(&[huge]).unwrap_err().kind(), "input_format");

        let max_price = unplanned(10, "79228162514264337593543950335", "1");
        let err = compute_total(&[max_price], &ctx, dec("200")).unwrap_err();
        assert_eq!(err.to_string(), "Total Service Sheet Value is too large");

        let ctx = context(ServiceType::Planned, 0);
        let item = planned(10, "79228162514264337593543950335", 100, 0, Some("2"));
        assert!(compute_total(&[item], &ctx, Decimal::ZERO).is_err());
    }
}
