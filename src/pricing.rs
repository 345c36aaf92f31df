//! Pricing and invoice derivation.
//!
//! All monetary arithmetic is exact `Decimal`; nothing here touches floats.
//! The booking total is derived, never stored.

use chrono::Days;
use rust_decimal::Decimal;

use crate::model::{Booking, DateRange, LineItem};

/// Days granted to settle an invoice after check-out.
const PAYMENT_TERM_DAYS: u64 = 7;

pub fn nights(range: &DateRange) -> i64 {
    range.nights()
}

/// `nightly_rate × nights + service_charge − discount`.
pub fn total_amount(
    nightly_rate: Decimal,
    nights: i64,
    service_charge: Decimal,
    discount: Decimal,
) -> Decimal {
    nightly_rate * Decimal::from(nights) + service_charge - discount
}

/// Build invoice line items from a completed booking. The room charge is one
/// line with quantity = nights; service charge and discount get their own
/// lines only when non-zero, the discount as a negative unit price.
pub fn invoice_lines(booking: &Booking, room_type_name: &str) -> Vec<LineItem> {
    let mut lines = vec![LineItem {
        description: format!("{room_type_name} room, nightly rate"),
        quantity: booking.nights() as u32,
        unit_price: booking.nightly_rate,
    }];
    if !booking.service_charge.is_zero() {
        lines.push(LineItem {
            description: "Service charge".into(),
            quantity: 1,
            unit_price: booking.service_charge,
        });
    }
    if !booking.discount.is_zero() {
        lines.push(LineItem {
            description: "Discount".into(),
            quantity: 1,
            unit_price: -booking.discount,
        });
    }
    lines
}

/// Invoice due date: fixed payment term after check-out.
pub fn due_date(check_out: chrono::NaiveDate) -> chrono::NaiveDate {
    check_out
        .checked_add_days(Days::new(PAYMENT_TERM_DAYS))
        .unwrap_or(check_out)
}
