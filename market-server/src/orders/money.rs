//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic is done on `Decimal` internally, then converted back to
//! `f64` for storage/serialization.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Line subtotal: unit price times quantity
pub fn line_subtotal(price_each: f64, quantity: i32) -> f64 {
    to_f64(to_decimal(price_each) * Decimal::from(quantity))
}

/// Percentage discount on an order total, clamped to an optional cap.
///
/// The cap bounds the absolute discount amount regardless of percentage.
pub fn percentage_discount(total: f64, percentage: f64, cap: Option<f64>) -> f64 {
    let mut discount = to_decimal(total) * to_decimal(percentage) / Decimal::ONE_HUNDRED;
    if let Some(cap) = cap {
        let cap = to_decimal(cap);
        if discount > cap {
            discount = cap;
        }
    }
    to_f64(discount)
}

/// Subtract a discount from a total, never going below zero
pub fn apply_discount(total: f64, discount: f64) -> f64 {
    let result = to_decimal(total) - to_decimal(discount);
    to_f64(result.max(Decimal::ZERO))
}
