//! Core pricing calculation functions.
//!
//! Pure functions for the reservation total - no network or session access.
//! Numeric input from form controls is coerced here the same way the browser
//! screen did it: anything that is not a number counts as zero.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use std::str::FromStr;
use tracing::warn;

use crate::pricing::models::{PriceCatalog, PricingResult};
use crate::reservations::ledger::AddOnLedger;
use crate::reservations::selection::SelectionState;

/// Price charged per adult on package modalities, whatever the package.
pub const FIXED_ADULT_PRICE: Decimal = dec!(5);

/// Currency prefix used on every displayed amount (Peruvian sol).
pub const CURRENCY_SYMBOL: &str = "S/";

/// Shown instead of an amount too large to compute
pub const AMOUNT_OUT_OF_RANGE: &str = "-";

/// Round an amount to the two decimals it is displayed with.
///
/// This is the only place totals get rounded; intermediate sums keep full
/// precision. Midpoints round away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use ludicus_reservas::pricing::round_display;
///
/// assert_eq!(round_display(dec!(0.125)).to_string(), "0.13");
/// assert_eq!(round_display(dec!(3200)).to_string(), "3200.00");
/// ```
pub fn round_display(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Format an amount with exactly two decimals for display.
///
/// ```
/// use rust_decimal_macros::dec;
/// use ludicus_reservas::pricing::format_money;
///
/// assert_eq!(format_money(dec!(3200)), "3200.00");
/// assert_eq!(format_money(dec!(0.125)), "0.13");
/// ```
pub fn format_money(amount: Decimal) -> String {
    round_display(amount).to_string()
}

/// `S/ 560.00`
pub fn format_currency(amount: Decimal) -> String {
    format!("{} {}", CURRENCY_SYMBOL, format_money(amount))
}

/// [`format_currency`] for amounts that may have overflowed
pub fn format_checked_currency(amount: Option<Decimal>) -> String {
    amount
        .map(format_currency)
        .unwrap_or_else(|| AMOUNT_OUT_OF_RANGE.to_string())
}

/// Parse a guest count or quantity typed into a form control.
///
/// Behaves like `parseInt`: leading whitespace is skipped, the leading run of
/// digits is used and the rest ignored. Empty, non-numeric and negative input
/// all become zero.
pub fn coerce_count(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: u32 = 0;
    let mut seen_digit = false;
    for ch in digits.chars() {
        let Some(digit) = ch.to_digit(10) else { break };
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(digit);
    }

    if negative || !seen_digit {
        0
    } else {
        value
    }
}

/// Count coercion for JSON values (numbers, numeric strings, anything else).
pub fn coerce_count_value(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                u32::try_from(v).unwrap_or(u32::MAX)
            } else if let Some(v) = n.as_f64() {
                if v.is_finite() && v > 0.0 {
                    v.trunc().min(u32::MAX as f64) as u32
                } else {
                    0
                }
            } else {
                0
            }
        }
        Value::String(s) => coerce_count(s),
        _ => 0,
    }
}

/// Parse a money amount typed or sent as text; malformed input is zero.
///
/// A trailing suffix after a valid number is ignored, as `parseFloat` does.
pub fn coerce_amount_str(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if let Some(amount) = parse_decimal(trimmed) {
        return amount;
    }

    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, ch) in trimmed.char_indices() {
        match ch {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + ch.len_utf8();
    }

    if !seen_digit {
        return Decimal::ZERO;
    }
    parse_decimal(trimmed[..end].trim_end_matches('.')).unwrap_or(Decimal::ZERO)
}

/// Money coercion for JSON values (numbers, numeric strings, anything else).
pub fn coerce_amount(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()).unwrap_or(Decimal::ZERO),
        Value::String(s) => coerce_amount_str(s),
        _ => Decimal::ZERO,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Base price of the current selection.
///
/// Exclusive bookings are a flat fee; package bookings charge the package
/// price per child plus [`FIXED_ADULT_PRICE`] per adult. `None` when the
/// amount does not fit in a `Decimal`.
pub fn base_price(selection: &SelectionState, catalog: &PriceCatalog) -> Option<Decimal> {
    let Some(modality) = &selection.modality else {
        return Some(Decimal::ZERO);
    };

    let unit_price = catalog.base_price_of(modality);
    if modality.is_exclusive() {
        Some(unit_price)
    } else {
        let children = Decimal::from(selection.child_count).checked_mul(unit_price)?;
        let adults = Decimal::from(selection.adult_count).checked_mul(FIXED_ADULT_PRICE)?;
        children.checked_add(adults)
    }
}

/// Sum of unit price times quantity over every add-on line
pub fn add_ons_total(ledger: &AddOnLedger) -> Option<Decimal> {
    ledger.total()
}

/// Compute the full price breakdown.
///
/// Returns `None` while the catalog (or its price table) has not arrived, or
/// when the total overflows; callers keep whatever total they were showing.
pub fn compute(
    selection: &SelectionState,
    ledger: &AddOnLedger,
    catalog: Option<&PriceCatalog>,
) -> Option<PricingResult> {
    let catalog = catalog.filter(|c| c.is_loaded())?;

    let totals = base_price(selection, catalog)
        .zip(add_ons_total(ledger))
        .and_then(|(base, add_ons)| base.checked_add(add_ons).map(|grand| (base, add_ons, grand)));
    let Some((base_price, add_ons_total, grand_total)) = totals else {
        warn!("Reservation total out of range, not computed");
        return None;
    };

    Some(PricingResult {
        base_price,
        add_ons_total,
        grand_total,
    })
}
