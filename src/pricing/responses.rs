//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{format_currency, round_display};
use super::models::PricingResult;

const CURRENCY: &str = "PEN";

/// Money value for JSON responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
    /// `S/ x.xx`, as the form shows it
    pub display: String,
}

impl From<Decimal> for MoneyResponse {
    fn from(amount: Decimal) -> Self {
        Self {
            amount: round_display(amount),
            currency: CURRENCY.to_string(),
            display: format_currency(amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricingResponse {
    pub base_price: MoneyResponse,
    pub add_ons_total: MoneyResponse,
    pub grand_total: MoneyResponse,
}

impl From<PricingResult> for PricingResponse {
    fn from(result: PricingResult) -> Self {
        Self {
            base_price: result.base_price.into(),
            add_ons_total: result.add_ons_total.into(),
            grand_total: result.grand_total.into(),
        }
    }
}

/// `pricing` is absent while no catalog could be loaded
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub catalog_loaded: bool,
    pub pricing: Option<PricingResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_response_uses_display_rounding() {
        let money = MoneyResponse::from(dec!(0.125));
        assert_eq!(money.amount, dec!(0.13));
        assert_eq!(money.display, "S/ 0.13");
        assert_eq!(money.currency, "PEN");

        let json = serde_json::to_value(&money).unwrap();
        assert_eq!(json["amount"], "0.13");

        let json = serde_json::to_value(MoneyResponse::from(dec!(560))).unwrap();
        assert_eq!(json["amount"], "560.00");
    }

    #[test]
    fn test_money_response_matches_display_text() {
        for amount in [dec!(2.675), dec!(-1.005), dec!(1234.5)] {
            let money = MoneyResponse::from(amount);
            assert_eq!(money.display, format!("S/ {}", money.amount));
        }
    }
}
