// ── Pricing calculator ──
//
//   tax_amount   = (price + platform_fee) * tax_rate
//   total_amount = price + platform_fee + tax_amount
//
// Amounts are kept at two decimal places, rounding half away from zero.
// The total is computed once, when the enrollment is created.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::GuardConfig;
use crate::model::PaymentStatus;

const CURRENCY_SCALE: u32 = 2;

/// Round to cents and pin the scale so `229.9` prints as `229.90`.
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_SCALE);
    rounded
}

/// What an enrollment costs, line by line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base_price: Decimal,
    pub platform_fee: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

/// Derives payable totals from a course price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingCalculator {
    platform_fee: Decimal,
    tax_rate: Decimal,
}

impl PricingCalculator {
    pub fn new(platform_fee: Decimal, tax_rate: Decimal) -> Self {
        Self {
            platform_fee,
            tax_rate,
        }
    }

    pub fn from_config(config: &GuardConfig) -> Self {
        Self::new(config.platform_fee, config.tax_rate)
    }

    pub fn platform_fee(&self) -> Decimal {
        self.platform_fee
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    pub fn quote(&self, price: Decimal) -> PriceBreakdown {
        let base_price = round_currency(price);
        let platform_fee = round_currency(self.platform_fee);
        let subtotal = base_price + platform_fee;
        let tax_amount = round_currency(subtotal * self.tax_rate);
        PriceBreakdown {
            base_price,
            platform_fee,
            tax_amount,
            total_amount: round_currency(subtotal + tax_amount),
        }
    }
}

impl Default for PricingCalculator {
    fn default() -> Self {
        Self::from_config(&GuardConfig::default())
    }
}

/// A paid enrollment with no recorded amount is assumed paid in full.
pub fn settle_amount_paid(
    status: PaymentStatus,
    amount_paid: Option<Decimal>,
    total_amount: Decimal,
) -> Option<Decimal> {
    match (status, amount_paid) {
        (PaymentStatus::Paid, None) => Some(total_amount),
        (_, amount) => amount,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn reference_quote() {
        let quote = PricingCalculator::default().quote(d("199.00"));
        assert_eq!(quote.platform_fee, d("10.00"));
        assert_eq!(quote.tax_amount, d("20.90"));
        assert_eq!(quote.total_amount, d("229.90"));
        assert_eq!(quote.total_amount.to_string(), "229.90");
    }

    #[test]
    fn total_matches_single_rounding_of_ten_percent_uplift() {
        let calc = PricingCalculator::default();
        for price in ["0", "0.01", "0.05", "19.99", "49.95", "99.5", "149.99", "1234.56"] {
            let price = d(price);
            let expected = round_currency((price + d("10.00")) * d("1.10"));
            assert_eq!(calc.quote(price).total_amount, expected, "price {price}");
        }
    }

    #[test]
    fn half_cent_rounds_away_from_zero() {
        // (0.05 + 10.00) * 0.10 = 1.005
        let quote = PricingCalculator::default().quote(d("0.05"));
        assert_eq!(quote.tax_amount, d("1.01"));
        assert_eq!(quote.total_amount, d("11.06"));
    }

    #[test]
    fn custom_fee_and_rate() {
        let calc = PricingCalculator::new(d("0"), d("0.16"));
        let quote = calc.quote(d("100"));
        assert_eq!(quote.tax_amount, d("16.00"));
        assert_eq!(quote.total_amount, d("116.00"));
    }

    #[test]
    fn settle_only_fills_missing_paid_amount() {
        let total = d("229.90");
        assert_eq!(settle_amount_paid(PaymentStatus::Paid, None, total), Some(total));
        assert_eq!(
            settle_amount_paid(PaymentStatus::Paid, Some(d("5")), total),
            Some(d("5"))
        );
        assert_eq!(settle_amount_paid(PaymentStatus::Pending, None, total), None);
        assert_eq!(settle_amount_paid(PaymentStatus::Refunded, None, total), None);
    }
}
