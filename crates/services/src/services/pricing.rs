//! Project-level markup, tax, and fee arithmetic.
//!
//! Everything here is pure and synchronous; the route layer loads the
//! company's `FinancialProfile` and hands the constants in.

use db::models::{
    estimate::{DiscountKind, EstimateTotals},
    financial_profile::FinancialProfile,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use ts_rs::TS;
use utils::format::round_cents;

/// Rate constants for one company, flattened from its financial profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
pub struct PricingConstants {
    pub tax_rate: f64,
    pub profit_margin: f64,
    pub card_fee_rate: f64,
    pub card_fee_fixed: f64,
    pub operating_fees_total: f64,
}

impl PricingConstants {
    /// Load the constants for a company, creating a default profile if none
    /// exists yet.
    pub async fn load(pool: &SqlitePool, company_id: uuid::Uuid) -> Result<Self, sqlx::Error> {
        let profile = FinancialProfile::find_or_create(pool, company_id).await?;
        let operating_fees_total = profile.operating_fees_total(pool).await?;
        Ok(Self {
            tax_rate: profile.tax_rate,
            profit_margin: profile.profit_margin,
            card_fee_rate: profile.card_fee_rate,
            card_fee_fixed: profile.card_fee_fixed,
            operating_fees_total,
        })
    }
}

/// Discount applied to an estimate's subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Discount {
    Percent(f64),
    Fixed(f64),
    None,
}

impl Discount {
    pub fn from_stored(kind: Option<&DiscountKind>, value: f64) -> Self {
        match kind {
            Some(DiscountKind::Percent) => Discount::Percent(value),
            Some(DiscountKind::Fixed) => Discount::Fixed(value),
            None => Discount::None,
        }
    }
}

/// Full cost breakdown for a priced project.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
pub struct PricingBreakdown {
    pub subtotal: f64,
    pub discount_amount: f64,
    pub after_discount: f64,
    pub profit: f64,
    pub with_profit: f64,
    pub tax: f64,
    pub processing_fee: f64,
    pub operating_fees: f64,
    pub grand_total: f64,
}

impl PricingBreakdown {
    pub fn totals(&self) -> EstimateTotals {
        EstimateTotals {
            subtotal: self.subtotal,
            discount_amount: self.discount_amount,
            profit: self.profit,
            tax: self.tax,
            processing_fee: self.processing_fee,
            grand_total: self.grand_total,
        }
    }
}

/// Price a list of line costs under the company's constants.
///
/// The discount is clamped here: a fixed discount larger than the subtotal
/// reduces it to zero, never below.
pub fn price_lines(
    line_costs: &[f64],
    discount: Discount,
    constants: &PricingConstants,
) -> PricingBreakdown {
    let subtotal: f64 = line_costs.iter().sum();

    let discount_amount = match discount {
        Discount::Percent(pct) => subtotal * pct / 100.0,
        Discount::Fixed(amount) => amount.min(subtotal),
        Discount::None => 0.0,
    }
    .max(0.0);

    let after_discount = (subtotal - discount_amount).max(0.0);
    let profit = after_discount * constants.profit_margin;
    let with_profit = after_discount + profit;
    let tax = with_profit * constants.tax_rate;
    let processing_fee = with_profit * constants.card_fee_rate + constants.card_fee_fixed;
    let grand_total = constants.operating_fees_total + processing_fee + with_profit + tax;

    PricingBreakdown {
        subtotal: round_cents(subtotal),
        discount_amount: round_cents(discount_amount),
        after_discount: round_cents(after_discount),
        profit: round_cents(profit),
        with_profit: round_cents(with_profit),
        tax: round_cents(tax),
        processing_fee: round_cents(processing_fee),
        operating_fees: round_cents(constants.operating_fees_total),
        grand_total: round_cents(grand_total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constants() -> PricingConstants {
        PricingConstants {
            tax_rate: 0.0825,
            profit_margin: 0.25,
            card_fee_rate: 0.029,
            card_fee_fixed: 0.30,
            operating_fees_total: 150.0,
        }
    }

    #[test]
    fn percentage_discount_on_thousand() {
        let breakdown = price_lines(&[600.0, 400.0], Discount::Percent(10.0), &constants());
        assert_eq!(breakdown.subtotal, 1000.0);
        assert_eq!(breakdown.discount_amount, 100.0);
        assert_eq!(breakdown.after_discount, 900.0);

        // profit 225, with_profit 1125, tax 92.8125 -> 92.81,
        // fee 1125 * 0.029 + 0.30 = 32.925 -> 32.93
        assert_eq!(breakdown.profit, 225.0);
        assert_eq!(breakdown.with_profit, 1125.0);
        assert_eq!(breakdown.tax, 92.81);
        assert_eq!(breakdown.processing_fee, 32.93);

        // grand total = 150 + 32.925 + 1125 + 92.8125 = 1400.7375 -> 1400.74
        assert_eq!(breakdown.grand_total, 1400.74);
    }

    #[test]
    fn oversized_fixed_discount_clamps_to_zero_total() {
        let breakdown = price_lines(&[200.0], Discount::Fixed(500.0), &constants());
        assert_eq!(breakdown.discount_amount, 200.0);
        assert_eq!(breakdown.after_discount, 0.0);
        assert!(breakdown.discount_amount >= 0.0);
        // Only the flat pieces remain.
        assert_eq!(breakdown.grand_total, 150.0 + 0.30);
    }

    #[test]
    fn negative_percent_contributes_no_discount() {
        let breakdown = price_lines(&[100.0], Discount::Percent(-5.0), &constants());
        assert_eq!(breakdown.discount_amount, 0.0);
        assert_eq!(breakdown.after_discount, 100.0);
    }

    #[test]
    fn no_lines_prices_to_flat_fees() {
        let breakdown = price_lines(&[], Discount::None, &constants());
        assert_eq!(breakdown.subtotal, 0.0);
        assert_eq!(breakdown.grand_total, 150.0 + 0.30);
    }

    #[test]
    fn breakdown_composition_holds() {
        let breakdown = price_lines(&[350.0, 125.5], Discount::Fixed(25.0), &constants());
        let recomposed = breakdown.operating_fees
            + breakdown.processing_fee
            + breakdown.with_profit
            + breakdown.tax;
        assert!((recomposed - breakdown.grand_total).abs() < 0.02);
    }
}
