//! Pricing

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    cart::Cart,
    loyalty::{LoyaltyScheme, LoyaltyState},
    promotions::Promotion,
};

/// Errors that can occur while computing a price breakdown.
///
/// With a single-currency cart and catalog these are unreachable; pricing a
/// well-formed booking session never fails.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// The output of one pricing run. Not persisted anywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown<'a> {
    /// `Σ unit_price × quantity` across cart lines.
    pub subtotal: Money<'a, Currency>,

    /// Sum of per-promotion discounts, each computed independently
    /// against the full cart.
    pub promotion_discount: Money<'a, Currency>,

    /// Value of redeemed points, capped at the amount owed after
    /// promotions.
    pub loyalty_discount: Money<'a, Currency>,

    /// `subtotal − promotion_discount − loyalty_discount`. Not clamped at
    /// zero.
    pub final_total: Money<'a, Currency>,

    /// Points the order will earn once completed.
    pub points_earned: u32,
}

/// Compute the price breakdown for a cart.
///
/// Pure and deterministic: no I/O, no hidden state, and identical inputs
/// always produce identical output. The caller supplies a snapshot of the
/// active promotions and the loyalty scheme; inactive promotions must
/// already have been filtered out.
///
/// An empty cart prices to all-zero fields.
///
/// # Errors
///
/// Returns a [`PricingError`] when money arithmetic fails, which requires a
/// currency mismatch between the cart and a promotion.
pub fn price<'a>(
    cart: &Cart<'a>,
    promotions: &[Promotion<'a>],
    loyalty: LoyaltyState,
    scheme: &LoyaltyScheme,
) -> Result<PriceBreakdown<'a>, PricingError> {
    let currency = cart.currency();
    let zero = Money::from_minor(0, currency);

    let subtotal = cart.subtotal()?;

    let promotion_discount = promotions.iter().try_fold(zero, |acc, promotion| {
        let pool = cart.unit_prices_matching(promotion.eligible());

        acc.add(promotion.discount(pool, currency)?)
    })?;

    let after_promotions = subtotal.sub(promotion_discount)?;

    let redemption = scheme.redemption_value(loyalty);
    let loyalty_discount = if redemption > 0 {
        Money::from_minor(redemption.min(after_promotions.to_minor_units()), currency)
    } else {
        zero
    };

    let final_total = after_promotions.sub(loyalty_discount)?;

    Ok(PriceBreakdown {
        subtotal,
        promotion_discount,
        loyalty_discount,
        final_total,
        points_earned: scheme.points_earned(&final_total),
    })
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashSet;
    use rusty_money::iso::GBP;
    use slotmap::SlotMap;
    use testresult::TestResult;

    use crate::promotions::{PromotionKey, bogo::BogoPromotion, bundle::BundlePromotion};

    use super::*;

    fn eligible(names: &[&str]) -> FxHashSet<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn key() -> PromotionKey {
        let mut keys = SlotMap::<PromotionKey, ()>::with_key();
        keys.insert(())
    }

    #[test]
    fn empty_cart_prices_to_zero() -> TestResult {
        let cart = Cart::new(GBP);

        let breakdown = price(&cart, &[], LoyaltyState::default(), &LoyaltyScheme::default())?;

        assert_eq!(breakdown.subtotal, Money::from_minor(0, GBP));
        assert_eq!(breakdown.promotion_discount, Money::from_minor(0, GBP));
        assert_eq!(breakdown.loyalty_discount, Money::from_minor(0, GBP));
        assert_eq!(breakdown.final_total, Money::from_minor(0, GBP));
        assert_eq!(breakdown.points_earned, 0);

        Ok(())
    }

    #[test]
    fn no_promotions_no_loyalty_passes_subtotal_through() -> TestResult {
        let mut cart = Cart::new(GBP);
        cart.add("Suit", Money::from_minor(14_50, GBP));

        let breakdown = price(&cart, &[], LoyaltyState::default(), &LoyaltyScheme::default())?;

        assert_eq!(breakdown.subtotal, Money::from_minor(14_50, GBP));
        assert_eq!(breakdown.final_total, Money::from_minor(14_50, GBP));
        assert_eq!(breakdown.points_earned, 14);

        Ok(())
    }

    #[test]
    fn bogo_promotion_frees_cheapest_eligible_unit() -> TestResult {
        let mut cart = Cart::new(GBP);
        cart.add("Shirt", Money::from_minor(10_00, GBP));
        cart.add("Shirt", Money::from_minor(10_00, GBP));
        cart.add("Blouse", Money::from_minor(5_00, GBP));

        let promotions = [Promotion::Bogo(BogoPromotion::new(
            key(),
            eligible(&["Shirt", "Blouse"]),
            2,
            1,
        ))];

        let breakdown = price(
            &cart,
            &promotions,
            LoyaltyState::default(),
            &LoyaltyScheme::default(),
        )?;

        assert_eq!(breakdown.promotion_discount, Money::from_minor(5_00, GBP));
        assert_eq!(breakdown.final_total, Money::from_minor(20_00, GBP));

        Ok(())
    }

    #[test]
    fn overlapping_promotions_each_count_the_full_pool() -> TestResult {
        let mut cart = Cart::new(GBP);
        cart.add("Shirt", Money::from_minor(6_00, GBP));
        cart.add("Shirt", Money::from_minor(6_00, GBP));

        // Both promotions claim the same two units; each prices against
        // the full pool and the discounts accumulate.
        let promotions = [
            Promotion::Bogo(BogoPromotion::new(key(), eligible(&["Shirt"]), 1, 1)),
            Promotion::Bundle(BundlePromotion::new(
                key(),
                eligible(&["Shirt"]),
                2,
                Money::from_minor(10_00, GBP),
            )),
        ];

        let breakdown = price(
            &cart,
            &promotions,
            LoyaltyState::default(),
            &LoyaltyScheme::default(),
        )?;

        // BOGO frees one 6.00 unit; the bundle saves a further 2.00.
        assert_eq!(breakdown.promotion_discount, Money::from_minor(8_00, GBP));

        Ok(())
    }

    #[test]
    fn loyalty_discount_is_capped_at_amount_owed() -> TestResult {
        let mut cart = Cart::new(GBP);
        cart.add("Shirt", Money::from_minor(5_00, GBP));

        let breakdown = price(
            &cart,
            &[],
            LoyaltyState::new(200, true),
            &LoyaltyScheme::default(),
        )?;

        // 200 points are worth 10.00 but only 5.00 is owed.
        assert_eq!(breakdown.loyalty_discount, Money::from_minor(5_00, GBP));
        assert_eq!(breakdown.final_total, Money::from_minor(0, GBP));
        assert_eq!(breakdown.points_earned, 0);

        Ok(())
    }

    #[test]
    fn loyalty_below_minimum_is_not_redeemed() -> TestResult {
        let mut cart = Cart::new(GBP);
        cart.add("Shirt", Money::from_minor(5_00, GBP));

        let breakdown = price(
            &cart,
            &[],
            LoyaltyState::new(99, true),
            &LoyaltyScheme::default(),
        )?;

        assert_eq!(breakdown.loyalty_discount, Money::from_minor(0, GBP));
        assert_eq!(breakdown.final_total, Money::from_minor(5_00, GBP));

        Ok(())
    }

    #[test]
    fn identical_inputs_price_identically() -> TestResult {
        let mut cart = Cart::new(GBP);
        cart.add("Shirt", Money::from_minor(10_00, GBP));
        cart.add("Shirt", Money::from_minor(10_00, GBP));
        cart.add("Shirt", Money::from_minor(10_00, GBP));

        let promotions = [Promotion::Bogo(BogoPromotion::new(
            key(),
            eligible(&["Shirt"]),
            2,
            1,
        ))];
        let loyalty = LoyaltyState::new(150, true);
        let scheme = LoyaltyScheme::default();

        let first = price(&cart, &promotions, loyalty, &scheme)?;
        let second = price(&cart, &promotions, loyalty, &scheme)?;

        assert_eq!(first, second);

        Ok(())
    }

    #[test]
    fn negative_unit_prices_pass_through_arithmetically() -> TestResult {
        let mut cart = Cart::new(GBP);
        cart.add("Adjustment", Money::from_minor(-2_00, GBP));

        let breakdown = price(&cart, &[], LoyaltyState::default(), &LoyaltyScheme::default())?;

        assert_eq!(breakdown.final_total, Money::from_minor(-2_00, GBP));
        assert_eq!(breakdown.points_earned, 0);

        Ok(())
    }
}
