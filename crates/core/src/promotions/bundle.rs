//! Fixed-price bundle promotions
//!
//! "Any N eligible items for £X" offers. The bundle price is fixed
//! regardless of which eligible units fill it, so the saving shown to the
//! customer is computed against the most expensive units in the pool.

use rustc_hash::FxHashSet;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;

use crate::promotions::{PromotionKey, sum_units};

/// A fixed-price-for-N-units promotion.
#[derive(Debug, Clone)]
pub struct BundlePromotion<'a> {
    key: PromotionKey,
    eligible: FxHashSet<String>,
    bundle_qty: u32,
    bundle_price: Money<'a, Currency>,
}

impl<'a> BundlePromotion<'a> {
    /// Create a new fixed-price bundle promotion.
    pub fn new(
        key: PromotionKey,
        eligible: FxHashSet<String>,
        bundle_qty: u32,
        bundle_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            key,
            eligible,
            bundle_qty,
            bundle_price,
        }
    }

    /// Return the promotion key.
    pub fn key(&self) -> PromotionKey {
        self.key
    }

    /// Return the eligible item names.
    pub fn eligible(&self) -> &FxHashSet<String> {
        &self.eligible
    }

    /// Return the number of units in one bundle.
    pub fn bundle_qty(&self) -> u32 {
        self.bundle_qty
    }

    /// Return the flat price of one bundle.
    pub fn bundle_price(&self) -> &Money<'a, Currency> {
        &self.bundle_price
    }

    /// Compute the discount for a pool of eligible unit prices.
    ///
    /// `num_bundles = pool_len / bundle_qty`; the `num_bundles × bundle_qty`
    /// most expensive units are bundled, and the discount is the amount by
    /// which their standard price exceeds the bundled cost. A bundle that
    /// would cost more than the standard price contributes zero, never a
    /// surcharge.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] when the pool and the bundle price disagree
    /// on currency.
    pub fn discount(
        &self,
        mut pool: SmallVec<[Money<'a, Currency>; 8]>,
        currency: &'a Currency,
    ) -> Result<Money<'a, Currency>, MoneyError> {
        if self.bundle_qty == 0 {
            return Ok(Money::from_minor(0, currency));
        }

        let num_bundles = pool.len() / self.bundle_qty as usize;

        if num_bundles == 0 {
            return Ok(Money::from_minor(0, currency));
        }

        // Most expensive units fill the bundles; the fixed price is the
        // same whichever units are chosen.
        pool.sort_unstable_by(|a, b| b.to_minor_units().cmp(&a.to_minor_units()));

        let bundled_count = num_bundles * self.bundle_qty as usize;
        let standard_price = sum_units(pool.into_iter().take(bundled_count), currency)?;

        let bundle_cost = Money::from_minor(
            self.bundle_price.to_minor_units() * num_bundles as i64,
            self.bundle_price.currency(),
        );

        let saving = standard_price.sub(bundle_cost)?;

        if saving.to_minor_units() > 0 {
            Ok(saving)
        } else {
            Ok(Money::from_minor(0, currency))
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use smallvec::SmallVec;
    use testresult::TestResult;

    use super::*;

    fn eligible(names: &[&str]) -> FxHashSet<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn pool(minor: &[i64]) -> SmallVec<[Money<'static, Currency>; 8]> {
        minor
            .iter()
            .map(|amount| Money::from_minor(*amount, GBP))
            .collect()
    }

    fn promo(bundle_qty: u32, bundle_price_minor: i64) -> BundlePromotion<'static> {
        BundlePromotion::new(
            PromotionKey::default(),
            eligible(&["Shirt", "Trousers", "Tie"]),
            bundle_qty,
            Money::from_minor(bundle_price_minor, GBP),
        )
    }

    #[test]
    fn accessors_return_constructor_values() {
        let promo = promo(3, 20_00);

        assert_eq!(promo.bundle_qty(), 3);
        assert_eq!(promo.bundle_price(), &Money::from_minor(20_00, GBP));
        assert!(promo.eligible().contains("Tie"));
    }

    #[test]
    fn one_bundle_discounts_standard_price_down_to_bundle_price() -> TestResult {
        let discount = promo(3, 20_00).discount(pool(&[10_00, 8_00, 6_00]), GBP)?;

        assert_eq!(discount, Money::from_minor(4_00, GBP));

        Ok(())
    }

    #[test]
    fn bundle_picks_the_most_expensive_units() -> TestResult {
        let discount = promo(2, 15_00).discount(pool(&[10_00, 9_00, 1_00]), GBP)?;

        // Bundled units are 10.00 and 9.00; the 1.00 unit stays at
        // standard price outside the bundle.
        assert_eq!(discount, Money::from_minor(4_00, GBP));

        Ok(())
    }

    #[test]
    fn unprofitable_bundle_contributes_nothing() -> TestResult {
        let discount = promo(3, 20_00).discount(pool(&[5_00, 5_00, 5_00]), GBP)?;

        assert_eq!(discount, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn pool_smaller_than_bundle_contributes_nothing() -> TestResult {
        let discount = promo(3, 20_00).discount(pool(&[10_00, 8_00]), GBP)?;

        assert_eq!(discount, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn two_bundles_accumulate_savings() -> TestResult {
        let discount = promo(2, 10_00).discount(pool(&[8_00, 7_00, 6_00, 5_00]), GBP)?;

        // Bundles cover all four units: standard 26.00 against 20.00 cost.
        assert_eq!(discount, Money::from_minor(6_00, GBP));

        Ok(())
    }
}
