//! Promotions

use rustc_hash::FxHashSet;
use rusty_money::{Money, MoneyError, iso::Currency};
use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::{
    cart::Cart,
    promotions::{bogo::BogoPromotion, bundle::BundlePromotion},
};

pub mod bogo;
pub mod bundle;

new_key_type! {
    /// Promotion Key
    pub struct PromotionKey;
}

/// Promotion metadata
#[derive(Debug, Default)]
pub struct PromotionMeta {
    /// Promotion name
    pub name: String,
}

/// Promotion enum
///
/// Each variant computes its discount independently over a snapshot of the
/// eligible-unit pool. Eligible-item sets of simultaneously active
/// promotions are expected not to overlap; the engine does not deduplicate
/// units across promotions.
#[derive(Debug, Clone)]
pub enum Promotion<'a> {
    /// Buy-X-get-Y-free promotion
    Bogo(BogoPromotion),

    /// Fixed-price bundle promotion
    Bundle(BundlePromotion<'a>),
}

impl<'a> Promotion<'a> {
    /// Return the promotion key.
    pub fn key(&self) -> PromotionKey {
        match self {
            Promotion::Bogo(bogo) => bogo.key(),
            Promotion::Bundle(bundle) => bundle.key(),
        }
    }

    /// Return the set of item names this promotion applies to.
    pub fn eligible(&self) -> &FxHashSet<String> {
        match self {
            Promotion::Bogo(bogo) => bogo.eligible(),
            Promotion::Bundle(bundle) => bundle.eligible(),
        }
    }

    /// Return whether this promotion _might_ apply to the given cart.
    pub fn is_applicable(&self, cart: &Cart<'_>) -> bool {
        cart.lines()
            .iter()
            .any(|line| self.eligible().contains(line.name()))
    }

    /// Compute this promotion's discount over an eligible-unit pool.
    ///
    /// A pool smaller than the promotion's set or bundle size contributes
    /// zero discount.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] when pool prices and the promotion price
    /// disagree on currency.
    pub fn discount(
        &self,
        pool: SmallVec<[Money<'a, Currency>; 8]>,
        currency: &'a Currency,
    ) -> Result<Money<'a, Currency>, MoneyError> {
        match self {
            Promotion::Bogo(bogo) => bogo.discount(pool, currency),
            Promotion::Bundle(bundle) => bundle.discount(pool, currency),
        }
    }
}

/// Sum a run of unit prices into a single amount.
pub(crate) fn sum_units<'a, I>(
    units: I,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, MoneyError>
where
    I: IntoIterator<Item = Money<'a, Currency>>,
{
    units
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, unit| acc.add(unit))
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};
    use slotmap::SlotMap;
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::cart::Cart;

    use super::*;

    fn eligible(names: &[&str]) -> FxHashSet<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn key_delegates_to_inner_promotion_key() {
        // Generate a non-default promotion key so returning `Default::default()` is detectable.
        let mut keys = SlotMap::<PromotionKey, ()>::with_key();
        let key = keys.insert(());

        let promo = Promotion::Bogo(BogoPromotion::new(key, eligible(&["Shirt"]), 2, 1));

        assert_eq!(promo.key(), key);
        assert_ne!(promo.key(), PromotionKey::default());
    }

    #[test]
    fn key_delegates_to_bundle_promotion() {
        let mut keys = SlotMap::<PromotionKey, ()>::with_key();
        let key = keys.insert(());

        let promo = Promotion::Bundle(BundlePromotion::new(
            key,
            eligible(&["Shirt"]),
            3,
            Money::from_minor(20_00, GBP),
        ));

        assert_eq!(promo.key(), key);
        assert_ne!(promo.key(), PromotionKey::default());
    }

    #[test]
    fn is_applicable_requires_a_matching_line() {
        let mut cart = Cart::new(GBP);
        cart.add("Suit", Money::from_minor(14_50, GBP));

        let promo = Promotion::Bogo(BogoPromotion::new(
            PromotionKey::default(),
            eligible(&["Shirt"]),
            2,
            1,
        ));

        assert!(!promo.is_applicable(&cart));

        cart.add("Shirt", Money::from_minor(3_00, GBP));

        assert!(promo.is_applicable(&cart));
    }

    #[test]
    fn empty_eligible_set_matches_nothing() {
        let mut cart = Cart::new(GBP);
        cart.add("Suit", Money::from_minor(14_50, GBP));

        let promo = Promotion::Bogo(BogoPromotion::new(PromotionKey::default(), eligible(&[]), 1, 1));

        assert!(!promo.is_applicable(&cart));
        assert!(cart.unit_prices_matching(promo.eligible()).is_empty());
    }

    #[test]
    fn sum_units_adds_all_prices() -> TestResult {
        let units: SmallVec<[Money<'_, Currency>; 8]> = smallvec![
            Money::from_minor(1_00, GBP),
            Money::from_minor(2_00, GBP),
            Money::from_minor(3_00, GBP),
        ];

        let total = sum_units(units, GBP)?;

        assert_eq!(total, Money::from_minor(6_00, GBP));

        Ok(())
    }

    #[test]
    fn sum_units_of_nothing_is_zero() -> TestResult {
        let total = sum_units(Vec::new(), GBP)?;

        assert_eq!(total, Money::from_minor(0, GBP));

        Ok(())
    }
}
