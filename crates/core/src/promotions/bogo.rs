//! Buy-X-get-Y-free promotions
//!
//! Classic multibuy offers: 2-for-1, buy two get one free, and similar.
//! The discount is computed per completed set of `buy_qty + get_qty`
//! eligible units, and the store always gives away the cheapest units in
//! the pool.

use rustc_hash::FxHashSet;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;

use crate::promotions::{PromotionKey, sum_units};

/// A buy-X-get-Y-free promotion.
#[derive(Debug, Clone)]
pub struct BogoPromotion {
    key: PromotionKey,
    eligible: FxHashSet<String>,
    buy_qty: u32,
    get_qty: u32,
}

impl BogoPromotion {
    /// Create a new buy-X-get-Y-free promotion.
    pub fn new(
        key: PromotionKey,
        eligible: FxHashSet<String>,
        buy_qty: u32,
        get_qty: u32,
    ) -> Self {
        Self {
            key,
            eligible,
            buy_qty,
            get_qty,
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

    /// Return the number of units that must be paid for per set.
    pub fn buy_qty(&self) -> u32 {
        self.buy_qty
    }

    /// Return the number of free units per completed set.
    pub fn get_qty(&self) -> u32 {
        self.get_qty
    }

    /// Compute the discount for a pool of eligible unit prices.
    ///
    /// `num_sets = pool_len / (buy_qty + get_qty)`; the `num_sets × get_qty`
    /// cheapest units in the pool are free. An incomplete set contributes
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] when the pool mixes currencies.
    pub fn discount<'a>(
        &self,
        mut pool: SmallVec<[Money<'a, Currency>; 8]>,
        currency: &'a Currency,
    ) -> Result<Money<'a, Currency>, MoneyError> {
        let set_size = self.buy_qty.saturating_add(self.get_qty);

        if set_size == 0 {
            return Ok(Money::from_minor(0, currency));
        }

        let num_sets = pool.len() / set_size as usize;

        if num_sets == 0 {
            return Ok(Money::from_minor(0, currency));
        }

        // Cheapest units go free, never the most expensive ones.
        pool.sort_unstable_by_key(|unit| unit.to_minor_units());

        let free_count = num_sets * self.get_qty as usize;

        sum_units(pool.into_iter().take(free_count), currency)
    }
}
