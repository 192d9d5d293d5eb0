//! Loyalty

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// A customer's loyalty position for one pricing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoyaltyState {
    /// Points balance fetched at session start.
    pub balance: u32,

    /// Whether the customer asked to redeem the balance on this order.
    pub redeem: bool,
}

impl LoyaltyState {
    /// Create a new loyalty state.
    pub fn new(balance: u32, redeem: bool) -> Self {
        Self { balance, redeem }
    }
}

/// Loyalty scheme constants.
///
/// Carried with the catalog snapshot passed into the pricing engine so they
/// can vary per run; the engine itself holds no scheme literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyScheme {
    /// Points earned per whole pound of the final total.
    pub points_per_pound: u32,

    /// Value of a single point, in pence.
    pub point_value_pence: u32,

    /// Minimum balance required before redemption is allowed.
    pub min_redemption: u32,
}

impl Default for LoyaltyScheme {
    fn default() -> Self {
        Self {
            points_per_pound: 1,
            point_value_pence: 5,
            min_redemption: 100,
        }
    }
}

impl LoyaltyScheme {
    /// The monetary value of a redemption, in minor units.
    ///
    /// Zero unless the customer asked to redeem and holds at least
    /// [`LoyaltyScheme::min_redemption`] points. Uncapped; the pricing
    /// engine caps the value at the amount still owed.
    pub fn redemption_value(&self, state: LoyaltyState) -> i64 {
        if state.redeem && state.balance >= self.min_redemption {
            i64::from(state.balance) * i64::from(self.point_value_pence)
        } else {
            0
        }
    }

    /// Points earned on a final total: `floor(total_in_pounds × points_per_pound)`.
    ///
    /// Never negative; a zero or negative total earns nothing.
    pub fn points_earned(&self, final_total: &Money<'_, Currency>) -> u32 {
        let scaled = final_total.to_minor_units() * i64::from(self.points_per_pound);

        u32::try_from(scaled.div_euclid(100)).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;

    use super::*;

    #[test]
    fn default_scheme_matches_storefront_constants() {
        let scheme = LoyaltyScheme::default();

        assert_eq!(scheme.points_per_pound, 1);
        assert_eq!(scheme.point_value_pence, 5);
        assert_eq!(scheme.min_redemption, 100);
    }

    #[test]
    fn redemption_value_is_zero_without_redeem_flag() {
        let scheme = LoyaltyScheme::default();

        assert_eq!(scheme.redemption_value(LoyaltyState::new(200, false)), 0);
    }

    #[test]
    fn redemption_value_is_zero_below_minimum_balance() {
        let scheme = LoyaltyScheme::default();

        assert_eq!(scheme.redemption_value(LoyaltyState::new(99, true)), 0);
    }

    #[test]
    fn redemption_value_is_balance_times_point_value() {
        let scheme = LoyaltyScheme::default();

        // 200 points at 5p each.
        assert_eq!(scheme.redemption_value(LoyaltyState::new(200, true)), 10_00);
    }

    #[test]
    fn points_earned_floors_partial_pounds() {
        let scheme = LoyaltyScheme::default();

        assert_eq!(scheme.points_earned(&Money::from_minor(14_50, GBP)), 14);
        assert_eq!(scheme.points_earned(&Money::from_minor(99, GBP)), 0);
    }

    #[test]
    fn points_earned_scales_before_flooring() {
        let scheme = LoyaltyScheme {
            points_per_pound: 3,
            ..LoyaltyScheme::default()
        };

        // floor(14.50 × 3) = 43, not floor(14.50) × 3 = 42.
        assert_eq!(scheme.points_earned(&Money::from_minor(14_50, GBP)), 43);
    }

    #[test]
    fn points_earned_is_zero_for_zero_or_negative_totals() {
        let scheme = LoyaltyScheme::default();

        assert_eq!(scheme.points_earned(&Money::from_minor(0, GBP)), 0);
        assert_eq!(scheme.points_earned(&Money::from_minor(-5_00, GBP)), 0);
    }
}
