//! Order Models

use jiff::Timestamp;
use rand::Rng;
use rusty_money::{Money, iso::Currency};
use serde::Serialize;

use pressbook::cart::Cart;

/// One cart line as persisted on the order record.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OrderItem {
    pub name: String,

    /// Unit price in pounds, as the back office displays it.
    pub price: String,

    pub quantity: u32,
    pub note: String,
}

/// Standing cleaning preferences snapshotted onto the order for the
/// operations team. All fields are absent for guest checkouts.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PreferenceSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starch: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trouser_crease: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_repairs: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detergent: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_plastic: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recycle_hangers: Option<bool>,
}

/// The order record inserted at the end of a booking.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    /// Short human-readable identifier quoted in confirmations.
    pub readable_id: String,

    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,

    /// Chosen collection slot, or the `anytime` sentinel.
    pub preferred_slot_id: String,

    /// Snapshot of the cart at submission time.
    pub items: Vec<OrderItem>,

    /// Always `"pending"` for a fresh booking.
    pub status: String,

    pub points_earned: u32,

    /// Full prior balance when redeemed on this order, else zero.
    pub points_redeemed: u32,

    /// Promotion plus loyalty discount, in pounds.
    pub discount_amount: f64,

    /// `none`, `weekly` or `2weekly`.
    pub recurring_frequency: String,

    pub marketing_opt_in: bool,
    pub create_account_requested: bool,

    pub preferences: PreferenceSnapshot,

    /// Client-side submission timestamp.
    pub placed_at: Timestamp,
}

/// Snapshot a cart into order items.
pub fn order_items(cart: &Cart<'_>) -> Vec<OrderItem> {
    cart.lines()
        .iter()
        .map(|line| OrderItem {
            name: line.name().to_string(),
            price: pounds_string(line.unit_price()),
            quantity: line.quantity(),
            note: line.note().to_string(),
        })
        .collect()
}

/// Generate a short human-readable order identifier: four characters
/// drawn from `[0-9A-Z]`.
pub fn readable_order_id<R: Rng>(rng: &mut R) -> String {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    (0..4)
        .map(|_| {
            let index = rng.gen_range(0..ALPHABET.len());
            ALPHABET.get(index).map_or('0', |byte| char::from(*byte))
        })
        .collect()
}

/// Render an amount as plain pounds, e.g. `"14.50"`.
pub fn pounds_string(amount: &Money<'_, Currency>) -> String {
    let minor = amount.to_minor_units();
    let sign = if minor < 0 { "-" } else { "" };

    format!("{sign}{}.{:02}", (minor / 100).abs(), (minor % 100).abs())
}

/// Convert an amount to fractional pounds for numeric store columns.
pub fn pounds_value(amount: &Money<'_, Currency>) -> f64 {
    amount.to_minor_units() as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rusty_money::iso::GBP;

    use super::*;

    #[test]
    fn pounds_string_formats_minor_units() {
        assert_eq!(pounds_string(&Money::from_minor(14_50, GBP)), "14.50");
        assert_eq!(pounds_string(&Money::from_minor(5, GBP)), "0.05");
        assert_eq!(pounds_string(&Money::from_minor(0, GBP)), "0.00");
        assert_eq!(pounds_string(&Money::from_minor(-2_50, GBP)), "-2.50");
        assert_eq!(pounds_string(&Money::from_minor(-50, GBP)), "-0.50");
    }

    #[test]
    fn readable_order_id_is_four_uppercase_alphanumerics() {
        let mut rng = StdRng::seed_from_u64(7);

        let id = readable_order_id(&mut rng);

        assert_eq!(id.len(), 4);
        assert!(id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn order_items_snapshot_names_quantities_and_notes() {
        let mut cart = Cart::new(GBP);
        cart.add("Suit", Money::from_minor(14_50, GBP));
        cart.add("Suit", Money::from_minor(14_50, GBP));
        cart.set_note("Suit", "repair pocket lining");

        let items = order_items(&cart);

        assert_eq!(
            items,
            vec![OrderItem {
                name: "Suit".to_string(),
                price: "14.50".to_string(),
                quantity: 2,
                note: "repair pocket lining".to_string(),
            }]
        );
    }
}
