//! Cart

use rustc_hash::FxHashSet;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;

/// A single selected service line.
///
/// Lines are keyed by service name: a cart never holds two lines with the
/// same name.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    name: String,
    unit_price: Money<'a, Currency>,
    quantity: u32,
    note: String,
}

impl<'a> CartLine<'a> {
    /// Returns the service name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the price of a single unit.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Returns the selected quantity. Always at least 1.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the garment-care note attached to this line.
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Returns the price of the line, `unit_price × quantity`.
    pub fn line_total(&self) -> Money<'a, Currency> {
        Money::from_minor(
            self.unit_price.to_minor_units() * i64::from(self.quantity),
            self.unit_price.currency(),
        )
    }
}

/// A mutable set of selected service lines.
///
/// All operations are synchronous and mutate only the cart itself.
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    lines: Vec<CartLine<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create a new, empty cart in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Add one unit of the named service.
    ///
    /// If a line with the same name already exists its quantity is
    /// incremented and `unit_price` is ignored; otherwise a new line with
    /// quantity 1 and an empty note is appended.
    pub fn add(&mut self, name: &str, unit_price: Money<'a, Currency>) {
        if let Some(line) = self.lines.iter_mut().find(|line| line.name == name) {
            line.quantity += 1;
        } else {
            self.lines.push(CartLine {
                name: name.to_string(),
                unit_price,
                quantity: 1,
                note: String::new(),
            });
        }
    }

    /// Adjust the quantity of the named line by `delta`.
    ///
    /// The line is removed when the resulting quantity would be zero or
    /// negative; a quantity-0 line is never kept. Unknown names are a no-op.
    pub fn adjust_quantity(&mut self, name: &str, delta: i32) {
        let Some(index) = self.lines.iter().position(|line| line.name == name) else {
            return;
        };

        let Some(line) = self.lines.get_mut(index) else {
            return;
        };

        let adjusted = i64::from(line.quantity) + i64::from(delta);

        if adjusted <= 0 {
            self.lines.remove(index);
        } else if let Ok(quantity) = u32::try_from(adjusted) {
            line.quantity = quantity;
        }
    }

    /// Replace the note on the named line. Unknown names are a no-op.
    pub fn set_note(&mut self, name: &str, note: &str) {
        if let Some(line) = self.lines.iter_mut().find(|line| line.name == name) {
            line.note = note.to_string();
        }
    }

    /// Remove the named line unconditionally.
    pub fn remove(&mut self, name: &str) {
        self.lines.retain(|line| line.name != name);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Returns the cart lines in insertion order.
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Calculate the subtotal of the cart, `Σ unit_price × quantity`.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] when a line's currency differs from the
    /// cart currency.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.lines
            .iter()
            .try_fold(Money::from_minor(0, self.currency), |acc, line| {
                acc.add(line.line_total())
            })
    }

    /// Expand the cart to unit granularity, filtered to the given names.
    ///
    /// For every line whose name is in `names`, `quantity` copies of its
    /// unit price are pushed into the returned pool.
    pub fn unit_prices_matching(
        &self,
        names: &FxHashSet<String>,
    ) -> SmallVec<[Money<'a, Currency>; 8]> {
        let mut pool = SmallVec::new();

        for line in self.lines.iter().filter(|line| names.contains(line.name())) {
            for _ in 0..line.quantity {
                pool.push(line.unit_price);
            }
        }

        pool
    }
}
