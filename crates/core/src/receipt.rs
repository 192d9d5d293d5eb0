//! Receipt

use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::{cart::Cart, pricing::PriceBreakdown};

/// A plain-text order summary for one priced cart.
///
/// Captures the cart lines alongside the breakdown so the summary stays
/// stable even if the cart is mutated afterwards.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    lines: Vec<ReceiptLine<'a>>,
    breakdown: PriceBreakdown<'a>,
}

#[derive(Debug, Clone)]
struct ReceiptLine<'a> {
    name: String,
    quantity: u32,
    line_total: Money<'a, Currency>,
}

impl<'a> Receipt<'a> {
    /// Create a new receipt from a cart and its breakdown.
    pub fn new(cart: &Cart<'a>, breakdown: PriceBreakdown<'a>) -> Self {
        let lines = cart
            .lines()
            .iter()
            .map(|line| ReceiptLine {
                name: line.name().to_string(),
                quantity: line.quantity(),
                line_total: line.line_total(),
            })
            .collect();

        Self { lines, breakdown }
    }

    /// The breakdown this receipt was built from.
    pub fn breakdown(&self) -> &PriceBreakdown<'a> {
        &self.breakdown
    }

    /// Calculate the total saving across promotions and loyalty redemption.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the addition fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.breakdown
            .promotion_discount
            .add(self.breakdown.loyalty_discount)
    }

    /// Render the receipt as a plain-text table.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the savings calculation fails.
    pub fn render(&self) -> Result<String, MoneyError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Price"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone(),
                line.quantity.to_string(),
                line.line_total.to_string(),
            ]);
        }

        builder.push_record([
            "Subtotal".to_string(),
            String::new(),
            self.breakdown.subtotal.to_string(),
        ]);

        builder.push_record([
            "Savings".to_string(),
            String::new(),
            self.savings()?.to_string(),
        ]);

        builder.push_record([
            "Total".to_string(),
            String::new(),
            self.breakdown.final_total.to_string(),
        ]);

        builder.push_record([
            "Points earned".to_string(),
            String::new(),
            self.breakdown.points_earned.to_string(),
        ]);

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..3), Alignment::right());

        Ok(table.to_string())
    }
}
