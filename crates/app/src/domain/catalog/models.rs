//! Catalog Models

use rustc_hash::FxHashSet;
use rusty_money::{Money, iso};
use serde::Deserialize;
use slotmap::SlotMap;

use pressbook::promotions::{
    Promotion, PromotionKey, PromotionMeta, bogo::BogoPromotion, bundle::BundlePromotion,
};

/// A service category row, e.g. "Shirts" or "Bedding".
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRecord {
    /// Display name, unique per store.
    pub name: String,

    /// Position in the storefront listing.
    #[serde(default)]
    pub sort_order: i32,
}

/// A bookable service row.
///
/// Prices are stored as free-text in the remote schema; [`ServiceRecord::unit_price`]
/// parses them defensively.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceRecord {
    /// Service name, the key cart lines are built from.
    pub name: String,

    /// Name of the category this service is listed under.
    pub category: String,

    /// Unit price as entered in the back office.
    #[serde(default)]
    pub price: Option<String>,
}

impl ServiceRecord {
    /// Parse the stored price into money.
    ///
    /// A missing or unparseable price maps to zero pence rather than an
    /// error; pricing is never blocked by bad back-office data.
    pub fn unit_price(&self) -> Money<'static, iso::Currency> {
        let Some(raw) = self.price.as_deref() else {
            return Money::from_minor(0, iso::GBP);
        };

        match Money::from_str(raw.trim(), iso::GBP) {
            Ok(price) => price,
            Err(_err) => {
                tracing::warn!(service = %self.name, price = raw, "unparseable service price, using zero");
                Money::from_minor(0, iso::GBP)
            }
        }
    }
}

/// An active promotion row.
#[derive(Debug, Clone, Deserialize)]
pub struct PromotionRecord {
    /// Promotion display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Promotion kind: `"bogo"` or `"bundle"`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Names of the services this promotion applies to.
    #[serde(default)]
    pub included_items: Vec<String>,

    /// Paid units per set (`bogo` only).
    #[serde(default)]
    pub buy_qty: Option<u32>,

    /// Free units per completed set (`bogo` only).
    #[serde(default)]
    pub get_qty: Option<u32>,

    /// Units per bundle (`bundle` only).
    #[serde(default)]
    pub bundle_qty: Option<u32>,

    /// Flat bundle price in pounds (`bundle` only).
    #[serde(default)]
    pub bundle_price: Option<f64>,
}

/// A bookable collection window.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSlot {
    /// Slot identifier referenced by orders.
    pub id: String,

    /// Day of the week the driver calls.
    pub day: String,

    /// Human-readable time window, e.g. "9am - 12pm".
    pub label: String,

    /// Whether the slot is currently offered.
    #[serde(default)]
    pub active: bool,
}

/// Sentinel slot id for a flexible "any time" collection.
pub const ANYTIME_SLOT_ID: &str = "anytime";

/// Map promotion rows into engine promotions, allocating keys as we go.
///
/// Rows with an unrecognised kind are skipped with a warning; the engine
/// only ever sees promotions it knows how to apply.
pub fn promotions_from_records(
    records: Vec<PromotionRecord>,
) -> (SlotMap<PromotionKey, PromotionMeta>, Vec<Promotion<'static>>) {
    let mut meta = SlotMap::with_key();
    let mut promotions = Vec::with_capacity(records.len());

    for record in records {
        let eligible: FxHashSet<String> = record.included_items.iter().cloned().collect();
        let key = meta.insert(PromotionMeta {
            name: record.name.clone().unwrap_or_default(),
        });

        match record.kind.as_str() {
            "bogo" => {
                promotions.push(Promotion::Bogo(BogoPromotion::new(
                    key,
                    eligible,
                    record.buy_qty.unwrap_or(1),
                    record.get_qty.unwrap_or(1),
                )));
            }
            "bundle" => {
                promotions.push(Promotion::Bundle(BundlePromotion::new(
                    key,
                    eligible,
                    record.bundle_qty.unwrap_or(1),
                    Money::from_minor(pounds_to_minor(record.bundle_price.unwrap_or(0.0)), iso::GBP),
                )));
            }
            other => {
                tracing::warn!(kind = other, "skipping promotion with unknown type");
                meta.remove(key);
            }
        }
    }

    (meta, promotions)
}

fn pounds_to_minor(pounds: f64) -> i64 {
    (pounds * 100.0).round() as i64
}
