//! Pressbook prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartLine},
    loyalty::{LoyaltyScheme, LoyaltyState},
    pricing::{PriceBreakdown, PricingError, price},
    promotions::{
        Promotion, PromotionKey, PromotionMeta, bogo::BogoPromotion, bundle::BundlePromotion,
    },
    receipt::Receipt,
};
