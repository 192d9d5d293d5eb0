//! Catalog

pub mod models;
pub mod service;

pub use models::{CategoryRecord, CollectionSlot, PromotionRecord, ServiceRecord};
pub use service::*;
