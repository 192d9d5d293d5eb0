//! Orders

pub mod models;
pub mod service;

pub use models::{NewOrder, OrderItem, PreferenceSnapshot, readable_order_id};
pub use service::*;
