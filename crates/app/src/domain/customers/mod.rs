//! Customers

pub mod models;
pub mod service;

pub use models::{CustomerUpsert, credential_digest};
pub use service::*;
