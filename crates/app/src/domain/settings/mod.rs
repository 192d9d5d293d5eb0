//! App Settings

pub mod service;

pub use service::*;
