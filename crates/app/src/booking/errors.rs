//! Booking workflow errors.

use thiserror::Error;

use pressbook::pricing::PricingError;

use crate::{booking::session::BookingStep, store::StoreError};

/// Errors raised by booking transitions and submission.
///
/// Validation variants are raised at transition guards, never reach a
/// collaborator, and leave the session exactly where it was.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Advancing past selection requires at least one cart line.
    #[error("the cart is empty")]
    EmptyCart,

    /// Advancing past slot selection requires a chosen slot.
    #[error("no collection slot selected")]
    NoSlotSelected,

    /// A required contact field is blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Inline account creation was requested without a password.
    #[error("a password is required to create an account")]
    PasswordRequired,

    /// The requested operation is not allowed in the current step.
    #[error("not allowed in the {0} step")]
    WrongStep(BookingStep),

    /// The order could not be priced.
    #[error("failed to price the order")]
    Pricing(#[from] PricingError),

    /// The order record could not be written.
    #[error("failed to save the order")]
    Order(#[source] StoreError),

    /// The customer record could not be updated after the order was
    /// written. The order stands; the loyalty balance was not updated.
    #[error("failed to update the customer record")]
    Customer(#[source] StoreError),
}
