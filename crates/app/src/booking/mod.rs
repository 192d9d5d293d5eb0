//! Booking flow

pub mod errors;
pub mod session;
pub mod workflow;

pub use errors::BookingError;
pub use session::{BookingSession, BookingStep, CustomerDetails, Recurrence};
pub use workflow::{BookingWorkflow, SubmittedOrder};
