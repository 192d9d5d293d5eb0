//! Booking session state.

use rusty_money::iso::Currency;
use zeroize::Zeroizing;

use pressbook::{cart::Cart, loyalty::LoyaltyState};

/// The step a booking session is on.
///
/// State transitions:
/// ```text
/// Selection ◄──► SlotPicked ◄──► DetailsEntered ──► Submitting ──┬──► Done
///                                      ▲                         │
///                                      └───────── Failed ◄───────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BookingStep {
    /// Items are being selected; the cart is editable.
    #[default]
    Selection,

    /// A collection slot is being chosen.
    SlotPicked,

    /// Contact details are being entered.
    DetailsEntered,

    /// The commit sequence is running; nothing is editable.
    Submitting,

    /// The order was persisted (terminal state).
    Done,

    /// The commit sequence failed; details are preserved for a retry.
    Failed,
}

impl BookingStep {
    /// Returns true if cart lines can be modified in this step.
    pub fn can_modify_items(&self) -> bool {
        matches!(self, BookingStep::Selection)
    }

    /// Returns true if a collection slot can be chosen in this step.
    pub fn can_pick_slot(&self) -> bool {
        matches!(self, BookingStep::SlotPicked)
    }

    /// Returns true if contact details can be edited in this step.
    pub fn can_edit_details(&self) -> bool {
        matches!(self, BookingStep::DetailsEntered | BookingStep::Failed)
    }

    /// Returns true if the order can be submitted from this step.
    pub fn can_submit(&self) -> bool {
        matches!(self, BookingStep::DetailsEntered | BookingStep::Failed)
    }

    /// Returns true if this is a terminal step.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStep::Done)
    }

    /// Returns the step name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStep::Selection => "Selection",
            BookingStep::SlotPicked => "SlotPicked",
            BookingStep::DetailsEntered => "DetailsEntered",
            BookingStep::Submitting => "Submitting",
            BookingStep::Done => "Done",
            BookingStep::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for BookingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How often the collection should repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recurrence {
    /// One-off collection.
    #[default]
    None,

    /// Every week, same slot.
    Weekly,

    /// Every two weeks, same slot.
    Biweekly,
}

impl Recurrence {
    /// The value persisted on order records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Weekly => "weekly",
            Recurrence::Biweekly => "2weekly",
        }
    }
}

/// Contact details entered during checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub notes: String,
}

/// One checkout attempt's worth of state.
///
/// Owned exclusively by the active booking flow; nothing else mutates it.
#[derive(Debug)]
pub struct BookingSession {
    pub(crate) step: BookingStep,
    pub(crate) cart: Cart<'static>,
    pub(crate) slot_id: Option<String>,
    pub(crate) details: CustomerDetails,
    pub(crate) recurring: Recurrence,
    pub(crate) redeem: bool,
    pub(crate) marketing_opt_in: bool,
    pub(crate) account_password: Option<Zeroizing<String>>,
    pub(crate) loyalty_balance: u32,
}

impl BookingSession {
    /// Create a fresh session at the selection step.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            step: BookingStep::default(),
            cart: Cart::new(currency),
            slot_id: None,
            details: CustomerDetails::default(),
            recurring: Recurrence::default(),
            redeem: false,
            marketing_opt_in: false,
            account_password: None,
            loyalty_balance: 0,
        }
    }

    /// The step this session is on.
    pub fn step(&self) -> BookingStep {
        self.step
    }

    /// The session's cart.
    pub fn cart(&self) -> &Cart<'static> {
        &self.cart
    }

    /// The chosen collection slot, if any.
    pub fn slot_id(&self) -> Option<&str> {
        self.slot_id.as_deref()
    }

    /// The contact details entered so far.
    pub fn details(&self) -> &CustomerDetails {
        &self.details
    }

    /// The chosen recurrence.
    pub fn recurring(&self) -> Recurrence {
        self.recurring
    }

    /// The loyalty balance snapshot fetched for this session.
    pub fn loyalty_balance(&self) -> u32 {
        self.loyalty_balance
    }

    /// The loyalty position the pricing engine sees.
    pub fn loyalty_state(&self) -> LoyaltyState {
        LoyaltyState::new(self.loyalty_balance, self.redeem)
    }

    /// Whether inline account creation was requested.
    pub fn account_requested(&self) -> bool {
        self.account_password.is_some()
    }

    /// Destroy this attempt and start over at the selection step.
    pub fn reset(&mut self) {
        *self = Self::new(self.cart.currency());
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;

    use super::*;

    #[test]
    fn default_step_is_selection() {
        assert_eq!(BookingStep::default(), BookingStep::Selection);
    }

    #[test]
    fn only_selection_can_modify_items() {
        assert!(BookingStep::Selection.can_modify_items());
        assert!(!BookingStep::SlotPicked.can_modify_items());
        assert!(!BookingStep::DetailsEntered.can_modify_items());
        assert!(!BookingStep::Submitting.can_modify_items());
        assert!(!BookingStep::Done.can_modify_items());
        assert!(!BookingStep::Failed.can_modify_items());
    }

    #[test]
    fn failed_can_retry_submission() {
        assert!(BookingStep::DetailsEntered.can_submit());
        assert!(BookingStep::Failed.can_submit());
        assert!(!BookingStep::Submitting.can_submit());
        assert!(!BookingStep::Done.can_submit());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(BookingStep::SlotPicked.to_string(), "SlotPicked");
        assert_eq!(BookingStep::Failed.to_string(), "Failed");
    }

    #[test]
    fn recurrence_serialises_to_storefront_values() {
        assert_eq!(Recurrence::None.as_str(), "none");
        assert_eq!(Recurrence::Weekly.as_str(), "weekly");
        assert_eq!(Recurrence::Biweekly.as_str(), "2weekly");
    }

    #[test]
    fn reset_returns_to_a_fresh_selection_step() {
        let mut session = BookingSession::new(GBP);

        session.step = BookingStep::Failed;
        session.loyalty_balance = 120;
        session.redeem = true;
        session.slot_id = Some("anytime".to_string());

        session.reset();

        assert_eq!(session.step(), BookingStep::Selection);
        assert!(session.cart().is_empty());
        assert_eq!(session.loyalty_balance(), 0);
        assert_eq!(session.slot_id(), None);
        assert!(!session.loyalty_state().redeem);
    }
}
