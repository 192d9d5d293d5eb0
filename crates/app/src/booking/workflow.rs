//! Booking workflow.
//!
//! A linear, guarded walk from item selection to a submitted order. The
//! catalog, promotions and slots are fetched once at workflow start and
//! treated as a read-only snapshot; only the commit sequence performs
//! further I/O.

use slotmap::SlotMap;
use zeroize::Zeroizing;

use pressbook::{
    loyalty::LoyaltyScheme,
    pricing::{PriceBreakdown, PricingError, price},
    promotions::{Promotion, PromotionKey, PromotionMeta},
};

use crate::{
    booking::{
        errors::BookingError,
        session::{BookingSession, BookingStep, CustomerDetails, Recurrence},
    },
    context::AppContext,
    domain::{
        catalog::models::{
            CategoryRecord, CollectionSlot, ServiceRecord, promotions_from_records,
        },
        customers::models::{CustomerUpsert, credential_digest},
        orders::models::{
            NewOrder, OrderItem, PreferenceSnapshot, order_items, pounds_value, readable_order_id,
        },
    },
    notify::OrderConfirmation,
    store::StoreError,
};

/// The outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmittedOrder {
    /// The identifier quoted back to the customer.
    pub readable_id: String,

    /// The breakdown the order was priced at, computed at submission time.
    pub breakdown: PriceBreakdown<'static>,
}

/// Drives one customer through the booking flow.
pub struct BookingWorkflow {
    ctx: AppContext,
    session: BookingSession,
    categories: Vec<CategoryRecord>,
    services: Vec<ServiceRecord>,
    slots: Vec<CollectionSlot>,
    promotion_meta: SlotMap<PromotionKey, PromotionMeta>,
    promotions: Vec<Promotion<'static>>,
    scheme: LoyaltyScheme,
    preferences: PreferenceSnapshot,
}

impl BookingWorkflow {
    /// Open the booking flow, fetching the catalog snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when any catalog read fails.
    pub async fn start(ctx: AppContext, scheme: LoyaltyScheme) -> Result<Self, StoreError> {
        let categories = ctx.catalog.categories().await?;
        let services = ctx.catalog.services().await?;
        let promotion_records = ctx.catalog.active_promotions().await?;
        let slots = ctx.catalog.collection_slots().await?;

        let (promotion_meta, promotions) = promotions_from_records(promotion_records);

        tracing::info!(
            categories = categories.len(),
            services = services.len(),
            promotions = promotions.len(),
            slots = slots.len(),
            "booking flow opened"
        );

        Ok(Self {
            ctx,
            session: BookingSession::new(rusty_money::iso::GBP),
            categories,
            services,
            slots,
            promotion_meta,
            promotions,
            scheme,
            preferences: PreferenceSnapshot::default(),
        })
    }

    /// The current session state.
    pub fn session(&self) -> &BookingSession {
        &self.session
    }

    /// The step the session is on.
    pub fn step(&self) -> BookingStep {
        self.session.step
    }

    /// The catalog categories, in listing order.
    pub fn categories(&self) -> &[CategoryRecord] {
        &self.categories
    }

    /// The bookable services.
    pub fn services(&self) -> &[ServiceRecord] {
        &self.services
    }

    /// The offered collection slots.
    pub fn slots(&self) -> &[CollectionSlot] {
        &self.slots
    }

    /// Display metadata for the active promotions.
    pub fn promotion_meta(&self) -> &SlotMap<PromotionKey, PromotionMeta> {
        &self.promotion_meta
    }

    /// Snapshot the authenticated customer's standing cleaning preferences
    /// onto orders placed in this flow.
    pub fn set_preferences(&mut self, preferences: PreferenceSnapshot) {
        self.preferences = preferences;
    }

    /// Add one unit of a catalog service to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::WrongStep`] outside the selection step.
    pub fn add_item(&mut self, service: &ServiceRecord) -> Result<(), BookingError> {
        self.ensure(self.session.step.can_modify_items())?;
        self.session.cart.add(&service.name, service.unit_price());

        Ok(())
    }

    /// Adjust a cart line's quantity by `delta`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::WrongStep`] outside the selection step.
    pub fn adjust_quantity(&mut self, name: &str, delta: i32) -> Result<(), BookingError> {
        self.ensure(self.session.step.can_modify_items())?;
        self.session.cart.adjust_quantity(name, delta);

        Ok(())
    }

    /// Attach a garment-care note to a cart line.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::WrongStep`] outside the selection step.
    pub fn set_item_note(&mut self, name: &str, note: &str) -> Result<(), BookingError> {
        self.ensure(self.session.step.can_modify_items())?;
        self.session.cart.set_note(name, note);

        Ok(())
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::WrongStep`] outside the selection step.
    pub fn remove_item(&mut self, name: &str) -> Result<(), BookingError> {
        self.ensure(self.session.step.can_modify_items())?;
        self.session.cart.remove(name);

        Ok(())
    }

    /// Advance from item selection to slot selection.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::EmptyCart`] when nothing has been selected,
    /// or [`BookingError::WrongStep`] outside the selection step.
    pub fn proceed_to_slot(&mut self) -> Result<(), BookingError> {
        self.ensure(self.session.step == BookingStep::Selection)?;

        if self.session.cart.is_empty() {
            return Err(BookingError::EmptyCart);
        }

        self.session.step = BookingStep::SlotPicked;

        Ok(())
    }

    /// Step back from slot selection to item selection. Always allowed.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::WrongStep`] outside the slot step.
    pub fn back_to_selection(&mut self) -> Result<(), BookingError> {
        self.ensure(self.session.step == BookingStep::SlotPicked)?;
        self.session.step = BookingStep::Selection;

        Ok(())
    }

    /// Choose a collection slot, or the `anytime` sentinel.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::WrongStep`] outside the slot step.
    pub fn choose_slot(&mut self, slot_id: &str) -> Result<(), BookingError> {
        self.ensure(self.session.step.can_pick_slot())?;
        self.session.slot_id = Some(slot_id.to_string());

        Ok(())
    }

    /// Advance from slot selection to detail entry.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NoSlotSelected`] until a slot is chosen, or
    /// [`BookingError::WrongStep`] outside the slot step.
    pub fn proceed_to_details(&mut self) -> Result<(), BookingError> {
        self.ensure(self.session.step == BookingStep::SlotPicked)?;

        if self.session.slot_id.is_none() {
            return Err(BookingError::NoSlotSelected);
        }

        self.session.step = BookingStep::DetailsEntered;

        Ok(())
    }

    /// Step back from detail entry to slot selection. Always allowed.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::WrongStep`] outside the details step.
    pub fn back_to_slot(&mut self) -> Result<(), BookingError> {
        self.ensure(self.session.step.can_edit_details())?;
        self.session.step = BookingStep::SlotPicked;

        Ok(())
    }

    /// Replace the entered contact details.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::WrongStep`] outside the details step.
    pub fn set_details(&mut self, details: CustomerDetails) -> Result<(), BookingError> {
        self.ensure(self.session.step.can_edit_details())?;
        self.session.details = details;

        Ok(())
    }

    /// Choose how often the collection repeats.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::WrongStep`] outside the details step.
    pub fn set_recurrence(&mut self, recurring: Recurrence) -> Result<(), BookingError> {
        self.ensure(self.session.step.can_edit_details())?;
        self.session.recurring = recurring;

        Ok(())
    }

    /// Toggle loyalty redemption for this order.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::WrongStep`] outside the details step.
    pub fn set_redeem(&mut self, redeem: bool) -> Result<(), BookingError> {
        self.ensure(self.session.step.can_edit_details())?;
        self.session.redeem = redeem;

        Ok(())
    }

    /// Toggle the marketing opt-in.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::WrongStep`] outside the details step.
    pub fn set_marketing_opt_in(&mut self, opt_in: bool) -> Result<(), BookingError> {
        self.ensure(self.session.step.can_edit_details())?;
        self.session.marketing_opt_in = opt_in;

        Ok(())
    }

    /// Request inline account creation with the given password.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::WrongStep`] outside the details step.
    pub fn request_account(&mut self, password: Zeroizing<String>) -> Result<(), BookingError> {
        self.ensure(self.session.step.can_edit_details())?;
        self.session.account_password = Some(password);

        Ok(())
    }

    /// Withdraw an inline account-creation request.
    pub fn cancel_account_request(&mut self) {
        self.session.account_password = None;
    }

    /// Refresh the loyalty balance snapshot for the entered email.
    ///
    /// Called when the customer finishes typing their email. A read failure
    /// is logged and leaves the balance at zero; loyalty display is never
    /// worth blocking the flow for.
    pub async fn refresh_loyalty(&mut self) {
        let email = self.session.details.email.trim().to_string();

        if email.is_empty() {
            self.session.loyalty_balance = 0;
            return;
        }

        match self.ctx.customers.loyalty_balance(&email).await {
            Ok(balance) => self.session.loyalty_balance = balance,
            Err(error) => {
                tracing::warn!(%error, "failed to read loyalty balance");
                self.session.loyalty_balance = 0;
            }
        }
    }

    /// Price the current cart against the catalog snapshot.
    ///
    /// Recomputed on every call; nothing is cached between renders.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] when money arithmetic fails.
    pub fn breakdown(&self) -> Result<PriceBreakdown<'static>, PricingError> {
        price(
            &self.session.cart,
            &self.promotions,
            self.session.loyalty_state(),
            &self.scheme,
        )
    }

    /// Run the commit sequence: price, persist the order, settle the
    /// loyalty balance, and send a best-effort confirmation.
    ///
    /// On success the cart is cleared and the session reset for the next
    /// booking. On failure the session moves to [`BookingStep::Failed`]
    /// with the cart and details preserved so the customer can retry; the
    /// two writes are sequential and independent, so an order may exist
    /// without its loyalty update when the second write fails.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a required field is missing, or a
    /// wrapped [`StoreError`] when a write fails.
    pub async fn submit(&mut self) -> Result<SubmittedOrder, BookingError> {
        self.ensure(self.session.step.can_submit())?;
        self.validate_details()?;

        self.session.step = BookingStep::Submitting;

        // Priced at the moment of submission, never reused from a render.
        let breakdown = match self.breakdown() {
            Ok(breakdown) => breakdown,
            Err(error) => {
                self.session.step = BookingStep::Failed;
                return Err(error.into());
            }
        };

        let readable_id = readable_order_id(&mut rand::thread_rng());
        let details = self.session.details.clone();

        let redeemed = self.session.redeem
            && self.session.loyalty_balance >= self.scheme.min_redemption;
        let prior_balance = self.session.loyalty_balance;
        let points_redeemed = if redeemed { prior_balance } else { 0 };

        let items = order_items(&self.session.cart);

        let order = NewOrder {
            readable_id: readable_id.clone(),
            customer_name: details.name.clone(),
            customer_email: details.email.clone(),
            customer_phone: details.phone.clone(),
            customer_address: details.address.clone(),
            preferred_slot_id: self.session.slot_id.clone().unwrap_or_default(),
            items: items.clone(),
            status: "pending".to_string(),
            points_earned: breakdown.points_earned,
            points_redeemed,
            discount_amount: pounds_value(&breakdown.promotion_discount)
                + pounds_value(&breakdown.loyalty_discount),
            recurring_frequency: self.session.recurring.as_str().to_string(),
            marketing_opt_in: self.session.marketing_opt_in,
            create_account_requested: self.session.account_requested(),
            preferences: self.preferences.clone(),
            placed_at: jiff::Timestamp::now(),
        };

        if let Err(error) = self.ctx.orders.create(order).await {
            tracing::error!(%error, order = %readable_id, "order insert failed");
            self.session.step = BookingStep::Failed;
            return Err(BookingError::Order(error));
        }

        // Settle the loyalty balance: earned points land, a redeemed
        // balance is consumed in full.
        let new_balance = prior_balance + breakdown.points_earned - points_redeemed;

        if details.email.trim().is_empty() {
            tracing::warn!(order = %readable_id, "no customer email; skipping customer record update");
        } else {
            let customer = CustomerUpsert {
                name: details.name.clone(),
                email: details.email.clone(),
                phone: details.phone.clone(),
                address: details.address.clone(),
                notes: details.notes.clone(),
                loyalty_points: new_balance,
                password: self
                    .session
                    .account_password
                    .as_ref()
                    .map(|password| credential_digest(password.as_str())),
            };

            if let Err(error) = self.ctx.customers.upsert(customer).await {
                tracing::error!(%error, order = %readable_id, "customer upsert failed after order insert");
                self.session.step = BookingStep::Failed;
                return Err(BookingError::Customer(error));
            }

            self.send_confirmation(&readable_id, &details, items).await;
        }

        self.session.step = BookingStep::Done;
        tracing::info!(order = %readable_id, total = %breakdown.final_total, "booking complete");

        self.session.reset();

        Ok(SubmittedOrder {
            readable_id,
            breakdown,
        })
    }

    /// Best-effort confirmation send; failures are logged, never surfaced.
    async fn send_confirmation(
        &self,
        readable_id: &str,
        details: &CustomerDetails,
        items: Vec<OrderItem>,
    ) {
        let store_email = match self.ctx.settings.get("store_email").await {
            Ok(value) => value.unwrap_or_default(),
            Err(error) => {
                tracing::warn!(%error, "failed to read store email for confirmation");
                String::new()
            }
        };

        let confirmation = OrderConfirmation {
            name: details.name.clone(),
            email: details.email.clone(),
            order_id: readable_id.to_string(),
            items,
            store_email,
        };

        if let Err(error) = self.ctx.notifier.order_confirmation(confirmation).await {
            tracing::warn!(%error, order = readable_id, "order confirmation failed");
        }
    }

    fn ensure(&self, allowed: bool) -> Result<(), BookingError> {
        if allowed {
            Ok(())
        } else {
            Err(BookingError::WrongStep(self.session.step))
        }
    }

    fn validate_details(&self) -> Result<(), BookingError> {
        let details = &self.session.details;

        if details.name.trim().is_empty() {
            return Err(BookingError::MissingField("name"));
        }

        if details.phone.trim().is_empty() {
            return Err(BookingError::MissingField("phone"));
        }

        if details.address.trim().is_empty() {
            return Err(BookingError::MissingField("address"));
        }

        if self.session.slot_id.is_none() {
            return Err(BookingError::NoSlotSelected);
        }

        if let Some(password) = &self.session.account_password {
            if password.trim().is_empty() {
                return Err(BookingError::PasswordRequired);
            }
        }

        Ok(())
    }
}
