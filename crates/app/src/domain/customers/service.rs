//! Customers service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::customers::models::{CustomerUpsert, LoyaltyRow},
    store::{CollectionStore, Filter, StoreError},
};

/// Customer reads and writes used by the booking workflow.
#[automock]
#[async_trait]
pub trait CustomersService: Send + Sync {
    /// Fetch a customer's current points balance by email.
    ///
    /// Unknown customers have a balance of zero.
    async fn loyalty_balance(&self, email: &str) -> Result<u32, StoreError>;

    /// Insert-or-update a customer record, keyed by email.
    async fn upsert(&self, customer: CustomerUpsert) -> Result<(), StoreError>;
}

/// Customers service backed by the remote collection store.
#[derive(Debug, Clone)]
pub struct RestCustomersService {
    store: CollectionStore,
}

impl RestCustomersService {
    #[must_use]
    pub fn new(store: CollectionStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CustomersService for RestCustomersService {
    async fn loyalty_balance(&self, email: &str) -> Result<u32, StoreError> {
        let rows: Vec<LoyaltyRow> = self
            .store
            .select("cp_customers", &[Filter::eq("email", email)], None)
            .await?;

        Ok(rows
            .first()
            .and_then(|row| row.loyalty_points)
            .unwrap_or(0))
    }

    async fn upsert(&self, customer: CustomerUpsert) -> Result<(), StoreError> {
        self.store.upsert("cp_customers", "email", &customer).await
    }
}
