//! Orders service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::orders::models::NewOrder,
    store::{CollectionStore, StoreError},
};

/// Order writes used by the booking workflow.
#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Insert one pending order record.
    async fn create(&self, order: NewOrder) -> Result<(), StoreError>;
}

/// Orders service backed by the remote collection store.
#[derive(Debug, Clone)]
pub struct RestOrdersService {
    store: CollectionStore,
}

impl RestOrdersService {
    #[must_use]
    pub fn new(store: CollectionStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl OrdersService for RestOrdersService {
    async fn create(&self, order: NewOrder) -> Result<(), StoreError> {
        self.store.insert("cp_orders", &order).await
    }
}
