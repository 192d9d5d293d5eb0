//! Catalog service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::catalog::models::{CategoryRecord, CollectionSlot, PromotionRecord, ServiceRecord},
    store::{CollectionStore, Filter, StoreError},
};

/// Read-only access to the storefront catalog.
///
/// Everything here is fetched once at workflow start and treated as a
/// snapshot for the rest of the booking session.
#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch the service categories, in listing order.
    async fn categories(&self) -> Result<Vec<CategoryRecord>, StoreError>;

    /// Fetch all bookable services.
    async fn services(&self) -> Result<Vec<ServiceRecord>, StoreError>;

    /// Fetch the currently active promotions.
    async fn active_promotions(&self) -> Result<Vec<PromotionRecord>, StoreError>;

    /// Fetch the currently offered collection slots.
    async fn collection_slots(&self) -> Result<Vec<CollectionSlot>, StoreError>;
}

/// Catalog service backed by the remote collection store.
#[derive(Debug, Clone)]
pub struct RestCatalogService {
    store: CollectionStore,
}

impl RestCatalogService {
    #[must_use]
    pub fn new(store: CollectionStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CatalogService for RestCatalogService {
    async fn categories(&self) -> Result<Vec<CategoryRecord>, StoreError> {
        self.store
            .select("cp_categories", &[], Some("sort_order.asc"))
            .await
    }

    async fn services(&self) -> Result<Vec<ServiceRecord>, StoreError> {
        self.store.select("cp_services", &[], None).await
    }

    async fn active_promotions(&self) -> Result<Vec<PromotionRecord>, StoreError> {
        self.store
            .select("cp_promotions", &[Filter::eq("active", "true")], None)
            .await
    }

    async fn collection_slots(&self) -> Result<Vec<CollectionSlot>, StoreError> {
        self.store
            .select("cp_collection_slots", &[Filter::eq("active", "true")], None)
            .await
    }
}
