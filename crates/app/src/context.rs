//! App Context

use std::sync::Arc;

use crate::{
    config::StoreConfig,
    domain::{
        catalog::{CatalogService, RestCatalogService},
        customers::{CustomersService, RestCustomersService},
        orders::{OrdersService, RestOrdersService},
        settings::{RestSettingsService, SettingsService},
    },
    notify::{Notifier, RestNotifier},
    store::CollectionStore,
};

/// Shared handles to every collaborator the booking workflow calls.
#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub customers: Arc<dyn CustomersService>,
    pub orders: Arc<dyn OrdersService>,
    pub settings: Arc<dyn SettingsService>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContext {
    /// Build application context over the remote collection store.
    #[must_use]
    pub fn from_config(config: StoreConfig) -> Self {
        let notifier = RestNotifier::new(&config);
        let store = CollectionStore::new(config);

        Self {
            catalog: Arc::new(RestCatalogService::new(store.clone())),
            customers: Arc::new(RestCustomersService::new(store.clone())),
            orders: Arc::new(RestOrdersService::new(store.clone())),
            settings: Arc::new(RestSettingsService::new(store)),
            notifier: Arc::new(notifier),
        }
    }
}
