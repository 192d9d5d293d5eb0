//! Settings service.

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;

use crate::store::{CollectionStore, Filter, StoreError};

#[derive(Debug, Clone, Deserialize)]
struct SettingRow {
    value: String,
}

/// Key-value store settings maintained in the back office.
#[automock]
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// Look up a setting by key.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// Settings service backed by the remote collection store.
#[derive(Debug, Clone)]
pub struct RestSettingsService {
    store: CollectionStore,
}

impl RestSettingsService {
    #[must_use]
    pub fn new(store: CollectionStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SettingsService for RestSettingsService {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let rows: Vec<SettingRow> = self
            .store
            .select("cp_app_settings", &[Filter::eq("key", key)], None)
            .await?;

        Ok(rows.into_iter().next().map(|row| row.value))
    }
}
