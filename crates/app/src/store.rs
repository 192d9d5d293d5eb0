//! HTTP client for the remote collection store.
//!
//! The storefront talks straight to a hosted relational store over its REST
//! surface. Only the operations the booking core needs are exposed: filtered
//! reads, inserts, and keyed upserts over named collections.

use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::config::StoreConfig;

/// Errors that can occur when communicating with the data store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store returned a non-2xx response.
    #[error("unexpected response from data store: {0}")]
    UnexpectedResponse(String),
}

/// A single equality filter on a select, rendered as `column=eq.value`.
#[derive(Debug, Clone)]
pub struct Filter {
    column: &'static str,
    value: String,
}

impl Filter {
    /// Filter rows where `column` equals `value`.
    pub fn eq(column: &'static str, value: impl Into<String>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

/// HTTP client over named collections in the remote store.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    config: StoreConfig,
    http: Client,
}

impl CollectionStore {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// The configured base address.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// The configured API key.
    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    /// Read rows from `collection`, optionally filtered and ordered.
    ///
    /// `order` is a raw order expression such as `"sort_order.asc"`.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, a non-2xx response, or a body that
    /// does not decode as the expected row type.
    pub async fn select<T: DeserializeOwned>(
        &self,
        collection: &str,
        filters: &[Filter],
        order: Option<&str>,
    ) -> Result<Vec<T>, StoreError> {
        let mut request = self
            .http
            .get(self.collection_url(collection))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .query(&[("select", "*")]);

        for filter in filters {
            request = request.query(&[(filter.column, format!("eq.{}", filter.value))]);
        }

        if let Some(order) = order {
            request = request.query(&[("order", order)]);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(unexpected(collection, response).await);
        }

        Ok(response.json().await?)
    }

    /// Insert one record into `collection`.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or a non-2xx response.
    pub async fn insert<T: Serialize + Sync>(
        &self,
        collection: &str,
        record: &T,
    ) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.collection_url(collection))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(unexpected(collection, response).await);
        }

        Ok(())
    }

    /// Insert-or-update one record in `collection`, keyed by `conflict_column`.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or a non-2xx response.
    pub async fn upsert<T: Serialize + Sync>(
        &self,
        collection: &str,
        conflict_column: &str,
        record: &T,
    ) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.collection_url(collection))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .query(&[("on_conflict", conflict_column)])
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(unexpected(collection, response).await);
        }

        Ok(())
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{collection}", self.config.base_url)
    }
}

async fn unexpected(collection: &str, response: reqwest::Response) -> StoreError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    StoreError::UnexpectedResponse(format!(
        "request to {collection} failed with status {status}: {text}"
    ))
}
