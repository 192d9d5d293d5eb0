//! Order confirmation notifications.
//!
//! Confirmations are best-effort: the booking workflow logs a failed send
//! and carries on. Nothing here may block or fail a booking.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

use crate::{config::StoreConfig, domain::orders::models::OrderItem};

/// Errors that can occur when sending a confirmation.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The notification endpoint returned a non-2xx response.
    #[error("unexpected response from notification endpoint: {0}")]
    UnexpectedResponse(String),
}

/// Payload for one order-confirmation message.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OrderConfirmation {
    /// Customer display name.
    pub name: String,

    /// Recipient address.
    pub email: String,

    /// The order's readable identifier.
    pub order_id: String,

    /// Items booked, echoed into the message body.
    pub items: Vec<OrderItem>,

    /// The store's own address, copied on the confirmation.
    pub store_email: String,
}

/// Sends order confirmations.
#[automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Fire one order-confirmation request.
    async fn order_confirmation(&self, confirmation: OrderConfirmation) -> Result<(), NotifyError>;
}

/// Notifier backed by the store's mail function endpoint.
#[derive(Debug, Clone)]
pub struct RestNotifier {
    endpoint: String,
    api_key: String,
    http: Client,
}

impl RestNotifier {
    /// Create a new notifier from the store configuration.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            endpoint: format!("{}/functions/v1/send-order-confirmation", config.base_url),
            api_key: config.api_key.clone(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for RestNotifier {
    async fn order_confirmation(&self, confirmation: OrderConfirmation) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&confirmation)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(NotifyError::UnexpectedResponse(format!(
                "confirmation send failed with status {status}: {text}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_derived_from_the_store_base_url() {
        let notifier = RestNotifier::new(&StoreConfig {
            base_url: "https://store.example".to_string(),
            api_key: "anon-key".to_string(),
        });

        assert_eq!(
            notifier.endpoint,
            "https://store.example/functions/v1/send-order-confirmation"
        );
    }
}
