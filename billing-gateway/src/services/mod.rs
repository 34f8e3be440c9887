//! Card-payment processor seam.
//!
//! Handlers only see [`CardProcessor`]; [`StripeClient`] is the production
//! implementation.

pub mod stripe;

pub use stripe::StripeClient;

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Parameters for a payment intent that is confirmed on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentParams {
    /// Amount in the smallest currency unit.
    pub amount: i64,
    pub currency: String,
    pub payment_method: String,
}

/// Processor resources; only the id and lifecycle status are read.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Subscription {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Invoice {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Failure of a single processor call.
///
/// `Rejected` is the caller's problem (bad parameters, declined card, unknown
/// resource); every other variant is on our side of the wire.
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("{message}")]
    Rejected {
        message: String,
        code: Option<String>,
    },

    #[error("payment processor unavailable: {0}")]
    Unavailable(String),

    #[error("payment processor did not respond within {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("payment processor request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl ProcessorError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            code: None,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Operations the gateway forwards to the card processor.
///
/// Each call is made exactly once per inbound request; implementations must
/// not retry or deduplicate.
#[async_trait]
pub trait CardProcessor: Send + Sync {
    /// Create a payment intent and confirm it in the same call.
    async fn create_payment_intent(
        &self,
        params: &PaymentIntentParams,
    ) -> Result<PaymentIntent, ProcessorError>;

    /// Subscribe `customer_id` to a single item priced at `price_id`.
    async fn create_subscription(
        &self,
        customer_id: &str,
        price_id: &str,
    ) -> Result<Subscription, ProcessorError>;

    /// Create an automatically collected invoice for the subscription.
    async fn create_invoice(&self, subscription_id: &str) -> Result<Invoice, ProcessorError>;
}
