//! Stripe client.
//!
//! Talks to the Stripe REST API directly with form-encoded requests. Only the
//! three resources the gateway needs are covered.

use super::{
    CardProcessor, Invoice, PaymentIntent, PaymentIntentParams, ProcessorError, Subscription,
};
use crate::config::StripeConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Stripe client for the payment intent, subscription and invoice APIs.
#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    config: StripeConfig,
}

/// Stripe API error response.
#[derive(Debug, Deserialize)]
struct StripeError {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    decline_code: Option<String>,
}

impl StripeClient {
    /// Create a new Stripe client whose requests give up after `config.timeout`.
    pub fn new(config: StripeConfig) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        resource: &str,
        form: &[(&str, String)],
    ) -> Result<T, ProcessorError> {
        let url = format!("{}/{}", self.config.api_base_url, resource);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .form(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        tracing::debug!(status = %status, resource, "Stripe response received");

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| {
                tracing::error!(error = %e, resource, "Undecodable Stripe response");
                ProcessorError::Unavailable(format!("unexpected response from Stripe: {}", e))
            })
        } else {
            Err(classify_failure(status, &body))
        }
    }

    fn transport_error(&self, error: reqwest::Error) -> ProcessorError {
        if error.is_timeout() {
            ProcessorError::Timeout(self.config.timeout)
        } else {
            ProcessorError::Transport(error)
        }
    }
}

/// Map a non-2xx Stripe response onto the gateway's error taxonomy.
fn classify_failure(status: StatusCode, body: &str) -> ProcessorError {
    let detail = serde_json::from_str::<StripeError>(body).ok().map(|e| e.error);

    let message = detail
        .as_ref()
        .and_then(|d| d.message.clone())
        .unwrap_or_else(|| body.to_string());

    tracing::debug!(
        status = %status,
        kind = ?detail.as_ref().and_then(|d| d.kind.as_deref()),
        code = ?detail.as_ref().and_then(|d| d.code.as_deref()),
        decline_code = ?detail.as_ref().and_then(|d| d.decline_code.as_deref()),
        "Stripe request failed"
    );

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProcessorError::Unavailable(format!("Stripe refused credentials: {}", message))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            ProcessorError::Unavailable(format!("Stripe rate limit reached: {}", message))
        }
        s if s.is_client_error() => ProcessorError::Rejected {
            message,
            code: detail.and_then(|d| d.decline_code.or(d.code)),
        },
        s => ProcessorError::Unavailable(format!("Stripe returned {}: {}", s, message)),
    }
}

#[async_trait]
impl CardProcessor for StripeClient {
    async fn create_payment_intent(
        &self,
        params: &PaymentIntentParams,
    ) -> Result<PaymentIntent, ProcessorError> {
        let form = [
            ("amount", params.amount.to_string()),
            ("currency", params.currency.clone()),
            ("payment_method", params.payment_method.clone()),
            ("confirm", "true".to_string()),
        ];

        let intent: PaymentIntent = self.post_form("payment_intents", &form).await?;
        tracing::info!(
            payment_intent_id = %intent.id,
            status = ?intent.status,
            "Stripe payment intent created"
        );
        Ok(intent)
    }

    async fn create_subscription(
        &self,
        customer_id: &str,
        price_id: &str,
    ) -> Result<Subscription, ProcessorError> {
        let form = [
            ("customer", customer_id.to_string()),
            ("items[0][price]", price_id.to_string()),
        ];

        let subscription: Subscription = self.post_form("subscriptions", &form).await?;
        tracing::info!(
            subscription_id = %subscription.id,
            status = ?subscription.status,
            "Stripe subscription created"
        );
        Ok(subscription)
    }

    async fn create_invoice(&self, subscription_id: &str) -> Result<Invoice, ProcessorError> {
        let form = [
            ("subscription", subscription_id.to_string()),
            ("collection_method", "charge_automatically".to_string()),
        ];

        let invoice: Invoice = self.post_form("invoices", &form).await?;
        tracing::info!(
            invoice_id = %invoice.id,
            status = ?invoice.status,
            "Stripe invoice created"
        );
        Ok(invoice)
    }
}
