#![allow(dead_code)]

use async_trait::async_trait;
use billing_gateway::config::{Config, ServerConfig, StripeConfig};
use billing_gateway::services::{
    CardProcessor, Invoice, PaymentIntent, PaymentIntentParams, ProcessorError, Subscription,
};
use billing_gateway::Application;
use secrecy::Secret;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A call received by [`StubProcessor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    PaymentIntent(PaymentIntentParams),
    Subscription { customer_id: String, price_id: String },
    Invoice { subscription_id: String },
}

enum Outcome {
    /// Every call returns this id.
    Fixed(String),
    /// Ids are `<prefix>_<n>`, counting from 1.
    Sequential(String),
    Fail(Box<dyn Fn() -> ProcessorError + Send + Sync>),
}

/// In-memory card processor that records calls and answers from a script.
pub struct StubProcessor {
    outcome: Outcome,
    counter: AtomicUsize,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubProcessor {
    pub fn returning(id: &str) -> Arc<Self> {
        Arc::new(Self::with_outcome(Outcome::Fixed(id.to_string())))
    }

    pub fn sequential(prefix: &str) -> Arc<Self> {
        Arc::new(Self::with_outcome(Outcome::Sequential(prefix.to_string())))
    }

    pub fn failing<F>(make_error: F) -> Arc<Self>
    where
        F: Fn() -> ProcessorError + Send + Sync + 'static,
    {
        Arc::new(Self::with_outcome(Outcome::Fail(Box::new(make_error))))
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            counter: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, call: RecordedCall) -> Result<String, ProcessorError> {
        self.calls.lock().unwrap().push(call);
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;

        match &self.outcome {
            Outcome::Fixed(id) => Ok(id.clone()),
            Outcome::Sequential(prefix) => Ok(format!("{}_{}", prefix, n)),
            Outcome::Fail(make_error) => Err(make_error()),
        }
    }
}

#[async_trait]
impl CardProcessor for StubProcessor {
    async fn create_payment_intent(
        &self,
        params: &PaymentIntentParams,
    ) -> Result<PaymentIntent, ProcessorError> {
        let id = self.answer(RecordedCall::PaymentIntent(params.clone()))?;
        Ok(PaymentIntent {
            id,
            status: Some("succeeded".to_string()),
        })
    }

    async fn create_subscription(
        &self,
        customer_id: &str,
        price_id: &str,
    ) -> Result<Subscription, ProcessorError> {
        let id = self.answer(RecordedCall::Subscription {
            customer_id: customer_id.to_string(),
            price_id: price_id.to_string(),
        })?;
        Ok(Subscription {
            id,
            status: Some("active".to_string()),
        })
    }

    async fn create_invoice(&self, subscription_id: &str) -> Result<Invoice, ProcessorError> {
        let id = self.answer(RecordedCall::Invoice {
            subscription_id: subscription_id.to_string(),
        })?;
        Ok(Invoice {
            id,
            status: Some("draft".to_string()),
        })
    }
}

pub fn test_config(stripe_api_base: &str, timeout: Duration) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
        },
        stripe: StripeConfig {
            secret_key: Secret::new("sk_test_gateway".to_string()),
            api_base_url: stripe_api_base.to_string(),
            timeout,
        },
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        ignored_credentials: Vec::new(),
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the gateway backed by the given stub processor.
    pub async fn spawn(processor: Arc<StubProcessor>) -> Self {
        let config = test_config("http://127.0.0.1:9", Duration::from_secs(5));
        let app = Application::build_with_processor(config, processor)
            .await
            .expect("Failed to build test application");
        Self::start(app).await
    }

    /// Spawn the gateway backed by the real Stripe client pointed at `stripe_api_base`.
    pub async fn spawn_with_stripe(stripe_api_base: &str, timeout: Duration) -> Self {
        let app = Application::build(test_config(stripe_api_base, timeout))
            .await
            .expect("Failed to build test application");
        Self::start(app).await
    }

    async fn start(app: Application) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn post_json(&self, path: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
