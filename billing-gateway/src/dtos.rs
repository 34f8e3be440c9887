use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// `{"status": "success", ...fields}` envelope.
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub status: ResponseStatus,
    #[serde(flatten)]
    pub data: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: ResponseStatus,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: String) -> Self {
        Self {
            status: ResponseStatus::Error,
            error,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProcessPaymentRequest {
    /// Amount in the smallest currency unit (cents for USD).
    pub amount: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub payment_method: String,
}

fn default_currency() -> String {
    "usd".to_string()
}

#[derive(Debug, Serialize)]
pub struct PaymentProcessed {
    pub payment_intent_id: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub customer_id: String,
    /// Processor price id of the single subscription item.
    pub plan_id: String,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionCreated {
    pub subscription_id: String,
    pub customer_id: String,
    pub plan_id: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateInvoiceRequest {
    pub subscription_id: String,
    /// Echoed back untouched; never sent to the processor.
    #[serde(default)]
    pub period: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct InvoiceGenerated {
    pub invoice_id: String,
    pub subscription_id: String,
    pub period: serde_json::Value,
}
