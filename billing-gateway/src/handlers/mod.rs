//! HTTP handlers for the billing gateway.

pub mod invoices;
pub mod payments;
pub mod subscriptions;

use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::SERVICE_NAME;

pub async fn health_check() -> Json<Value> {
    let timestamp = Utc::now().timestamp_micros() as f64 / 1_000_000.0;

    Json(json!({
        "status": "healthy",
        "timestamp": timestamp,
        "service": SERVICE_NAME,
    }))
}

/// Service metadata and the list of public endpoints.
pub async fn index() -> Json<Value> {
    Json(json!({
        "service": "Kanizsa Billing Service",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "process_payment": "/payment/process",
            "create_subscription": "/subscriptions/create",
            "generate_invoice": "/invoices/generate",
        },
    }))
}
