mod common;

use billing_gateway::services::ProcessorError;
use common::{RecordedCall, StubProcessor, TestApp};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn generate_invoice_echoes_period() {
    let processor = StubProcessor::returning("in_1");
    let app = TestApp::spawn(processor.clone()).await;

    let response = app
        .post_json(
            "/invoices/generate",
            json!({ "subscription_id": "sub_1", "period": "2024-01" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "status": "success",
            "invoice_id": "in_1",
            "subscription_id": "sub_1",
            "period": "2024-01"
        })
    );

    // Only the subscription reaches the processor.
    assert_eq!(
        processor.calls(),
        vec![RecordedCall::Invoice {
            subscription_id: "sub_1".to_string(),
        }]
    );
}

#[tokio::test]
async fn period_is_echoed_verbatim_whatever_its_shape() {
    let processor = StubProcessor::sequential("in");
    let app = TestApp::spawn(processor).await;

    let structured = json!({ "start": "2024-01-01", "end": "2024-01-31" });
    let body: serde_json::Value = app
        .post_json(
            "/invoices/generate",
            json!({ "subscription_id": "sub_1", "period": structured.clone() }),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["period"], structured);

    let body: serde_json::Value = app
        .post_json("/invoices/generate", json!({ "subscription_id": "sub_1" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "success");
    assert!(body["period"].is_null());
}

#[tokio::test]
async fn failed_invoice_returns_error_envelope() {
    let processor =
        StubProcessor::failing(|| ProcessorError::rejected("No such subscription: 'sub_gone'"));
    let app = TestApp::spawn(processor).await;

    let response = app
        .post_json(
            "/invoices/generate",
            json!({ "subscription_id": "sub_gone", "period": "2024-01" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "status": "error", "error": "No such subscription: 'sub_gone'" })
    );
}
