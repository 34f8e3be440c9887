use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::{
    dtos::{GenerateInvoiceRequest, InvoiceGenerated, SuccessResponse},
    error::AppError,
    AppState,
};

/// Create an automatically collected invoice for a subscription.
///
/// `period` is only echoed back; the processor never sees it.
pub async fn generate_invoice(
    State(state): State<AppState>,
    payload: Result<Json<GenerateInvoiceRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse<InvoiceGenerated>>, AppError> {
    let Json(payload) = payload?;

    tracing::info!(
        subscription_id = %payload.subscription_id,
        period = %payload.period,
        "Generating invoice"
    );

    let invoice = state
        .processor
        .create_invoice(&payload.subscription_id)
        .await?;

    Ok(Json(SuccessResponse::new(InvoiceGenerated {
        invoice_id: invoice.id,
        subscription_id: payload.subscription_id,
        period: payload.period,
    })))
}
