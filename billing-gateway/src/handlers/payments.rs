use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::{
    dtos::{PaymentProcessed, ProcessPaymentRequest, SuccessResponse},
    error::AppError,
    services::PaymentIntentParams,
    AppState,
};

/// Create and immediately confirm a payment intent.
pub async fn process_payment(
    State(state): State<AppState>,
    payload: Result<Json<ProcessPaymentRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse<PaymentProcessed>>, AppError> {
    let Json(payload) = payload?;

    tracing::info!(
        amount = payload.amount,
        currency = %payload.currency,
        "Processing payment"
    );

    let params = PaymentIntentParams {
        amount: payload.amount,
        currency: payload.currency,
        payment_method: payload.payment_method,
    };

    let intent = state.processor.create_payment_intent(&params).await?;

    Ok(Json(SuccessResponse::new(PaymentProcessed {
        payment_intent_id: intent.id,
        amount: params.amount,
        currency: params.currency,
    })))
}
