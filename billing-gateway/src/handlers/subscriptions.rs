use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::{
    dtos::{CreateSubscriptionRequest, SubscriptionCreated, SuccessResponse},
    error::AppError,
    AppState,
};

pub async fn create_subscription(
    State(state): State<AppState>,
    payload: Result<Json<CreateSubscriptionRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse<SubscriptionCreated>>, AppError> {
    let Json(payload) = payload?;

    tracing::info!(
        customer_id = %payload.customer_id,
        plan_id = %payload.plan_id,
        "Creating subscription"
    );

    let subscription = state
        .processor
        .create_subscription(&payload.customer_id, &payload.plan_id)
        .await?;

    Ok(Json(SuccessResponse::new(SubscriptionCreated {
        subscription_id: subscription.id,
        customer_id: payload.customer_id,
        plan_id: payload.plan_id,
    })))
}
