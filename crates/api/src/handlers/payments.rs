//! Payment functions: order initiation, signature verification, fund release.
//!
//! These endpoints sit under `/functions/v1` and answer every failure with
//! `500 {"error": ...}` (see [`FunctionError`]). Authentication is checked
//! before any store or gateway call, so the auth and body extractors are
//! taken as `Result`s and unwrapped in order inside the handler. The request
//! timeout is enforced here with `within` rather than by the router's
//! `408` layer, so a slow gateway or store still answers in that shape.

use std::future::Future;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use rentify_core::error::CoreError;
use rentify_core::money::{to_minor_units, validate_amount, validate_currency, DEFAULT_CURRENCY};
use rentify_core::payment::{PaymentError, PAYMENT_METHOD_RAZORPAY};
use rentify_core::types::DbId;
use rentify_db::models::payment::{CapturePayment, CreatePayment, Payment};
use rentify_gateway::{GatewayOrder, OrderRequest, PaymentGateway};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::error::{AppError, AppResult, FunctionError, FunctionResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Amount in major units (rupees).
    pub amount: Decimal,
    pub rental_id: DbId,
    pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    /// Minor units, as echoed by the gateway.
    pub amount: i64,
    pub currency: String,
    /// Public key id for the checkout widget.
    pub key_id: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasePaymentRequest {
    pub rental_id: DbId,
}

/// Gateway receipt for a rental. Razorpay caps receipts at 40 characters,
/// so the id is written without hyphens.
fn receipt_for(rental_id: DbId) -> String {
    format!("rcpt_{}", rental_id.simple())
}

/// Run `fut` unless `deadline` passes first.
async fn within<F: Future>(deadline: Instant, fut: F) -> Result<F::Output, AppError> {
    tokio::time::timeout_at(deadline, fut)
        .await
        .map_err(|_| AppError::Timeout)
}

/// Open the gateway order for a pending payment and record its id.
async fn open_order(
    state: &AppState,
    gateway: &dyn PaymentGateway,
    payment_id: DbId,
    request: &OrderRequest,
) -> AppResult<GatewayOrder> {
    let order = gateway.create_order(request).await?;
    state
        .payments
        .attach_order(payment_id, &order.id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!(
                "payment {payment_id} was no longer pending when order {} was attached",
                order.id
            ))
        })?;
    Ok(order)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /functions/v1/create-order
///
/// Record a pending payment and open a gateway order for it.
pub async fn create_order(
    State(state): State<AppState>,
    user: Result<AuthUser, AppError>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> FunctionResult<Json<CreateOrderResponse>> {
    let deadline = Instant::now() + state.request_timeout();
    let user = user?;
    let Json(input) = body?;

    validate_amount(input.amount).map_err(CoreError::Validation)?;
    let currency = input
        .currency
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
    validate_currency(&currency).map_err(CoreError::Validation)?;
    let amount_minor = to_minor_units(input.amount).map_err(CoreError::Validation)?;

    let gateway = state.gateway()?;

    tracing::info!(
        user_id = %user.user_id,
        rental_id = %input.rental_id,
        amount = %input.amount,
        currency = %currency,
        "Creating payment order",
    );

    let payment = within(
        deadline,
        state.payments.create_pending(&CreatePayment {
            rental_id: input.rental_id,
            user_id: user.user_id,
            amount: input.amount,
            currency: currency.clone(),
        }),
    )
    .await??;

    let request = OrderRequest {
        amount: amount_minor,
        currency,
        receipt: receipt_for(input.rental_id),
        notes: serde_json::json!({
            "rental_id": input.rental_id,
            "user_id": user.user_id,
        }),
    };

    // Any failure past this point must not leave the row pending.
    let order = match within(deadline, open_order(&state, gateway, payment.id, &request)).await {
        Ok(Ok(order)) => order,
        Ok(Err(err)) | Err(err) => {
            if let Err(db_err) = state.payments.mark_failed(payment.id).await {
                tracing::error!(payment_id = %payment.id, error = %db_err, "Failed to mark payment failed");
            }
            return Err(err.into());
        }
    };

    tracing::info!(payment_id = %payment.id, order_id = %order.id, "Payment order created");

    Ok(Json(CreateOrderResponse {
        order_id: order.id,
        amount: order.amount,
        currency: order.currency,
        key_id: gateway.key_id().to_string(),
    }))
}

/// POST /functions/v1/verify-payment
///
/// Check the checkout signature and capture the caller's pending payment.
/// A mismatched signature leaves the payment untouched.
pub async fn verify_payment(
    State(state): State<AppState>,
    user: Result<AuthUser, AppError>,
    body: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> FunctionResult<Json<SuccessResponse>> {
    let deadline = Instant::now() + state.request_timeout();
    let user = user?;
    let Json(input) = body?;

    let gateway = state.gateway()?;

    if !gateway.verify_payment_signature(
        &input.razorpay_order_id,
        &input.razorpay_payment_id,
        &input.razorpay_signature,
    ) {
        tracing::warn!(
            user_id = %user.user_id,
            order_id = %input.razorpay_order_id,
            "Payment signature mismatch",
        );
        return Err(PaymentError::InvalidSignature.into());
    }

    let payment = within(
        deadline,
        state.payments.capture(&CapturePayment {
            razorpay_order_id: input.razorpay_order_id,
            user_id: user.user_id,
            razorpay_payment_id: input.razorpay_payment_id,
            razorpay_signature: input.razorpay_signature,
            payment_method: PAYMENT_METHOD_RAZORPAY.to_string(),
        }),
    )
    .await??
    .ok_or(FunctionError::from(PaymentError::NotCapturable))?;

    tracing::info!(
        payment_id = %payment.id,
        rental_id = %payment.rental_id,
        "Payment captured",
    );

    Ok(Json(SuccessResponse::new("Payment verified successfully")))
}

/// POST /functions/v1/release-payment
///
/// Release the caller's captured payment for a rental. Succeeds at most once.
pub async fn release_payment(
    State(state): State<AppState>,
    user: Result<AuthUser, AppError>,
    body: Result<Json<ReleasePaymentRequest>, JsonRejection>,
) -> FunctionResult<Json<SuccessResponse>> {
    let deadline = Instant::now() + state.request_timeout();
    let user = user?;
    let Json(input) = body?;

    let payment = within(deadline, state.payments.release(input.rental_id, user.user_id))
        .await??
        .ok_or(FunctionError::from(PaymentError::NotReleasable))?;

    tracing::info!(
        payment_id = %payment.id,
        rental_id = %payment.rental_id,
        "Payment released",
    );

    Ok(Json(SuccessResponse::new("Payment released successfully")))
}

/// GET /api/v1/rentals/{id}/payments
///
/// The caller's payment history for one rental.
pub async fn list_rental_payments(
    user: AuthUser,
    State(state): State<AppState>,
    Path(rental_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Payment>>>> {
    let payments = state
        .payments
        .list_for_rental(rental_id, user.user_id)
        .await?;
    Ok(Json(DataResponse { data: payments }))
}
