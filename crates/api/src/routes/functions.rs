//! Route definitions for the payment functions, mounted at `/functions/v1`.

use axum::routing::post;
use axum::Router;

use crate::handlers::payments;
use crate::state::AppState;

/// ```text
/// POST /create-order              -> create_order
/// POST /create-razorpay-order     -> create_order
/// POST /verify-payment            -> verify_payment
/// POST /verify-razorpay-payment   -> verify_payment
/// POST /release-payment           -> release_payment
/// ```
///
/// The `*-razorpay-*` paths are kept for checkout clients deployed before
/// the shorter names.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-order", post(payments::create_order))
        .route("/create-razorpay-order", post(payments::create_order))
        .route("/verify-payment", post(payments::verify_payment))
        .route("/verify-razorpay-payment", post(payments::verify_payment))
        .route("/release-payment", post(payments::release_payment))
}
