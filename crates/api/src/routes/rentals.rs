//! Route definitions for rentals, mounted at `/rentals`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{payments, rentals};
use crate::state::AppState;

/// ```text
/// POST /                -> create_rental
/// GET  /mine            -> list_my_rentals
/// POST /{id}/complete   -> complete_rental
/// POST /{id}/cancel     -> cancel_rental
/// GET  /{id}/payments   -> list_rental_payments
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(rentals::create_rental))
        .route("/mine", get(rentals::list_my_rentals))
        .route("/{id}/complete", post(rentals::complete_rental))
        .route("/{id}/cancel", post(rentals::cancel_rental))
        .route("/{id}/payments", get(payments::list_rental_payments))
}
