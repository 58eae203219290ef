//! Admin moderation routes, mounted at `/admin`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// ```text
/// GET  /listings/pending        -> list_pending_listings
/// POST /listings/{id}/approve   -> approve_listing
/// POST /listings/{id}/reject    -> reject_listing
/// GET  /rentals                 -> list_all_rentals
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/listings/pending", get(admin::list_pending_listings))
        .route("/listings/{id}/approve", post(admin::approve_listing))
        .route("/listings/{id}/reject", post(admin::reject_listing))
        .route("/rentals", get(admin::list_all_rentals))
}
