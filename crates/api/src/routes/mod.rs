pub mod admin;
pub mod functions;
pub mod health;
pub mod listings;
pub mod rentals;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /listings                          list (public), create
/// /listings/mine                     caller's listings
/// /listings/{id}                     get (public), delete
/// /listings/{id}/active              toggle visibility (PUT)
///
/// /rentals                           book (POST)
/// /rentals/mine                      caller's rentals
/// /rentals/{id}/complete             complete (POST)
/// /rentals/{id}/cancel               cancel (POST)
/// /rentals/{id}/payments             caller's payments for the rental
///
/// /admin/listings/pending            moderation queue (admin only)
/// /admin/listings/{id}/approve       approve (POST)
/// /admin/listings/{id}/reject        reject (POST)
/// /admin/rentals                     all rentals (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/listings", listings::router())
        .nest("/rentals", rentals::router())
        .nest("/admin", admin::router())
}

/// Build the `/functions/v1` route tree (payment functions).
pub fn function_routes() -> Router<AppState> {
    functions::router()
}
