//! Route definitions for rental listings, mounted at `/listings`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::listings;
use crate::state::AppState;

/// ```text
/// GET    /            -> list_listings (public)
/// POST   /            -> create_listing
/// GET    /mine        -> list_my_listings
/// GET    /{id}        -> get_listing (public)
/// DELETE /{id}        -> delete_listing
/// PUT    /{id}/active -> set_listing_active
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(listings::list_listings).post(listings::create_listing),
        )
        .route("/mine", get(listings::list_my_listings))
        .route(
            "/{id}",
            get(listings::get_listing).delete(listings::delete_listing),
        )
        .route("/{id}/active", put(listings::set_listing_active))
}
