//! Admin moderation handlers.
//!
//! All endpoints require the admin role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use rentify_core::error::CoreError;
use rentify_core::listing::{validate_moderation, APPROVAL_APPROVED, APPROVAL_REJECTED};
use rentify_core::types::DbId;
use rentify_db::repositories::{ListingRepo, RentalRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/listings/pending
///
/// Listings awaiting moderation, oldest first.
pub async fn list_pending_listings(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let listings = ListingRepo::list_pending(&state.pool).await?;
    Ok(Json(DataResponse { data: listings }))
}

/// POST /api/v1/admin/listings/{id}/approve
pub async fn approve_listing(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    moderate(admin, &state, id, APPROVAL_APPROVED).await
}

/// POST /api/v1/admin/listings/{id}/reject
pub async fn reject_listing(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    moderate(admin, &state, id, APPROVAL_REJECTED).await
}

async fn moderate(
    RequireAdmin(admin): RequireAdmin,
    state: &AppState,
    id: DbId,
    status: &'static str,
) -> AppResult<impl IntoResponse> {
    let Some(listing) = ListingRepo::moderate(&state.pool, id, status).await? else {
        // Distinguish a missing listing from one that was already moderated.
        let existing = ListingRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Listing",
                id,
            }))?;
        validate_moderation(&existing.status).map_err(CoreError::Conflict)?;
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Listing {id} changed while being moderated"
        ))));
    };

    tracing::info!(
        listing_id = %id,
        status,
        admin_id = %admin.user_id,
        "Listing moderated",
    );

    Ok(Json(DataResponse { data: listing }))
}

/// GET /api/v1/admin/rentals
///
/// Every rental, newest first.
pub async fn list_all_rentals(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = params.resolve();
    let rentals = RentalRepo::list_all(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: rentals }))
}
