//! Handlers for rental bookings.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rentify_core::error::CoreError;
use rentify_core::listing::APPROVAL_APPROVED;
use rentify_core::rental::{rental_total, RentalStatus};
use rentify_core::types::{DbId, Timestamp};
use rentify_db::models::rental::{CreateRental, Rental};
use rentify_db::repositories::{ListingRepo, RentalRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `POST /api/v1/rentals`.
#[derive(Debug, Deserialize)]
pub struct CreateRentalRequest {
    pub listing_id: DbId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}

/// POST /api/v1/rentals
///
/// Book an approved, active listing. The total is priced from the listing,
/// never taken from the client.
pub async fn create_rental(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRentalRequest>,
) -> AppResult<impl IntoResponse> {
    let listing = ListingRepo::find_by_id(&state.pool, input.listing_id)
        .await?
        .filter(|l| l.status == APPROVAL_APPROVED && l.is_active)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: input.listing_id,
        }))?;

    if listing.owner_id == user.user_id {
        return Err(AppError::BadRequest("You cannot rent your own listing".into()));
    }

    let total_cost = rental_total(
        listing.price,
        &listing.duration,
        input.start_date,
        input.end_date,
    )
    .map_err(CoreError::Validation)?;

    let rental = RentalRepo::create(
        &state.pool,
        &CreateRental {
            listing_id: listing.id,
            renter_id: user.user_id,
            start_date: input.start_date,
            end_date: input.end_date,
            total_cost,
        },
    )
    .await?;

    tracing::info!(
        rental_id = %rental.id,
        listing_id = %listing.id,
        renter_id = %user.user_id,
        total_cost = %total_cost,
        "Rental booked",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: rental })))
}

/// GET /api/v1/rentals/mine
pub async fn list_my_rentals(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rentals = RentalRepo::list_by_renter(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: rentals }))
}

/// POST /api/v1/rentals/{id}/complete
pub async fn complete_rental(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    close_rental(&state, &user, id, RentalStatus::Completed).await
}

/// POST /api/v1/rentals/{id}/cancel
pub async fn cancel_rental(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    close_rental(&state, &user, id, RentalStatus::Cancelled).await
}

/// Move the caller's active rental to `status`.
///
/// Missing or foreign rentals are 404; rentals that are already closed are
/// a 409 naming their current status.
async fn close_rental(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    status: RentalStatus,
) -> AppResult<Json<DataResponse<Rental>>> {
    if let Some(rental) = RentalRepo::close(&state.pool, id, user.user_id, status).await? {
        tracing::info!(rental_id = %id, status = %status, "Rental closed");
        return Ok(Json(DataResponse { data: rental }));
    }

    match RentalRepo::find_by_id(&state.pool, id).await? {
        Some(existing) if existing.renter_id == user.user_id => {
            Err(AppError::Core(close_conflict(&existing.status, status)))
        }
        _ => Err(AppError::Core(CoreError::NotFound {
            entity: "Rental",
            id,
        })),
    }
}

/// The conflict reported when the caller's rental did not move to `target`.
fn close_conflict(current: &str, target: RentalStatus) -> CoreError {
    match current.parse::<RentalStatus>() {
        // Still active: the update raced another writer.
        Ok(status) if status.can_transition_to(target) => {
            CoreError::Conflict("Rental was modified concurrently, retry".to_string())
        }
        _ => CoreError::Conflict(format!(
            "Cannot move rental from '{current}' to '{target}'"
        )),
    }
}
