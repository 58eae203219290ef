//! Handlers for rental listings.
//!
//! Owners create listings that start `pending` and only appear in the
//! public catalogue once an admin approves them (see [`super::admin`]).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rentify_core::error::CoreError;
use rentify_core::listing::{
    validate_category, validate_condition, validate_duration, validate_prices,
};
use rentify_core::types::{DbId, Timestamp};
use rentify_db::models::listing::CreateListing;
use rentify_db::repositories::ListingRepo;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for `POST /api/v1/listings`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateListingRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
    pub category: String,
    #[validate(length(min = 1, max = 100))]
    pub subcategory: String,
    pub price: Decimal,
    pub purchase_price: Option<Decimal>,
    pub duration: String,
    pub condition: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub features: Vec<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub free_delivery: bool,
    #[serde(default)]
    pub insurance: bool,
    #[serde(default)]
    pub instant_booking: bool,
    pub available_from: Option<Timestamp>,
}

/// Body for `PUT /api/v1/listings/{id}/active`.
#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

impl CreateListingRequest {
    /// Field-level checks plus the domain value sets.
    fn check(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
        validate_category(&self.category).map_err(CoreError::Validation)?;
        validate_duration(&self.duration).map_err(CoreError::Validation)?;
        validate_condition(&self.condition).map_err(CoreError::Validation)?;
        validate_prices(self.price, self.purchase_price).map_err(CoreError::Validation)?;
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("title must not be blank".into()));
        }
        Ok(())
    }
}

fn listing_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Listing",
        id,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/listings
///
/// Submit a listing for approval.
pub async fn create_listing(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateListingRequest>,
) -> AppResult<impl IntoResponse> {
    input.check()?;

    let create = CreateListing {
        owner_id: user.user_id,
        title: input.title.trim().to_string(),
        description: input.description,
        category: input.category,
        subcategory: input.subcategory,
        price: input.price,
        purchase_price: input.purchase_price,
        duration: input.duration,
        condition: input.condition,
        location: input.location,
        features: input.features,
        image_url: input.image_url,
        free_delivery: input.free_delivery,
        insurance: input.insurance,
        instant_booking: input.instant_booking,
        available_from: input.available_from,
    };

    let listing = ListingRepo::create(&state.pool, &create).await?;

    tracing::info!(
        listing_id = %listing.id,
        owner_id = %user.user_id,
        category = %listing.category,
        "Listing submitted for approval",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: listing })))
}

/// GET /api/v1/listings
///
/// Approved, active listings, newest first.
pub async fn list_listings(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = params.resolve();
    let listings = ListingRepo::list_public(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: listings }))
}

/// GET /api/v1/listings/{id}
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let listing = ListingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| listing_not_found(id))?;
    Ok(Json(DataResponse { data: listing }))
}

/// GET /api/v1/listings/mine
///
/// The caller's listings in every approval state.
pub async fn list_my_listings(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let listings = ListingRepo::list_by_owner(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: listings }))
}

/// PUT /api/v1/listings/{id}/active
pub async fn set_listing_active(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetActiveRequest>,
) -> AppResult<impl IntoResponse> {
    let listing = ListingRepo::set_active(&state.pool, id, user.user_id, input.is_active)
        .await?
        .ok_or_else(|| listing_not_found(id))?;

    tracing::info!(listing_id = %id, is_active = input.is_active, "Listing visibility changed");

    Ok(Json(DataResponse { data: listing }))
}

/// DELETE /api/v1/listings/{id}
pub async fn delete_listing(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ListingRepo::delete(&state.pool, id, user.user_id)
        .await
        .map_err(delete_error)?;
    if !deleted {
        return Err(listing_not_found(id));
    }
    tracing::info!(listing_id = %id, owner_id = %user.user_id, "Listing deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Rentals reference their listing with `ON DELETE RESTRICT`, so a listing
/// that has been booked surfaces as a foreign key violation.
fn delete_error(err: sqlx::Error) -> AppError {
    let referenced = err
        .as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation());
    if referenced {
        AppError::Core(CoreError::Conflict(
            "Listing has rentals and cannot be deleted".to_string(),
        ))
    } else {
        AppError::Database(err)
    }
}
