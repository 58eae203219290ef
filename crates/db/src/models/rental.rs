//! Rental booking model and DTOs.

use rentify_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `rentals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rental {
    pub id: DbId,
    pub listing_id: DbId,
    pub renter_id: DbId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub total_cost: Decimal,
    pub status: String,
    pub payment_held: bool,
    pub payment_released: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for booking a rental. `total_cost` is computed by the caller from
/// the listing price.
#[derive(Debug, Clone)]
pub struct CreateRental {
    pub listing_id: DbId,
    pub renter_id: DbId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub total_cost: Decimal,
}
