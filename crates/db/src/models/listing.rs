//! Rental listing model and DTOs.

use rentify_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `listings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Listing {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub price: Decimal,
    pub purchase_price: Option<Decimal>,
    pub duration: String,
    pub condition: String,
    pub location: String,
    pub features: Vec<String>,
    pub image_url: Option<String>,
    pub free_delivery: bool,
    pub insurance: bool,
    pub instant_booking: bool,
    pub available_from: Timestamp,
    pub status: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new listing. New listings always start `pending`.
#[derive(Debug, Clone)]
pub struct CreateListing {
    pub owner_id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub price: Decimal,
    pub purchase_price: Option<Decimal>,
    pub duration: String,
    pub condition: String,
    pub location: String,
    pub features: Vec<String>,
    pub image_url: Option<String>,
    pub free_delivery: bool,
    pub insurance: bool,
    pub instant_booking: bool,
    /// Defaults to `NOW()` when absent.
    pub available_from: Option<Timestamp>,
}
