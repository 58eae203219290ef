//! Repository for the `rentals` table.

use rentify_core::rental::RentalStatus;
use rentify_core::types::DbId;
use sqlx::PgPool;

use crate::models::rental::{CreateRental, Rental};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, listing_id, renter_id, start_date, end_date, total_cost, status, \
                       payment_held, payment_released, created_at, updated_at";

/// Provides booking operations for rentals.
pub struct RentalRepo;

impl RentalRepo {
    /// Insert a new `active` rental, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateRental) -> Result<Rental, sqlx::Error> {
        let query = format!(
            "INSERT INTO rentals (listing_id, renter_id, start_date, end_date, total_cost, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rental>(&query)
            .bind(input.listing_id)
            .bind(input.renter_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.total_cost)
            .bind(RentalStatus::Active.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Rental>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rentals WHERE id = $1");
        sqlx::query_as::<_, Rental>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a renter's bookings, newest first.
    pub async fn list_by_renter(pool: &PgPool, renter_id: DbId) -> Result<Vec<Rental>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rentals WHERE renter_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Rental>(&query)
            .bind(renter_id)
            .fetch_all(pool)
            .await
    }

    /// List all bookings across users, newest first.
    pub async fn list_all(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Rental>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rentals ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Rental>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Close an active rental owned by `renter_id`.
    ///
    /// Returns `None` if the rental is missing, owned by someone else, or
    /// already closed.
    pub async fn close(
        pool: &PgPool,
        id: DbId,
        renter_id: DbId,
        status: RentalStatus,
    ) -> Result<Option<Rental>, sqlx::Error> {
        let query = format!(
            "UPDATE rentals SET status = $3, updated_at = NOW()
             WHERE id = $1 AND renter_id = $2 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rental>(&query)
            .bind(id)
            .bind(renter_id)
            .bind(status.as_str())
            .bind(RentalStatus::Active.as_str())
            .fetch_optional(pool)
            .await
    }
}
