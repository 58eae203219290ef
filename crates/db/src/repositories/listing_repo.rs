//! Repository for the `listings` table.

use rentify_core::listing::{APPROVAL_APPROVED, APPROVAL_PENDING};
use rentify_core::types::DbId;
use sqlx::PgPool;

use crate::models::listing::{CreateListing, Listing};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, title, description, category, subcategory, price, \
                       purchase_price, duration, condition, location, features, image_url, \
                       free_delivery, insurance, instant_booking, available_from, status, \
                       is_active, created_at, updated_at";

/// Provides CRUD and moderation operations for listings.
pub struct ListingRepo;

impl ListingRepo {
    /// Insert a new listing in `pending` status, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateListing) -> Result<Listing, sqlx::Error> {
        let query = format!(
            "INSERT INTO listings (owner_id, title, description, category, subcategory, price,
                                   purchase_price, duration, condition, location, features,
                                   image_url, free_delivery, insurance, instant_booking,
                                   available_from, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                     COALESCE($16, NOW()), $17)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(input.owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.subcategory)
            .bind(input.price)
            .bind(input.purchase_price)
            .bind(&input.duration)
            .bind(&input.condition)
            .bind(&input.location)
            .bind(&input.features)
            .bind(&input.image_url)
            .bind(input.free_delivery)
            .bind(input.insurance)
            .bind(input.instant_booking)
            .bind(input.available_from)
            .bind(APPROVAL_PENDING)
            .fetch_one(pool)
            .await
    }

    /// Find a listing by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List approved, active listings, newest first.
    pub async fn list_public(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings
             WHERE status = $1 AND is_active = true
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(APPROVAL_APPROVED)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List every listing owned by a user regardless of status, newest first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// List listings awaiting moderation, oldest first.
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings WHERE status = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(APPROVAL_PENDING)
            .fetch_all(pool)
            .await
    }

    /// Toggle visibility of an owner's listing.
    ///
    /// Returns `None` if the listing does not exist or belongs to someone else.
    pub async fn set_active(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        is_active: bool,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET is_active = $3, updated_at = NOW()
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(is_active)
            .fetch_optional(pool)
            .await
    }

    /// Move a pending listing to `approved` or `rejected`.
    ///
    /// Returns `None` if the listing is missing or no longer pending.
    pub async fn moderate(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET status = $2, updated_at = NOW()
             WHERE id = $1 AND status = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(status)
            .bind(APPROVAL_PENDING)
            .fetch_optional(pool)
            .await
    }

    /// Delete an owner's listing. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
