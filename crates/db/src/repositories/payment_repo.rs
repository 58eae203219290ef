//! Repository for the `payments` table.
//!
//! Every status change is a single conditional `UPDATE … WHERE status = …`
//! so concurrent callers cannot apply the same transition twice. Capture and
//! release also flip the owning rental's payment flags inside the same
//! transaction.

use rentify_core::payment::PaymentStatus;
use rentify_core::types::DbId;
use sqlx::PgPool;

use crate::models::payment::{CapturePayment, CreatePayment, Payment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, rental_id, user_id, amount, currency, razorpay_order_id, \
                       razorpay_payment_id, razorpay_signature, payment_method, status, \
                       created_at, updated_at, released_at";

/// Provides lifecycle operations for payments.
pub struct PaymentRepo;

impl PaymentRepo {
    /// Insert a new `pending` payment, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePayment) -> Result<Payment, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments (rental_id, user_id, amount, currency, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(input.rental_id)
            .bind(input.user_id)
            .bind(input.amount)
            .bind(&input.currency)
            .bind(PaymentStatus::Pending.as_str())
            .fetch_one(pool)
            .await
    }

    /// Record the gateway order id on a pending payment.
    ///
    /// Returns `None` if the payment does not exist or has left `pending`.
    pub async fn attach_order(
        pool: &PgPool,
        id: DbId,
        razorpay_order_id: &str,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!(
            "UPDATE payments SET razorpay_order_id = $2, updated_at = NOW()
             WHERE id = $1 AND status = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .bind(razorpay_order_id)
            .bind(PaymentStatus::Pending.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Move a pending payment to `failed`. Returns `true` if the row changed.
    pub async fn mark_failed(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE payments SET status = $2, updated_at = NOW() WHERE id = $1 AND status = $3",
        )
        .bind(id)
        .bind(PaymentStatus::Failed.as_str())
        .bind(PaymentStatus::Pending.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Capture the caller's pending payment for a gateway order and mark the
    /// rental's payment as held.
    ///
    /// Returns `None` when no pending payment matches the order id and user.
    pub async fn capture(
        pool: &PgPool,
        input: &CapturePayment,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE payments
             SET razorpay_payment_id = $3, razorpay_signature = $4, payment_method = $5,
                 status = $6, updated_at = NOW()
             WHERE razorpay_order_id = $1 AND user_id = $2 AND status = $7
             RETURNING {COLUMNS}"
        );
        let payment = sqlx::query_as::<_, Payment>(&query)
            .bind(&input.razorpay_order_id)
            .bind(input.user_id)
            .bind(&input.razorpay_payment_id)
            .bind(&input.razorpay_signature)
            .bind(&input.payment_method)
            .bind(PaymentStatus::Captured.as_str())
            .bind(PaymentStatus::Pending.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        match &payment {
            Some(payment) => {
                sqlx::query(
                    "UPDATE rentals SET payment_held = true, updated_at = NOW() WHERE id = $1",
                )
                .bind(payment.rental_id)
                .execute(&mut *tx)
                .await?;
            }
            None => tracing::debug!(
                order_id = %input.razorpay_order_id,
                user_id = %input.user_id,
                "No pending payment matched capture",
            ),
        }

        tx.commit().await?;
        Ok(payment)
    }

    /// Release the caller's captured payment for a rental and flip the
    /// rental from held to released.
    ///
    /// Returns `None` when nothing is captured (never paid, or already
    /// released).
    pub async fn release(
        pool: &PgPool,
        rental_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE payments
             SET status = $3, released_at = NOW(), updated_at = NOW()
             WHERE id = (
                 SELECT id FROM payments
                 WHERE rental_id = $1 AND user_id = $2 AND status = $4
                 ORDER BY created_at
                 LIMIT 1
                 FOR UPDATE
             ) AND status = $4
             RETURNING {COLUMNS}"
        );
        let payment = sqlx::query_as::<_, Payment>(&query)
            .bind(rental_id)
            .bind(user_id)
            .bind(PaymentStatus::Released.as_str())
            .bind(PaymentStatus::Captured.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        if payment.is_none() {
            tracing::debug!(%rental_id, %user_id, "No captured payment matched release");
        } else {
            sqlx::query(
                "UPDATE rentals SET payment_held = false, payment_released = true, updated_at = NOW()
                 WHERE id = $1",
            )
            .bind(rental_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(payment)
    }

    /// Find a payment by its gateway order id.
    pub async fn find_by_order_id(
        pool: &PgPool,
        razorpay_order_id: &str,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE razorpay_order_id = $1");
        sqlx::query_as::<_, Payment>(&query)
            .bind(razorpay_order_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's payments for a rental, oldest first.
    pub async fn list_for_rental(
        pool: &PgPool,
        rental_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments
             WHERE rental_id = $1 AND user_id = $2
             ORDER BY created_at"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(rental_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
