//! The payment workflow's persistence seam.
//!
//! Handlers talk to [`PaymentStore`] rather than [`PaymentRepo`] directly so
//! the create/verify/release flow can run against [`InMemoryPaymentStore`]
//! in tests and local development. [`PgPaymentStore`] is the production
//! implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rentify_core::payment::PaymentStatus;
use rentify_core::types::DbId;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::payment::{CapturePayment, CreatePayment, Payment};
use crate::repositories::PaymentRepo;
use crate::DbPool;

/// Storage operations behind the three payment functions.
///
/// Every transition method is a compare-and-set on the current status:
/// it returns `None` instead of applying a transition the row is not
/// eligible for.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Insert a `pending` payment.
    async fn create_pending(&self, input: &CreatePayment) -> Result<Payment, sqlx::Error>;

    /// Attach the gateway order id to a pending payment.
    async fn attach_order(
        &self,
        id: DbId,
        razorpay_order_id: &str,
    ) -> Result<Option<Payment>, sqlx::Error>;

    /// `pending → failed`. Returns `true` if the row changed.
    async fn mark_failed(&self, id: DbId) -> Result<bool, sqlx::Error>;

    /// `pending → captured`, matched by order id and owner.
    async fn capture(&self, input: &CapturePayment) -> Result<Option<Payment>, sqlx::Error>;

    /// `captured → released`, matched by rental id and owner.
    async fn release(&self, rental_id: DbId, user_id: DbId)
        -> Result<Option<Payment>, sqlx::Error>;

    async fn find_by_order_id(
        &self,
        razorpay_order_id: &str,
    ) -> Result<Option<Payment>, sqlx::Error>;

    /// A user's payments for one rental, oldest first.
    async fn list_for_rental(
        &self,
        rental_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<Payment>, sqlx::Error>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// [`PaymentStore`] backed by the `payments` table.
#[derive(Clone)]
pub struct PgPaymentStore {
    pool: DbPool,
}

impl PgPaymentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentStore for PgPaymentStore {
    async fn create_pending(&self, input: &CreatePayment) -> Result<Payment, sqlx::Error> {
        PaymentRepo::create(&self.pool, input).await
    }

    async fn attach_order(
        &self,
        id: DbId,
        razorpay_order_id: &str,
    ) -> Result<Option<Payment>, sqlx::Error> {
        PaymentRepo::attach_order(&self.pool, id, razorpay_order_id).await
    }

    async fn mark_failed(&self, id: DbId) -> Result<bool, sqlx::Error> {
        PaymentRepo::mark_failed(&self.pool, id).await
    }

    async fn capture(&self, input: &CapturePayment) -> Result<Option<Payment>, sqlx::Error> {
        PaymentRepo::capture(&self.pool, input).await
    }

    async fn release(
        &self,
        rental_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Payment>, sqlx::Error> {
        PaymentRepo::release(&self.pool, rental_id, user_id).await
    }

    async fn find_by_order_id(
        &self,
        razorpay_order_id: &str,
    ) -> Result<Option<Payment>, sqlx::Error> {
        PaymentRepo::find_by_order_id(&self.pool, razorpay_order_id).await
    }

    async fn list_for_rental(
        &self,
        rental_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        PaymentRepo::list_for_rental(&self.pool, rental_id, user_id).await
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// [`PaymentStore`] kept in a mutex-guarded map.
///
/// Rental payment flags are not modelled; only the payment rows are.
#[derive(Default)]
pub struct InMemoryPaymentStore {
    payments: Mutex<HashMap<DbId, Payment>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored payments in any status.
    pub async fn len(&self) -> usize {
        self.payments.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.payments.lock().await.is_empty()
    }
}

/// Whether `payment` may move to `next` from its current status.
fn can_move(payment: &Payment, next: PaymentStatus) -> bool {
    payment
        .status()
        .is_some_and(|current| current.can_transition_to(next))
}

/// Move `payment` to `next`. Returns `false`, leaving the row as it was,
/// when the lifecycle does not allow it.
fn advance(payment: &mut Payment, next: PaymentStatus) -> bool {
    let Some(Ok(next)) = payment.status().map(|current| current.transition_to(next)) else {
        return false;
    };
    payment.status = next.as_str().to_string();
    payment.updated_at = Utc::now();
    true
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn create_pending(&self, input: &CreatePayment) -> Result<Payment, sqlx::Error> {
        let now = Utc::now();
        let payment = Payment {
            id: Uuid::new_v4(),
            rental_id: input.rental_id,
            user_id: input.user_id,
            amount: input.amount,
            currency: input.currency.clone(),
            razorpay_order_id: None,
            razorpay_payment_id: None,
            razorpay_signature: None,
            payment_method: None,
            status: PaymentStatus::Pending.as_str().to_string(),
            created_at: now,
            updated_at: now,
            released_at: None,
        };
        self.payments
            .lock()
            .await
            .insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn attach_order(
        &self,
        id: DbId,
        razorpay_order_id: &str,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let mut payments = self.payments.lock().await;
        let Some(payment) = payments
            .get_mut(&id)
            .filter(|p| p.status() == Some(PaymentStatus::Pending))
        else {
            return Ok(None);
        };
        payment.razorpay_order_id = Some(razorpay_order_id.to_string());
        payment.updated_at = Utc::now();
        Ok(Some(payment.clone()))
    }

    async fn mark_failed(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let mut payments = self.payments.lock().await;
        Ok(payments
            .get_mut(&id)
            .is_some_and(|payment| advance(payment, PaymentStatus::Failed)))
    }

    async fn capture(&self, input: &CapturePayment) -> Result<Option<Payment>, sqlx::Error> {
        let mut payments = self.payments.lock().await;
        let Some(payment) = payments.values_mut().find(|p| {
            p.razorpay_order_id.as_deref() == Some(input.razorpay_order_id.as_str())
                && p.user_id == input.user_id
                && can_move(p, PaymentStatus::Captured)
        }) else {
            return Ok(None);
        };
        advance(payment, PaymentStatus::Captured);
        payment.razorpay_payment_id = Some(input.razorpay_payment_id.clone());
        payment.razorpay_signature = Some(input.razorpay_signature.clone());
        payment.payment_method = Some(input.payment_method.clone());
        Ok(Some(payment.clone()))
    }

    async fn release(
        &self,
        rental_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let mut payments = self.payments.lock().await;
        let Some(payment) = payments
            .values_mut()
            .filter(|p| {
                p.rental_id == rental_id
                    && p.user_id == user_id
                    && can_move(p, PaymentStatus::Released)
            })
            .min_by_key(|p| p.created_at)
        else {
            return Ok(None);
        };
        advance(payment, PaymentStatus::Released);
        payment.released_at = Some(payment.updated_at);
        Ok(Some(payment.clone()))
    }

    async fn find_by_order_id(
        &self,
        razorpay_order_id: &str,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let payments = self.payments.lock().await;
        Ok(payments
            .values()
            .find(|p| p.razorpay_order_id.as_deref() == Some(razorpay_order_id))
            .cloned())
    }

    async fn list_for_rental(
        &self,
        rental_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        let payments = self.payments.lock().await;
        let mut matching: Vec<Payment> = payments
            .values()
            .filter(|p| p.rental_id == rental_id && p.user_id == user_id)
            .cloned()
            .collect();
        matching.sort_by_key(|p| p.created_at);
        Ok(matching)
    }
}
