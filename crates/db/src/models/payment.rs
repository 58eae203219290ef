//! Payment model and DTOs.

use rentify_core::payment::PaymentStatus;
use rentify_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub rental_id: DbId,
    pub user_id: DbId,
    pub amount: Decimal,
    pub currency: String,
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
    pub payment_method: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub released_at: Option<Timestamp>,
}

impl Payment {
    /// Parsed lifecycle status. The table's check constraint keeps this
    /// in sync with [`PaymentStatus`].
    pub fn status(&self) -> Option<PaymentStatus> {
        self.status.parse().ok()
    }
}

/// DTO for inserting a new `pending` payment.
#[derive(Debug, Clone)]
pub struct CreatePayment {
    pub rental_id: DbId,
    pub user_id: DbId,
    pub amount: Decimal,
    pub currency: String,
}

/// DTO for capturing a verified payment.
#[derive(Debug, Clone)]
pub struct CapturePayment {
    pub razorpay_order_id: String,
    pub user_id: DbId,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    pub payment_method: String,
}
