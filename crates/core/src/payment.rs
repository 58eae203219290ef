//! Payment lifecycle: status values, allowed transitions, and the payment
//! failure taxonomy.
//!
//! ```text
//! pending ──► captured ──► released
//!    │
//!    └──────► failed
//! ```
//!
//! `released` and `failed` are terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Payment method recorded once the gateway signature has been verified.
pub const PAYMENT_METHOD_RAZORPAY: &str = "razorpay";

/// Lifecycle status of a payment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Row created, gateway order opened or being opened.
    Pending,
    /// Gateway signature verified; funds are held.
    Captured,
    /// Held funds released to the payee.
    Released,
    /// Gateway order could not be opened.
    Failed,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 4] = [
        PaymentStatus::Pending,
        PaymentStatus::Captured,
        PaymentStatus::Released,
        PaymentStatus::Failed,
    ];

    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Captured => "captured",
            PaymentStatus::Released => "released",
            PaymentStatus::Failed => "failed",
        }
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        !self.is_terminal()
            && matches!(
                (self, next),
                (PaymentStatus::Pending, PaymentStatus::Captured)
                    | (PaymentStatus::Pending, PaymentStatus::Failed)
                    | (PaymentStatus::Captured, PaymentStatus::Released)
            )
    }

    /// Validate a transition, returning [`PaymentError::InvalidTransition`]
    /// when it is not allowed.
    pub fn transition_to(self, next: PaymentStatus) -> Result<PaymentStatus, PaymentError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(PaymentError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PaymentStatus::Released | PaymentStatus::Failed)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown payment status '{s}'"))
    }
}

/// Failures specific to the payment workflow.
///
/// The display strings are the messages returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    #[error("Razorpay credentials not configured")]
    CredentialsMissing,

    #[error("Payment verification failed: Invalid signature")]
    InvalidSignature,

    /// No pending payment matched the order id and caller.
    #[error("Payment not found or already verified")]
    NotCapturable,

    /// No captured payment matched the rental id and caller.
    #[error("Payment not found or already released")]
    NotReleasable,

    #[error("Invalid payment transition from {from} to {to}")]
    InvalidTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },
}
