//! Payment gateway integration.
//!
//! [`PaymentGateway`] is the seam the API talks to; [`razorpay::RazorpayClient`]
//! is the production implementation.

pub mod razorpay;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use razorpay::{RazorpayClient, RazorpayConfig};

/// Request to open a gateway order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    /// Amount in minor units (paise).
    pub amount: i64,
    pub currency: String,
    /// Merchant-side reference shown in the gateway dashboard.
    pub receipt: String,
    /// Free-form key/value notes stored on the order.
    pub notes: serde_json::Value,
}

/// An order as returned by the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    /// Amount in minor units, echoed back by the gateway.
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Errors from the gateway layer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Razorpay request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway answered with a non-2xx status.
    #[error("Razorpay API error: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

/// Operations the payment workflow needs from a gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key id handed to the browser checkout widget.
    fn key_id(&self) -> &str;

    /// Open an order for the given amount.
    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, GatewayError>;

    /// Check the checkout signature for an order/payment pair.
    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;
}
