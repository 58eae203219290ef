//! REST client for the Razorpay Orders API.

use std::time::Duration;

use async_trait::async_trait;
use rentify_core::signature::verify_payment_signature;

use crate::{GatewayError, GatewayOrder, OrderRequest, PaymentGateway};

/// Production API base URL.
pub const DEFAULT_API_URL: &str = "https://api.razorpay.com/v1";

/// HTTP request timeout for a single gateway call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Razorpay credentials and endpoint.
#[derive(Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub api_url: String,
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl RazorpayConfig {
    /// Load credentials from environment variables.
    ///
    /// | Env Var               | Required | Default                        |
    /// |-----------------------|----------|--------------------------------|
    /// | `RAZORPAY_KEY_ID`     | no       | --                             |
    /// | `RAZORPAY_KEY_SECRET` | no       | --                             |
    /// | `RAZORPAY_API_URL`    | no       | `https://api.razorpay.com/v1`  |
    ///
    /// Returns `None` unless both the key id and secret are set and
    /// non-empty; payment calls then fail with a configuration error.
    /// Signature verification only reads the secret, but a half-configured
    /// gateway counts as unconfigured for every function.
    pub fn from_env() -> Option<Self> {
        let key_id = std::env::var("RAZORPAY_KEY_ID").ok()?;
        let key_secret = std::env::var("RAZORPAY_KEY_SECRET").ok()?;
        let api_url =
            std::env::var("RAZORPAY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(key_id, key_secret, api_url)
    }

    /// Build a config, rejecting empty credentials.
    pub fn new(key_id: String, key_secret: String, api_url: String) -> Option<Self> {
        if key_id.trim().is_empty() || key_secret.trim().is_empty() {
            return None;
        }
        Some(Self {
            key_id,
            key_secret,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

/// HTTP client for the Razorpay API.
pub struct RazorpayClient {
    client: reqwest::Client,
    config: RazorpayConfig,
}

impl RazorpayClient {
    pub fn new(config: RazorpayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    /// Ensure the response has a success status code, capturing the body
    /// text of failures.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    fn key_id(&self) -> &str {
        &self.config.key_id
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, GatewayError> {
        let response = self
            .client
            .post(format!("{}/orders", self.config.api_url))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(request)
            .send()
            .await?;

        let response = Self::ensure_success(response).await.inspect_err(|e| {
            tracing::error!(error = %e, receipt = %request.receipt, "Razorpay order creation failed");
        })?;
        let order = response.json::<GatewayOrder>().await?;
        tracing::info!(order_id = %order.id, amount = order.amount, "Razorpay order created");
        Ok(order)
    }

    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        verify_payment_signature(&self.config.key_secret, order_id, payment_id, signature)
    }
}

#[cfg(test)]
mod tests {
    use rentify_core::signature::compute_payment_signature;

    use super::*;

    fn config() -> RazorpayConfig {
        RazorpayConfig::new(
            "rzp_test_key".to_string(),
            "rzp_test_secret".to_string(),
            "http://127.0.0.1:9/v1/".to_string(),
        )
        .expect("non-empty credentials")
    }

    #[test]
    fn empty_credentials_are_unset() {
        assert!(RazorpayConfig::new(String::new(), "s".into(), DEFAULT_API_URL.into()).is_none());
        assert!(RazorpayConfig::new("k".into(), "  ".into(), DEFAULT_API_URL.into()).is_none());
    }

    #[test]
    fn trailing_slash_trimmed_from_api_url() {
        assert_eq!(config().api_url, "http://127.0.0.1:9/v1");
    }

    #[test]
    fn debug_output_redacts_secret() {
        let debug = format!("{:?}", config());
        assert!(debug.contains("rzp_test_key"));
        assert!(!debug.contains("rzp_test_secret"));
    }

    #[test]
    fn client_verifies_with_its_own_secret() {
        let client = RazorpayClient::new(config()).unwrap();
        let sig = compute_payment_signature("rzp_test_secret", "order_1", "pay_1");
        assert!(client.verify_payment_signature("order_1", "pay_1", &sig));
        assert!(!client.verify_payment_signature("order_1", "pay_2", &sig));
        assert_eq!(client.key_id(), "rzp_test_key");
    }

    #[test]
    fn api_error_display_carries_body() {
        let err = GatewayError::Api {
            status: 400,
            body: r#"{"error":{"description":"amount exceeds maximum"}}"#.to_string(),
        };
        assert!(err.to_string().starts_with("Razorpay API error: "));
        assert!(err.to_string().contains("amount exceeds maximum"));
    }

    #[tokio::test]
    async fn unreachable_gateway_is_a_request_error() {
        let client = RazorpayClient::new(config()).unwrap();
        let request = OrderRequest {
            amount: 100,
            currency: "INR".to_string(),
            receipt: "rcpt_test".to_string(),
            notes: serde_json::json!({}),
        };
        let err = client.create_order(&request).await.unwrap_err();
        assert!(matches!(err, GatewayError::Request(_)));
    }
}
