use std::sync::Arc;
use std::time::Duration;

use rentify_core::payment::PaymentError;
use rentify_db::store::PaymentStore;
use rentify_gateway::PaymentGateway;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: rentify_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Persistence for the payment functions.
    pub payments: Arc<dyn PaymentStore>,
    /// Payment gateway; `None` when credentials are not configured.
    pub gateway: Option<Arc<dyn PaymentGateway>>,
}

impl AppState {
    /// The configured gateway, or [`PaymentError::CredentialsMissing`].
    pub fn gateway(&self) -> Result<&dyn PaymentGateway, PaymentError> {
        self.gateway
            .as_deref()
            .ok_or(PaymentError::CredentialsMissing)
    }

    /// How long a single request may run.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout_secs)
    }
}
