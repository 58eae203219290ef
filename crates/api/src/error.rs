use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rentify_core::error::CoreError;
use rentify_core::payment::PaymentError;
use rentify_gateway::GatewayError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `rentify_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A payment workflow failure.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// The payment gateway rejected or failed a request.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),

    /// The handler did not finish within the configured request timeout.
    #[error("Request timed out")]
    Timeout,
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    /// Resolve the HTTP status, machine-readable code and client-facing
    /// message. Internal details are logged here and never returned.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Payment workflow ---
            AppError::Payment(err) => {
                let (status, code) = match err {
                    PaymentError::CredentialsMissing => {
                        tracing::error!("Payment gateway credentials are not configured");
                        (StatusCode::SERVICE_UNAVAILABLE, "GATEWAY_UNCONFIGURED")
                    }
                    PaymentError::InvalidSignature => {
                        (StatusCode::BAD_REQUEST, "INVALID_SIGNATURE")
                    }
                    PaymentError::NotCapturable | PaymentError::NotReleasable => {
                        (StatusCode::NOT_FOUND, "NOT_FOUND")
                    }
                    PaymentError::InvalidTransition { .. } => {
                        (StatusCode::CONFLICT, "CONFLICT")
                    }
                };
                (status, code, err.to_string())
            }

            // --- Gateway ---
            AppError::Gateway(err) => {
                tracing::error!(error = %err, "Payment gateway error");
                (StatusCode::BAD_GATEWAY, "GATEWAY_ERROR", err.to_string())
            }

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
            AppError::Timeout => {
                tracing::warn!("Request timed out");
                (StatusCode::REQUEST_TIMEOUT, "TIMEOUT", self.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Foreign key violations map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            match db_err.code().as_deref() {
                // PostgreSQL unique constraint violation
                Some("23505") => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    if constraint.starts_with("uq_") {
                        return (
                            StatusCode::CONFLICT,
                            "CONFLICT",
                            format!("Duplicate value violates unique constraint: {constraint}"),
                        );
                    }
                }
                // PostgreSQL foreign key violation
                Some("23503") => {
                    return (
                        StatusCode::BAD_REQUEST,
                        "BAD_REQUEST",
                        "Referenced resource does not exist".to_string(),
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

// ---------------------------------------------------------------------------
// Payment function errors
// ---------------------------------------------------------------------------

/// Error type for the `/functions/v1` payment endpoints.
///
/// Deployed clients expect every failure from these endpoints as
/// `500 {"error": "<message>"}`, whatever the cause. The message is the one
/// [`AppError`] would put in its body, except that authentication failures
/// all read `Unauthorized`.
#[derive(Debug)]
pub struct FunctionError(pub AppError);

/// Convenience type alias for payment function return values.
pub type FunctionResult<T> = Result<T, FunctionError>;

impl From<AppError> for FunctionError {
    fn from(err: AppError) -> Self {
        FunctionError(err)
    }
}

impl From<CoreError> for FunctionError {
    fn from(err: CoreError) -> Self {
        FunctionError(err.into())
    }
}

impl From<PaymentError> for FunctionError {
    fn from(err: PaymentError) -> Self {
        FunctionError(err.into())
    }
}

impl From<GatewayError> for FunctionError {
    fn from(err: GatewayError) -> Self {
        FunctionError(err.into())
    }
}

impl From<sqlx::Error> for FunctionError {
    fn from(err: sqlx::Error) -> Self {
        FunctionError(err.into())
    }
}

impl From<JsonRejection> for FunctionError {
    fn from(rejection: JsonRejection) -> Self {
        FunctionError(rejection.into())
    }
}

impl FunctionError {
    /// The message placed in the `error` field.
    pub fn message(&self) -> String {
        match &self.0 {
            AppError::Core(CoreError::Unauthorized(_)) => "Unauthorized".to_string(),
            other => other.parts().2,
        }
    }
}

impl IntoResponse for FunctionError {
    fn into_response(self) -> Response {
        let message = self.message();
        tracing::warn!(error = %self.0, "Payment function failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "error": message })),
        )
            .into_response()
    }
}
