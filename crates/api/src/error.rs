//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::{CheckoutError, EmailError, SignatureError};
use domain::DomainError;
use store::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// The request conflicts with current state.
    Conflict(String),
    /// An upstream provider failed.
    Dependency(String),
    /// The server is misconfigured; fails closed.
    Config(String),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Dependency(msg) => {
                tracing::warn!(error = %msg, "upstream provider failure");
                (StatusCode::BAD_GATEWAY, msg)
            }
            ApiError::Config(msg) => {
                tracing::error!(error = %msg, "configuration error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match &err {
            CheckoutError::Domain(_) | CheckoutError::AmountMismatch { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            CheckoutError::PetNotFound(_) | CheckoutError::AdoptionNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            CheckoutError::PetAlreadyAdopted(_) | CheckoutError::InvalidStatus { .. } => {
                ApiError::Conflict(err.to_string())
            }
            CheckoutError::OrderCreation(_) => ApiError::Dependency(err.to_string()),
            CheckoutError::Signature(SignatureError::MissingSecret) => {
                ApiError::Config(err.to_string())
            }
            CheckoutError::Signature(SignatureError::MissingField(_)) => {
                ApiError::BadRequest(err.to_string())
            }
            CheckoutError::MissingRecipient(_) => ApiError::BadRequest(err.to_string()),
            CheckoutError::Notification(EmailError::MissingApiKey) => {
                ApiError::Config(err.to_string())
            }
            CheckoutError::Notification(_) => ApiError::Dependency(err.to_string()),
            CheckoutError::Store(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
