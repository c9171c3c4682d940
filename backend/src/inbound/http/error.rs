//! HTTP error payload and status mapping.
//!
//! [`ApiError`] is the wire form of a [`DomainError`]: the domain code and
//! message plus the trace identifier of the request that produced it, so a
//! caller can quote the identifier when reporting a failure.

use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::domain::{DomainError, ErrorCode};
use crate::middleware::TraceId;

/// Result alias used by the HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// JSON error body returned by every failing route.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    /// Wrap a domain error, capturing the trace identifier in scope.
    ///
    /// Internal errors are logged with their original message and redacted
    /// on the wire.
    #[must_use]
    pub fn from_domain(error: DomainError) -> Self {
        let trace_id = TraceId::current().map(|id| id.to_string());
        let message = if error.code() == ErrorCode::InternalError {
            error!(
                code = ?error.code(),
                message = error.message(),
                "internal error surfaced to the HTTP layer"
            );
            "Internal server error".to_owned()
        } else {
            error.message().to_owned()
        };
        Self {
            code: error.code(),
            message,
            trace_id,
            details: error.details().cloned(),
        }
    }

    /// Shorthand for a 400 validation failure raised inside a handler.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::from_domain(DomainError::invalid_request(message))
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self::from_domain(error)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.code {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::RetriesExhausted => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::UpstreamError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code()).json(self);
        if let Some(trace_id) = self
            .trace_id
            .as_deref()
            .and_then(|id| HeaderValue::from_str(id).ok())
        {
            response
                .headers_mut()
                .insert(HeaderName::from_static("trace-id"), trace_id);
        }
        response
    }
}
