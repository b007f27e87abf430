use reqwest::StatusCode;
use thiserror::Error;

/// Classified failure of an API round trip.
///
/// Every failure out of the fetch, cache and resolver layers is exactly one
/// of these variants; nothing below the UI swallows or remaps them. Each
/// variant carries the raw cause (response body or transport message) for
/// diagnostics.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Bad Request: {0}")]
    InvalidRequest(String),

    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Unauthorized(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

impl ApiError {
    /// Classify a non-success HTTP response by status code alone. The body
    /// is surfaced untouched as the cause.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 => ApiError::InvalidRequest(body),
            401 => ApiError::Unauthenticated(body),
            403 => ApiError::Unauthorized(body),
            404 => ApiError::NotFound(body),
            500 => ApiError::InternalServerError(body),
            code => {
                tracing::error!("Unrecognized API status {}: {}", code, body);
                ApiError::UnknownError(format!("HTTP {}: {}", code, body))
            }
        }
    }

    /// Classify a transport-level failure. Any error without a status code
    /// means no response arrived (DNS, timeout, connection refused or reset
    /// mid-request) and is a network error; a request that could not even
    /// be constructed is unknown and gets logged.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_status(status, err.to_string());
        }
        if err.is_builder() {
            tracing::error!("Malformed request: {:?}", err);
            return ApiError::UnknownError(err.to_string());
        }
        ApiError::NetworkError(err.to_string())
    }

    /// Malformed or unexpected response body.
    pub fn decode(context: &str, err: impl std::fmt::Display) -> Self {
        tracing::error!("Failed to decode {}: {}", context, err);
        ApiError::UnknownError(format!("failed to decode {}: {}", context, err))
    }
}
