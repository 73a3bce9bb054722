//! # API Error Types
//!
//! Typed error handling for the bistro ordering backend.
//! Fallible operations return `Result<T, ApiError>`.

use thiserror::Error;

/// Core error type for all API operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// No credential on the request at all
    #[error("unauthorized access")]
    Unauthenticated,

    /// Credential present but the signature does not verify or the
    /// payload is malformed. Same message as `ExpiredToken` so callers
    /// cannot tell which check failed.
    #[error("forbidden access")]
    InvalidToken,

    /// Credential present but past its expiry
    #[error("forbidden access")]
    ExpiredToken,

    /// Authenticated but insufficiently privileged, or accessing another
    /// identity's scoped data
    #[error("forbidden access")]
    Forbidden,

    /// Lookup by identifier yielded nothing where a value was expected
    #[error("{what} not found")]
    NotFound { what: String },

    /// Invalid request data
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Payment processor rejected the call
    #[error("gateway error [{provider}]: {message}")]
    Gateway { provider: String, message: String },

    /// Network/HTTP error communicating with the payment processor
    #[error("network error: {0}")]
    Network(String),

    /// Document store failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors (missing keys, invalid config)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unauthenticated => 401,
            ApiError::InvalidToken => 401,
            ApiError::ExpiredToken => 401,
            ApiError::Forbidden => 403,
            ApiError::NotFound { .. } => 404,
            ApiError::InvalidRequest(_) => 400,
            ApiError::Gateway { .. } => 502,
            ApiError::Network(_) => 503,
            ApiError::Store(_) => 500,
            ApiError::Configuration(_) => 500,
            ApiError::Serialization(_) => 500,
        }
    }

    /// Authorization failures halt the request pipeline before the
    /// handler runs; everything else is a handler-level failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthenticated
                | ApiError::InvalidToken
                | ApiError::ExpiredToken
                | ApiError::Forbidden
        )
    }
}

/// Document store failure, kept separate so store backends never need to
/// know about HTTP or payment concerns.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend-level failure (connection, query, write)
    #[error("backend error: {0}")]
    Backend(String),

    /// Stored document could not be mapped to a domain type
    #[error("malformed document: {0}")]
    Malformed(String),
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
