//! Error types for revlens

/// Result type alias using revlens' Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for revlens operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No reviews are loaded, so nothing can be selected
    #[error("no reviews available")]
    EmptyCollection,

    /// An analysis was requested before any review was selected
    #[error("please select a review first")]
    NoReviewSelected,

    /// Network failure, non-2xx status, or exhausted retries
    #[error("remote service unavailable: {0}")]
    RemoteUnavailable(String),

    /// Quota or rate limit hit (HTTP 402/429)
    #[error("rate limit exceeded (HTTP {status}): {message}")]
    RateLimited { status: u16, message: String },

    /// Credential rejected (HTTP 401/403)
    #[error("request not authorized (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// Response body matched none of the known payload shapes
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Review file could not be read or parsed
    #[error("review source error: {0}")]
    ReviewSource(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Credential store errors
    #[error("credential store error: {0}")]
    Credential(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new remote-unavailable error
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::RemoteUnavailable(msg.into())
    }

    /// Create a new malformed-response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a new review source error
    pub fn review_source(msg: impl Into<String>) -> Self {
        Self::ReviewSource(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new credential store error
    pub fn credential(msg: impl Into<String>) -> Self {
        Self::Credential(msg.into())
    }

    /// Whether this error must reach the user instead of being absorbed by
    /// the local fallback.
    ///
    /// Quota and authorization failures are surfaced so the user can fix
    /// their token; everything else degrades to the local heuristic.
    pub fn is_surfaced(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Unauthorized { .. })
    }
}
