//! Error types for the Drupal remote API client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while driving the remote Drupal API.
///
/// Each variant is a distinct failure kind and is never silently coerced
/// into another. The driver façade is the only place where this taxonomy
/// is flattened into a generic failure.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Requested sub-API name is neither built in nor registered.
    #[error("Undefined api instance called: \"{0}\"")]
    UnknownApi(String),

    /// Configuration option name is not in the recognized set.
    #[error("Undefined option called: \"{0}\"")]
    UnknownOption(String),

    /// Configuration option value has the wrong shape for its name.
    #[error("Invalid value for option \"{name}\": expected {expected}")]
    InvalidOptionValue {
        name: String,
        expected: &'static str,
    },

    /// `api_version` was set to a value outside the supported set.
    #[error("Invalid API version (\"{requested}\"), valid are: {supported}")]
    UnsupportedVersion {
        requested: String,
        supported: String,
    },

    /// Request quota exhausted; carries the applicable limit.
    #[error("API rate limit exceeded (limit: {limit})")]
    RateLimitExceeded { limit: u64 },

    /// The backend demands a second authentication factor.
    #[error("Two factor authentication required (type: {challenge})")]
    TwoFactorRequired { challenge: String },

    /// Status 400 with a structured message in the body.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Status 422 with field-level errors, rendered into one message.
    #[error("{0}")]
    ValidationFailed(String),

    /// Any other client or server error response.
    #[error("Request failed ({status}): {message}")]
    Request { status: u16, message: String },

    /// Domain-level semantic failure: non-200 logical response code or a
    /// missing expected `list` key.
    #[error("Remote API exception: {0}")]
    ResponseCode(String),

    /// A deletion did not yield an empty result.
    #[error("Remote API exception: deletion has failed: {0}")]
    Deletion(String),

    /// `authenticate` was called without a secret or a method.
    #[error("You need to specify an authentication method")]
    MissingAuthMethod,

    /// A credential produced a header value the transport cannot carry.
    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),

    /// Transport-level failure (connect, timeout, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A URL could not be built from the configured base and path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Whether this error originated from the response classifier, as
    /// opposed to configuration or transport problems.
    pub fn is_response_error(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded { .. }
                | Self::TwoFactorRequired { .. }
                | Self::BadRequest(_)
                | Self::ValidationFailed(_)
                | Self::Request { .. }
        )
    }

    /// Whether this error is a domain-level validation raised by a handler
    /// after a successful HTTP exchange.
    pub fn is_semantic_error(&self) -> bool {
        matches!(self, Self::ResponseCode(_) | Self::Deletion(_))
    }
}
