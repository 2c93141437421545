//! Errors surfaced by gateways to the host.

use thiserror::Error;

pub type Result<T, E = GatewayError> = std::result::Result<T, E>;

/// Everything a gateway operation can fail with.
///
/// None of these are retried by gateways. Retry policy, if any, belongs to the host.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A by-id lookup found no video.
    #[error("video not found: {0}")]
    NotFound(String),

    /// The service could not be reached, answered with a non-success status, or sent a body
    /// that could not be decoded.
    #[error("API response error: {message}")]
    ApiResponse {
        /// HTTP status, when the failure came from a response rather than the transport.
        status: Option<u16>,
        message: String,
    },

    /// An OAuth endpoint answered with an `error` field.
    #[error("identity provider error (code {code}): {message}")]
    IdentityProvider { code: i64, message: String },

    /// The collection method string does not name a supported operation.
    #[error("unknown collection method: {0}")]
    UnknownMethod(String),

    /// The collection method needs an option the caller did not supply.
    #[error("collection option `{0}` is required")]
    MissingOption(&'static str),

    /// The continuation token was not produced by this gateway.
    #[error("invalid continuation token: {0:?}")]
    InvalidMoreToken(String),
}

impl GatewayError {
    /// An [`GatewayError::ApiResponse`] that did not come with an HTTP status.
    pub fn api(message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status: None,
            message: message.into(),
        }
    }

    /// An [`GatewayError::ApiResponse`] for a non-success HTTP status.
    pub fn api_status(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status: Some(status),
            message: message.into(),
        }
    }

    /// The HTTP status behind this error, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiResponse { status, .. } => *status,
            _ => None,
        }
    }
}
