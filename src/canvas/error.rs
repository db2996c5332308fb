//! Error types for the Canvas API client.

use thiserror::Error;

/// A specialized Result type for Canvas API operations.
pub type Result<T> = std::result::Result<T, CanvasError>;

/// Message used for every request that never produced a response.
pub const NO_RESPONSE_MESSAGE: &str = "No response received from Canvas API";

/// Errors returned by [`CanvasClient`](super::CanvasClient) requests.
///
/// Every failed request ends up as exactly one of these two kinds: either no
/// response was received at all, or Canvas answered with a status the retry
/// policy could not resolve.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// The request never reached Canvas or no response came back
    /// (DNS failure, connection reset, client-side timeout).
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Canvas answered with a non-2xx status (or an unreadable 2xx body).
    #[error("Canvas API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by Canvas.
        status: u16,
        /// Human-readable message extracted from the error body.
        message: String,
        /// Raw response body, as returned by Canvas.
        body: String,
    },
}

impl CanvasError {
    /// Create a transport error from a reqwest failure.
    pub fn transport(source: reqwest::Error) -> Self {
        Self::Transport {
            message: NO_RESPONSE_MESSAGE.to_string(),
            source: Some(source),
        }
    }

    /// Create a transport error for a request that could not be issued.
    pub fn unsendable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// HTTP status carried by an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    /// Raw response body carried by an API error.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } => Some(body),
            Self::Transport { .. } => None,
        }
    }

    /// Whether this error means no response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Errors raised while constructing a [`CanvasClient`](super::CanvasClient).
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid Canvas base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Canvas API token contains characters not allowed in an HTTP header")]
    InvalidToken,

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
