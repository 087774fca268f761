//! Spotify API-specific error types and response classification.

use reqwest::StatusCode;
use std::time::Duration;

/// Errors that can occur during Spotify API operations.
///
/// HTTP failures are classified once per failed call by [`classify`] and then
/// drive both the retry policy and the messages shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum SpotifyError {
    /// The access token is missing, expired or revoked (401)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The token lacks the scope for this request (403)
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Resource does not exist (404)
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Rate limit exceeded (429)
    #[error("Rate limited (retry after {retry_after:?}): {message}")]
    RateLimited {
        retry_after: Option<Duration>,
        message: String,
    },

    /// Spotify failed to handle the request (5xx)
    #[error("Server error (status {status}): {message}")]
    Server { status: u16, message: String },

    /// No response was received (timeout, connection refused, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// Any other 4xx response
    #[error("Client error (status {status}): {message}")]
    Client { status: u16, message: String },

    /// Failed to deserialize API response
    #[error("Failed to deserialize API response: {0}")]
    Deserialization(String),

    /// Generic API error
    #[error("Spotify API error: {0}")]
    Other(String),
}

/// Coarse category of a failed call, used where only the class matters.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    Forbidden,
    NotFound,
    RateLimited,
    Server,
    Network,
    Client,
    Other,
}

/// Map a failed HTTP response to a classified error.
///
pub fn classify(status: StatusCode, retry_after: Option<Duration>, message: Option<String>) -> SpotifyError {
    let message = message.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    });
    match status.as_u16() {
        401 => SpotifyError::Authentication { message },
        403 => SpotifyError::Forbidden { message },
        404 => SpotifyError::NotFound { message },
        429 => SpotifyError::RateLimited {
            retry_after,
            message,
        },
        code if code >= 500 => SpotifyError::Server {
            status: code,
            message,
        },
        code => SpotifyError::Client {
            status: code,
            message,
        },
    }
}

impl SpotifyError {
    /// Return the category of this error.
    ///
    pub fn kind(&self) -> ErrorKind {
        match self {
            SpotifyError::Authentication { .. } => ErrorKind::Authentication,
            SpotifyError::Forbidden { .. } => ErrorKind::Forbidden,
            SpotifyError::NotFound { .. } => ErrorKind::NotFound,
            SpotifyError::RateLimited { .. } => ErrorKind::RateLimited,
            SpotifyError::Server { .. } => ErrorKind::Server,
            SpotifyError::Network(_) => ErrorKind::Network,
            SpotifyError::Client { .. } => ErrorKind::Client,
            SpotifyError::Deserialization(_) | SpotifyError::Other(_) => ErrorKind::Other,
        }
    }

    /// Whether the retry policy may attempt the call again.
    ///
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::RateLimited | ErrorKind::Server | ErrorKind::Network
        )
    }

    pub fn is_authentication(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }

    /// Return the HTTP status of the failed response, if one was received.
    ///
    pub fn status(&self) -> Option<u16> {
        match self {
            SpotifyError::Authentication { .. } => Some(401),
            SpotifyError::Forbidden { .. } => Some(403),
            SpotifyError::NotFound { .. } => Some(404),
            SpotifyError::RateLimited { .. } => Some(429),
            SpotifyError::Server { status, .. } | SpotifyError::Client { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Return the fixed message shown to the user for this error.
    ///
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Authentication => "Your session has expired. Please log in again.",
            ErrorKind::Forbidden => "You don't have permission to do that.",
            ErrorKind::NotFound => "The requested item could not be found.",
            ErrorKind::RateLimited => "Too many requests. Please wait a moment and try again.",
            ErrorKind::Server => "Spotify is temporarily unavailable. Please try again later.",
            ErrorKind::Network => "Network error. Please check your connection and try again.",
            ErrorKind::Client | ErrorKind::Other => "Something went wrong. Please try again.",
        }
    }
}

impl From<reqwest::Error> for SpotifyError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            SpotifyError::Deserialization(error.to_string())
        } else {
            SpotifyError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for SpotifyError {
    fn from(error: serde_json::Error) -> Self {
        SpotifyError::Deserialization(error.to_string())
    }
}
