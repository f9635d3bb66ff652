//! Client error types.
//!
//! Every failure the client can report is a variant of [`Error`], so callers
//! can match exhaustively instead of inspecting message strings.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The access URL failed scheme, host, path or credential validation.
    #[error("Invalid access URL: {0}")]
    InvalidAccessUrl(#[from] InvalidAccessUrl),

    /// The claim endpoint answered 403: the setup token was already redeemed.
    #[error("Setup token already used")]
    SetupTokenUsed,

    /// The bridge answered with an unexpected status.
    #[error("Failed to {endpoint}: {status}, {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
        /// Logical name of the call that failed.
        endpoint: &'static str,
    },

    /// A setup token or response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The request never produced a response (connect, timeout, TLS, ...).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Reason an access URL was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAccessUrl {
    /// The text is not a URL at all.
    #[error("malformed URL: {0}")]
    Malformed(#[from] url::ParseError),

    #[error("not HTTPS")]
    NotHttps,

    #[error("wrong host")]
    WrongHost,

    #[error("wrong path")]
    WrongPath,

    #[error("missing username")]
    MissingUsername,

    #[error("missing password")]
    MissingPassword,

    /// Percent-decoded credentials are not valid UTF-8.
    #[error("credentials are not valid UTF-8")]
    CredentialsNotUtf8,
}

/// Decoding failures, kept apart from server rejections.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Setup token is not URL-safe base64.
    #[error("setup token is not valid base64: {0}")]
    SetupTokenBase64(#[from] base64::DecodeError),

    /// Setup token decoded to bytes that are not UTF-8.
    #[error("setup token is not valid UTF-8: {0}")]
    SetupTokenUtf8(#[from] std::string::FromUtf8Error),

    /// Setup token decoded to text that is not a claim URL.
    #[error("setup token does not contain a claim URL: {0}")]
    ClaimUrl(url::ParseError),

    /// Response body did not match the expected JSON schema.
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Map a non-OK status to an API error for the named endpoint.
    pub(crate) fn api(status: reqwest::StatusCode, body: String, endpoint: &'static str) -> Self {
        Error::Api {
            status: status.as_u16(),
            body,
            endpoint,
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::SetupTokenUsed => Some(403),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Api { status: 401, .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status >= 500)
    }

    /// Check if repeating the same call could plausibly succeed.
    ///
    /// Validation, decoding and used-token failures are terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Api { status, .. } => crate::retry::is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
