//! Error types for the listings API client.

use thiserror::Error;

/// Errors that can occur while talking to the listings API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// A response body could not be decoded as the expected JSON shape.
    #[error("failed to decode {label} response: {source}")]
    Decode {
        /// Which document failed to decode (user, lineup, channels, schedule).
        label: String,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The login endpoint rejected the credentials.
    ///
    /// A successful login answers 200 with a session cookie; anything else,
    /// including a 200 without `Set-Cookie`, lands here.
    #[error("login rejected (HTTP {status})\n  Suggestion: check TITANTV_USERNAME and TITANTV_PASSWORD")]
    LoginRejected {
        /// The HTTP status code of the login response.
        status: u16,
    },

    /// A required document came back without its payload key.
    #[error("no {key} found in {label} response")]
    MissingData {
        /// Which document was empty.
        label: String,
        /// The payload key that was absent or empty.
        key: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Creates a network or timeout error from a reqwest error.
    pub fn request(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a decode error.
    pub fn decode(label: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            label: label.into(),
            source,
        }
    }

    /// Creates a missing-payload error.
    pub fn missing_data(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingData {
            label: label.into(),
            key: key.into(),
        }
    }
}

// Note on From trait implementations:
// We intentionally do NOT implement `From<reqwest::Error>` because the
// variants require context (the URL) that the source error does not carry.
// The helper constructors are the pattern here.
