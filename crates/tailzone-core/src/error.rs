use thiserror::Error;

/// Result type alias for peer-status operations
pub type Result<T> = std::result::Result<T, StatusError>;

/// Errors that can occur when fetching peer status
#[derive(Error, Debug)]
pub enum StatusError {
    /// The status API answered with a non-success status code
    #[error("status API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Body or error message returned by the API
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request timed out
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl StatusError {
    /// Returns true if the next poll may succeed without intervention
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Connection(_) | Self::Http(_))
            || matches!(self, Self::Api { code, .. } if *code >= 500)
    }

    /// Returns the HTTP status code if this is an API error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
