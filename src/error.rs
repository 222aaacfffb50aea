//! Error types for collage generation.

use thiserror::Error;

/// Main error type for all collage operations.
#[derive(Debug, Error)]
pub enum CollageError {
    /// Rows, columns, entity, period or username out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Invalid API key, suspended key or rejected session.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The requested Last.fm user does not exist.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Network failure or service outage while fetching top entities.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// A cover image could not be downloaded or decoded.
    #[error("Image fetch failed for {url}: {reason}")]
    ImageFetch {
        /// URL that was requested.
        url: String,
        /// What went wrong.
        reason: String,
    },

    /// Last.fm error code without a more specific mapping.
    #[error("API error {code}: {message}")]
    Api {
        /// Last.fm numeric error code.
        code: i64,
        /// Message sent along with the code.
        message: String,
    },

    /// The bundled caption font could not be loaded.
    #[error("Font error: {0}")]
    Font(String),

    /// Image encoding failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CollageError {
    /// Map a Last.fm error payload to the matching variant.
    ///
    /// See <https://www.last.fm/api/errorcodes>.
    pub fn from_api_code(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            4 | 9 | 10 | 13 | 14 | 15 | 26 => CollageError::Authentication(message),
            6 => CollageError::UserNotFound(message),
            8 | 11 | 16 | 29 => CollageError::ServiceUnavailable(message),
            _ => CollageError::Api { code, message },
        }
    }

    pub(crate) fn image_fetch(url: &str, reason: impl ToString) -> Self {
        CollageError::ImageFetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for collage operations.
pub type Result<T> = std::result::Result<T, CollageError>;
