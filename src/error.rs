//! Error types for the connect skill

use thiserror::Error;

/// Result type alias for connect skill operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling a skill turn
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Streaming API answered with a non-success status
    #[error("api error {status}: {message}")]
    Api {
        /// HTTP status code returned by the API
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// HTTP transport error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The user has not linked their streaming account
    #[error("account not linked")]
    AccountNotLinked,

    /// Request was addressed to a different skill
    #[error("invalid application id: {0}")]
    InvalidApplication(String),

    /// Intent name the skill does not handle
    #[error("unknown intent: {0}")]
    UnknownIntent(String),
}

impl Error {
    /// HTTP status code associated with this error, if any
    ///
    /// An unlinked account maps to 401, the status the API gives for a
    /// missing bearer token.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::AccountNotLinked => Some(401),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status() {
        let err = Error::Api {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.to_string(), "api error 503: Service Unavailable");
    }

    #[test]
    fn test_not_linked_status() {
        assert_eq!(Error::AccountNotLinked.status_code(), Some(401));
        assert_eq!(Error::Config("bad".to_string()).status_code(), None);
    }
}
