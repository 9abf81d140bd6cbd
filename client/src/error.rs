//! Error types for the client.
//!
//! The user-facing taxonomy is flat: whatever goes wrong, the alert banner
//! shows the error's `Display` text. The variants exist for logging and for
//! deciding whether a subscription should reconnect.

use eventbook_runtime::StoreError;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Everything that can fail while talking to the API or the session storage.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClientError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-success status and no GraphQL errors.
    #[error("Response not successful: Received status code {status}")]
    Http {
        /// HTTP status code
        status: u16,
    },

    /// The server reported a GraphQL error; shown verbatim.
    #[error("{message}")]
    GraphQl {
        /// First error message from the response
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The subscription socket failed or was rejected.
    #[error("{0}")]
    Subscription(String),

    /// Reading or writing persisted session values failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// An operation that needs a token was attempted without one.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// A page store refused or lost an action.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ClientError {
    /// Build a GraphQL error from a server message.
    #[must_use]
    pub fn graphql(message: impl Into<String>) -> Self {
        Self::GraphQl {
            message: message.into(),
        }
    }

    /// Whether retrying the same request could succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Subscription(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => Self::Http {
                status: status.as_u16(),
            },
            None if error.is_decode() => Self::Decode(error.to_string()),
            None => Self::Transport(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(error: std::io::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Subscription(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_errors_display_verbatim() {
        let error = ClientError::graphql("Event already booked");
        assert_eq!(error.to_string(), "Event already booked");
        assert!(!error.is_transient());
    }

    #[test]
    fn http_status_mentions_code() {
        let error = ClientError::Http { status: 400 };
        assert_eq!(
            error.to_string(),
            "Response not successful: Received status code 400"
        );
    }

    #[test]
    fn store_errors_convert() {
        let error: ClientError = StoreError::Timeout.into();
        assert_eq!(error.to_string(), "Timeout waiting for action");
    }
}
