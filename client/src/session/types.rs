//! Session state and actions.

use crate::storage::{SessionStorage, TOKEN_KEY, USER_ID_KEY, USERNAME_KEY};
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Who is logged in, if anyone
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Bearer token
    pub token: Option<String>,
    /// Logged-in user
    pub user_id: Option<UserId>,
    /// Display name
    pub username: Option<String>,
}

impl SessionState {
    /// Read the persisted session
    ///
    /// Missing or unreadable entries are treated as absent; empty strings too.
    #[must_use]
    pub fn restore(storage: &dyn SessionStorage) -> Self {
        let read = |key: &str| match storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(error) => {
                tracing::warn!(key, %error, "Failed to read persisted session value");
                None
            },
        };

        Self {
            token: read(TOKEN_KEY),
            user_id: read(USER_ID_KEY).map(UserId::new),
            username: read(USERNAME_KEY),
        }
    }

    /// Whether a non-empty token is present
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }

    /// The logged-in user id, if non-empty
    #[must_use]
    pub fn viewer_id(&self) -> Option<&UserId> {
        self.user_id.as_ref().filter(|id| !id.as_str().is_empty())
    }
}

/// Session actions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionAction {
    /// Replace the session and persist its non-empty values
    Login {
        /// Bearer token
        token: String,
        /// User id
        user_id: String,
        /// Display name
        username: String,
    },
    /// Clear the session and every persisted entry
    Logout,
    /// Storage caught up with the in-memory session
    Persisted,
    /// Storage write failed; the in-memory session is kept
    PersistFailed {
        /// Storage error text
        message: String,
    },
}

/// Session dependencies
#[derive(Clone)]
pub struct SessionEnvironment {
    /// Where the session is persisted
    pub storage: Arc<dyn SessionStorage>,
}

impl SessionEnvironment {
    /// Environment over `storage`
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }
}
