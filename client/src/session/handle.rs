//! Explicit session access.
//!
//! Writers hold a [`SessionHandle`]; everything else gets a
//! [`SessionReader`] that sees the latest snapshot without locking the store.

use super::reducer::SessionReducer;
use super::types::{SessionAction, SessionEnvironment, SessionState};
use crate::error::Result;
use crate::storage::SessionStorage;
use crate::types::UserId;
use eventbook_runtime::Store;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

const PERSIST_TIMEOUT: Duration = Duration::from_secs(5);

type SessionStore = Store<SessionState, SessionAction, SessionEnvironment, SessionReducer>;

/// Read/write access to the one session of the process
#[derive(Clone)]
pub struct SessionHandle {
    store: SessionStore,
    snapshot: Arc<watch::Sender<SessionState>>,
}

impl SessionHandle {
    /// Restore the persisted session from `storage` and take ownership of it
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let initial = SessionState::restore(storage.as_ref());
        tracing::info!(
            authenticated = initial.is_authenticated(),
            "Session restored"
        );

        let (snapshot, _) = watch::channel(initial.clone());
        let store = Store::new(
            initial,
            SessionReducer::new(),
            SessionEnvironment::new(storage),
        );

        Self {
            store,
            snapshot: Arc::new(snapshot),
        }
    }

    /// Start a session
    ///
    /// Readers observe the new session as soon as this returns; storage is
    /// written before it returns, but a failed write is only logged.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ClientError::Store`] if the session store is shut down
    /// or the storage write does not finish in time.
    pub async fn login(
        &self,
        token: impl Into<String>,
        user_id: impl Into<String>,
        username: impl Into<String>,
    ) -> Result<()> {
        self.apply(SessionAction::Login {
            token: token.into(),
            user_id: user_id.into(),
            username: username.into(),
        })
        .await
    }

    /// End the session and clear every persisted entry
    ///
    /// # Errors
    ///
    /// Same as [`SessionHandle::login`].
    pub async fn logout(&self) -> Result<()> {
        self.apply(SessionAction::Logout).await
    }

    async fn apply(&self, action: SessionAction) -> Result<()> {
        let mut handle = self.store.send(action).await?;
        self.publish().await;
        handle.wait_with_timeout(PERSIST_TIMEOUT).await?;
        Ok(())
    }

    async fn publish(&self) {
        let current = self.store.state(Clone::clone).await;
        self.snapshot.send_replace(current);
    }

    /// A read-only view of this session
    #[must_use]
    pub fn reader(&self) -> SessionReader {
        SessionReader {
            snapshot: self.snapshot.subscribe(),
        }
    }

    /// Latest session snapshot
    #[must_use]
    pub fn current(&self) -> SessionState {
        self.snapshot.borrow().clone()
    }

    /// Stop accepting session changes
    ///
    /// # Errors
    ///
    /// Returns [`crate::ClientError::Store`] if pending storage writes do not
    /// finish within `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<()> {
        self.store.shutdown(timeout).await?;
        Ok(())
    }
}

/// Read-only session access for page controllers
#[derive(Clone, Debug)]
pub struct SessionReader {
    snapshot: watch::Receiver<SessionState>,
}

impl SessionReader {
    /// A reader fixed to `state`, not connected to any handle
    #[must_use]
    pub fn detached(state: SessionState) -> Self {
        let (_, snapshot) = watch::channel(state);
        Self { snapshot }
    }

    /// Latest session snapshot
    #[must_use]
    pub fn current(&self) -> SessionState {
        self.snapshot.borrow().clone()
    }

    /// Current bearer token, if any
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.snapshot
            .borrow()
            .token
            .clone()
            .filter(|token| !token.is_empty())
    }

    /// Current user id, if any
    #[must_use]
    pub fn viewer_id(&self) -> Option<UserId> {
        self.snapshot.borrow().viewer_id().cloned()
    }

    /// Whether a non-empty token is present
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.snapshot.borrow().is_authenticated()
    }

    /// Wait until the session changes
    ///
    /// Returns `false` once the owning handle is gone.
    pub async fn changed(&mut self) -> bool {
        self.snapshot.changed().await.is_ok()
    }
}
