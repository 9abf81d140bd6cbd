//! Session reducer.

use super::types::{SessionAction, SessionEnvironment, SessionState};
use crate::error::Result;
use crate::storage::{SessionStorage, TOKEN_KEY, USER_ID_KEY, USERNAME_KEY};
use crate::types::UserId;
use eventbook_core::{SmallVec, async_effect, effect::Effect, reducer::Reducer, smallvec};

/// Login/logout transitions with persistence effects
#[derive(Clone, Debug, Default)]
pub struct SessionReducer;

impl SessionReducer {
    /// Creates a new `SessionReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn persist(storage: &dyn SessionStorage, entries: &[(&str, &str)]) -> Result<()> {
    for (key, value) in entries {
        if !value.is_empty() {
            storage.set(key, value)?;
        }
    }
    Ok(())
}

fn outcome(result: Result<()>) -> Option<SessionAction> {
    Some(match result {
        Ok(()) => SessionAction::Persisted,
        Err(error) => SessionAction::PersistFailed {
            message: error.to_string(),
        },
    })
}

impl Reducer for SessionReducer {
    type State = SessionState;
    type Action = SessionAction;
    type Environment = SessionEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            SessionAction::Login {
                token,
                user_id,
                username,
            } => {
                tracing::info!(user_id = %user_id, "Session started");

                state.token = Some(token.clone());
                state.user_id = Some(UserId::new(user_id.clone()));
                state.username = Some(username.clone());

                let storage = env.storage.clone();
                smallvec![async_effect! {
                    outcome(persist(
                        storage.as_ref(),
                        &[
                            (TOKEN_KEY, token.as_str()),
                            (USER_ID_KEY, user_id.as_str()),
                            (USERNAME_KEY, username.as_str()),
                        ],
                    ))
                }]
            },

            SessionAction::Logout => {
                tracing::info!("Session cleared");

                *state = SessionState::default();

                let storage = env.storage.clone();
                smallvec![async_effect! { outcome(storage.clear()) }]
            },

            SessionAction::Persisted => SmallVec::new(),

            SessionAction::PersistFailed { message } => {
                tracing::warn!(%message, "Session storage write failed");
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use eventbook_testing::{ReducerTest, assertions};
    use std::sync::Arc;

    fn env() -> SessionEnvironment {
        SessionEnvironment::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn login_sets_every_field() {
        ReducerTest::new(SessionReducer::new())
            .with_env(env())
            .given_state(SessionState::default())
            .when_action(SessionAction::Login {
                token: "t".into(),
                user_id: "u".into(),
                username: "n".into(),
            })
            .then_state(|state| {
                assert_eq!(state.token.as_deref(), Some("t"));
                assert_eq!(state.user_id, Some(UserId::from("u")));
                assert_eq!(state.username.as_deref(), Some("n"));
                assert!(state.is_authenticated());
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn logout_clears_every_field() {
        ReducerTest::new(SessionReducer::new())
            .with_env(env())
            .given_state(SessionState {
                token: Some("t".into()),
                user_id: Some(UserId::from("u")),
                username: Some("n".into()),
            })
            .when_action(SessionAction::Logout)
            .then_state(|state| {
                assert_eq!(*state, SessionState::default());
                assert!(!state.is_authenticated());
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn failed_write_keeps_session() {
        let session = SessionState {
            token: Some("t".into()),
            user_id: Some(UserId::from("u")),
            username: None,
        };
        let expected = session.clone();

        ReducerTest::new(SessionReducer::new())
            .with_env(env())
            .given_state(session)
            .when_action(SessionAction::PersistFailed {
                message: "disk full".into(),
            })
            .then_state(move |state| assert_eq!(*state, expected))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn empty_token_is_not_authenticated() {
        let state = SessionState {
            token: Some(String::new()),
            user_id: Some(UserId::from("")),
            username: None,
        };
        assert!(!state.is_authenticated());
        assert!(state.viewer_id().is_none());
    }
}
