//! Auth page reducer.

use super::types::{AuthAction, AuthEnvironment, AuthMode, AuthState};
use crate::error::ClientError;
use crate::types::UserInput;
use eventbook_core::{SmallVec, async_effect, effect::Effect, reducer::Reducer, smallvec};

/// Login and sign-up forms
#[derive(Clone, Debug, Default)]
pub struct AuthReducer;

impl AuthReducer {
    /// Creates a new `AuthReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl Reducer for AuthReducer {
    type State = AuthState;
    type Action = AuthAction;
    type Environment = AuthEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AuthAction::SetMode(mode) => {
                // Re-entering the same form keeps its alert visible
                if !state.pending && state.mode != mode {
                    state.mode = mode;
                    state.alert.clear();
                }
                SmallVec::new()
            },

            // ========== Login ==========
            AuthAction::SubmitLogin { email, password } => {
                if state.pending || state.mode != AuthMode::Login {
                    return SmallVec::new();
                }
                state.email.clone_from(&email);
                if blank(&email) || blank(&password) {
                    state.set_alert(env.messages.invalid_form());
                    return SmallVec::new();
                }

                tracing::debug!(%email, "Logging in");
                state.pending = true;
                state.alert.clear();

                let api = env.api.clone();
                let session = env.session.clone();
                smallvec![async_effect! {
                    let result: Result<_, ClientError> = async {
                        let auth = api.login(email.trim(), &password).await?;
                        session
                            .login(
                                auth.token,
                                auth.user_id.to_string(),
                                auth.username.unwrap_or_default(),
                            )
                            .await?;
                        Ok(auth.user_id)
                    }
                    .await;

                    Some(match result {
                        Ok(user_id) => AuthAction::LoginSucceeded { user_id },
                        Err(error) => AuthAction::LoginFailed { message: error.to_string() },
                    })
                }]
            },

            AuthAction::LoginSucceeded { user_id } => {
                tracing::info!(%user_id, "Logged in");
                state.pending = false;
                state.alert.clear();
                SmallVec::new()
            },

            AuthAction::LoginFailed { message } => {
                tracing::warn!(%message, "Login failed");
                state.pending = false;
                state.set_alert(message);
                SmallVec::new()
            },

            // ========== Sign-up ==========
            AuthAction::SubmitSignup {
                email,
                username,
                password,
            } => {
                if state.pending || state.mode != AuthMode::Signup {
                    return SmallVec::new();
                }
                state.email.clone_from(&email);
                if blank(&email) || blank(&username) || blank(&password) {
                    state.set_alert(env.messages.invalid_form());
                    return SmallVec::new();
                }

                tracing::debug!(%email, "Creating account");
                state.pending = true;
                state.alert.clear();

                let api = env.api.clone();
                let input = UserInput {
                    email: email.trim().to_string(),
                    username: username.trim().to_string(),
                    password,
                };
                smallvec![async_effect! {
                    Some(match api.create_user(input).await {
                        Ok(user) => AuthAction::SignupSucceeded { email: user.email },
                        Err(error) => AuthAction::SignupFailed { message: error.to_string() },
                    })
                }]
            },

            AuthAction::SignupSucceeded { email } => {
                tracing::info!(%email, "Account created");
                state.pending = false;
                state.mode = AuthMode::Login;
                state.email = email;
                state.set_alert(env.messages.account_created());
                SmallVec::new()
            },

            AuthAction::SignupFailed { message } => {
                tracing::warn!(%message, "Sign-up failed");
                state.pending = false;
                state.set_alert(message);
                SmallVec::new()
            },
        }
    }
}
