//! Auth page state, actions and environment.

use crate::graphql::EventsApi;
use crate::messages::Messages;
use crate::session::SessionHandle;
use crate::types::UserId;
use std::sync::Arc;

/// Which form is shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// Email and password
    #[default]
    Login,
    /// Email, display name and password
    Signup,
}

/// Auth page state
///
/// Passwords never enter the state; they travel inside submit actions only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    /// Shown form
    pub mode: AuthMode,
    /// Last email entered, prefilled after sign-up
    pub email: String,
    /// Page banner; empty renders nothing
    pub alert: String,
    /// A request is in flight
    pub pending: bool,
    /// Bumped on every new alert
    pub alert_epoch: u64,
}

impl AuthState {
    /// Replace the alert and ask the front end to scroll to it
    pub fn set_alert(&mut self, message: impl Into<String>) {
        self.alert = message.into();
        self.alert_epoch += 1;
    }
}

/// Auth page actions
#[derive(Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// Switch form; clears the alert
    SetMode(AuthMode),
    /// Log in
    SubmitLogin {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },
    /// Login succeeded and the session was written
    LoginSucceeded {
        /// Logged-in user
        user_id: UserId,
    },
    /// Login failed
    LoginFailed {
        /// Error text
        message: String,
    },
    /// Create an account
    SubmitSignup {
        /// Account email
        email: String,
        /// Display name
        username: String,
        /// Account password
        password: String,
    },
    /// Account created
    SignupSucceeded {
        /// Registered email
        email: String,
    },
    /// Account creation failed
    SignupFailed {
        /// Error text
        message: String,
    },
}

// Passwords stay out of logs; the store traces every action with `Debug`.
impl std::fmt::Debug for AuthAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SetMode(mode) => f.debug_tuple("SetMode").field(mode).finish(),
            Self::SubmitLogin { email, .. } => f
                .debug_struct("SubmitLogin")
                .field("email", email)
                .finish_non_exhaustive(),
            Self::LoginSucceeded { user_id } => f
                .debug_struct("LoginSucceeded")
                .field("user_id", user_id)
                .finish(),
            Self::LoginFailed { message } => f
                .debug_struct("LoginFailed")
                .field("message", message)
                .finish(),
            Self::SubmitSignup {
                email, username, ..
            } => f
                .debug_struct("SubmitSignup")
                .field("email", email)
                .field("username", username)
                .finish_non_exhaustive(),
            Self::SignupSucceeded { email } => f
                .debug_struct("SignupSucceeded")
                .field("email", email)
                .finish(),
            Self::SignupFailed { message } => f
                .debug_struct("SignupFailed")
                .field("message", message)
                .finish(),
        }
    }
}

/// Auth page dependencies
#[derive(Clone)]
pub struct AuthEnvironment {
    /// Remote API
    pub api: Arc<dyn EventsApi>,
    /// Session written on login
    pub session: SessionHandle,
    /// Localized strings
    pub messages: Messages,
}

impl AuthEnvironment {
    /// Creates a new `AuthEnvironment`
    #[must_use]
    pub fn new(api: Arc<dyn EventsApi>, session: SessionHandle, messages: Messages) -> Self {
        Self {
            api,
            session,
            messages,
        }
    }
}
