//! Auth Page Controller: login and sign-up.
//!
//! The only page that writes the session.

pub mod reducer;
pub mod types;

pub use reducer::AuthReducer;
pub use types::{AuthAction, AuthEnvironment, AuthMode, AuthState};
