//! Session State Holder.
//!
//! One session per process: token, user id and display name, restored from
//! storage at startup and persisted on every login. The session is itself a
//! reducer-driven store so that storage writes are ordinary effects.

pub mod handle;
pub mod reducer;
pub mod types;

pub use handle::{SessionHandle, SessionReader};
pub use reducer::SessionReducer;
pub use types::{SessionAction, SessionEnvironment, SessionState};
