//! Bookings Page Controller: the viewer's bookings, with cancellation.

pub mod reducer;
pub mod types;

pub use reducer::BookingsReducer;
pub use types::{BookingsAction, BookingsEnvironment, BookingsState};
