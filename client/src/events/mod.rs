//! Events Page Controller.
//!
//! Lists events, runs the creation and booking workflows, and surfaces live
//! `eventAdded` notifications as alerts.
//!
//! ```text
//!           StartCreating              SelectEvent
//!   Creating <──────────── Idle ─────────────> ViewingDetail
//!       │   CancelCreating / EventCreated       │
//!       └──────────────────> Idle <─────────────┘
//!                   CancelDetail / EventBooked / BookingFailed
//! ```

pub mod reducer;
pub mod types;


pub use reducer::EventsReducer;
pub use types::{EventsAction, EventsEnvironment, EventsState, Mode, REFRESH, SUBSCRIPTION};
