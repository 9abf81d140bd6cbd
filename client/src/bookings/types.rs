//! Bookings page state, actions and environment.

use crate::graphql::EventsApi;
use crate::messages::Messages;
use crate::session::SessionReader;
use crate::types::{Booking, BookingId, LoadStatus};
use std::sync::Arc;

/// Bookings page state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BookingsState {
    /// The viewer's bookings
    pub bookings: Vec<Booking>,
    /// Progress of the list query
    pub list: LoadStatus,
    /// Booking whose cancellation is in flight
    pub cancelling: Option<BookingId>,
    /// Page banner; empty renders nothing
    pub alert: String,
    /// Bumped on every new alert
    pub alert_epoch: u64,
}

impl BookingsState {
    /// Replace the alert and ask the front end to scroll to it
    pub fn set_alert(&mut self, message: impl Into<String>) {
        self.alert = message.into();
        self.alert_epoch += 1;
    }
}

/// Bookings page actions
#[derive(Clone, Debug, PartialEq)]
pub enum BookingsAction {
    /// Page became visible: load the bookings
    Mount,
    /// Bookings arrived
    BookingsLoaded {
        /// The viewer's bookings
        bookings: Vec<Booking>,
    },
    /// Bookings query failed
    BookingsFailed {
        /// Error text
        message: String,
    },
    /// Cancel a booking
    CancelBooking {
        /// Booking to cancel
        booking_id: BookingId,
    },
    /// Cancellation succeeded
    BookingCancelled {
        /// Cancelled booking
        booking_id: BookingId,
    },
    /// Cancellation failed
    CancelFailed {
        /// Error text
        message: String,
    },
}

/// Bookings page dependencies
#[derive(Clone)]
pub struct BookingsEnvironment {
    /// Remote API
    pub api: Arc<dyn EventsApi>,
    /// Whose bookings to show
    pub session: SessionReader,
    /// Localized strings
    pub messages: Messages,
}

impl BookingsEnvironment {
    /// Creates a new `BookingsEnvironment`
    #[must_use]
    pub fn new(api: Arc<dyn EventsApi>, session: SessionReader, messages: Messages) -> Self {
        Self {
            api,
            session,
            messages,
        }
    }
}
