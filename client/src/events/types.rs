//! Events page state, actions and environment.

use crate::graphql::EventsApi;
use crate::messages::Messages;
use crate::router::Route;
use crate::session::SessionReader;
use crate::types::{Booking, Event, EventForm, EventId, FormField, LoadStatus, UserId};
use eventbook_core::effect::EffectId;
use std::sync::Arc;
use std::time::Duration;

/// Registration id of the `eventAdded` subscription
pub const SUBSCRIPTION: EffectId = EffectId::new("events.subscription");

/// Registration id of the debounced list refresh
pub const REFRESH: EffectId = EffectId::new("events.refresh");

// ============================================================================
// State
// ============================================================================

/// Which overlay, if any, is open
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Mode {
    /// Just the list
    #[default]
    Idle,
    /// Creation modal
    Creating,
    /// Booking modal for the selected event
    ViewingDetail(Event),
}

/// Events page state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventsState {
    /// Last list captured from the server, plus local creations
    pub events: Vec<Event>,
    /// Progress of the initial list query
    pub list: LoadStatus,
    /// Open overlay
    pub mode: Mode,
    /// Creation form contents
    pub form: EventForm,
    /// Page-level banner; empty renders nothing
    pub alert: String,
    /// Banner inside the creation modal
    pub modal_alert: String,
    /// A create mutation is in flight
    pub creating_pending: bool,
    /// A book mutation is in flight
    pub booking_pending: bool,
    /// Bumped on every new page alert; front ends scroll to top when it changes
    pub alert_epoch: u64,
    /// Location the page asks the shell to open
    pub navigate_to: Option<Route>,
    /// Between `Mount` and `Unmount`
    pub mounted: bool,
}

impl EventsState {
    /// The event in the booking modal
    #[must_use]
    pub const fn selected(&self) -> Option<&Event> {
        match &self.mode {
            Mode::ViewingDetail(event) => Some(event),
            _ => None,
        }
    }

    /// Whether the creation modal is open
    #[must_use]
    pub const fn is_creating(&self) -> bool {
        matches!(self.mode, Mode::Creating)
    }

    /// Whether `viewer` may not confirm the booking of the selected event
    ///
    /// Creators cannot book their own events.
    #[must_use]
    pub fn is_booking_disabled(&self, viewer: Option<&UserId>) -> bool {
        self.selected()
            .is_some_and(|event| event.is_created_by(viewer))
    }

    /// Whether the page is waiting on the server
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.list == LoadStatus::Loading || self.creating_pending || self.booking_pending
    }

    /// Replace the page alert and ask the front end to scroll to it
    pub fn set_alert(&mut self, message: impl Into<String>) {
        self.alert = message.into();
        self.alert_epoch += 1;
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Events page actions
#[derive(Clone, Debug, PartialEq)]
pub enum EventsAction {
    // Lifecycle
    /// Page became visible: load the list and open the subscription
    Mount,
    /// Page left: close the subscription and drop pending refreshes
    Unmount,
    /// Initial list arrived
    EventsLoaded {
        /// Server events
        events: Vec<Event>,
    },
    /// Initial list failed
    EventsFailed {
        /// Error text
        message: String,
    },
    /// Re-run the list query in the background
    RefreshRequested,
    /// Background list arrived
    EventsRefreshed {
        /// Server events
        events: Vec<Event>,
    },
    /// Background list failed
    RefreshFailed {
        /// Error text
        message: String,
    },

    // Creation
    /// Open the creation modal
    StartCreating,
    /// Close the creation modal
    CancelCreating,
    /// Change a form field
    EditForm {
        /// Field to change
        field: FormField,
        /// New text
        value: String,
    },
    /// Validate and submit the form
    ConfirmCreate,
    /// Create mutation succeeded
    EventCreated {
        /// The new event, attributed to the viewer
        event: Event,
    },
    /// Create mutation failed
    CreateFailed {
        /// Error text
        message: String,
    },

    // Booking
    /// Open the booking modal for an event
    SelectEvent {
        /// Event to show
        event_id: EventId,
    },
    /// Close the booking modal
    CancelDetail,
    /// Book the selected event
    ConfirmBooking,
    /// Book mutation succeeded
    EventBooked {
        /// Created booking
        booking: Booking,
    },
    /// Book mutation failed
    BookingFailed {
        /// Error text
        message: String,
    },

    // Live updates
    /// `eventAdded` notification
    EventAdded {
        /// The event another user created
        event: Event,
    },
    /// The subscription reported an error
    SubscriptionFailed {
        /// Error text
        message: String,
    },

    // Shell
    /// Clear the page alert
    DismissAlert,
    /// The shell followed `navigate_to`
    NavigationHandled,
}

// ============================================================================
// Environment
// ============================================================================

/// Events page dependencies
#[derive(Clone)]
pub struct EventsEnvironment {
    /// Remote API
    pub api: Arc<dyn EventsApi>,
    /// Who is looking at the page
    pub session: SessionReader,
    /// Localized strings
    pub messages: Messages,
    /// Delay before a refresh scheduled by a mutation runs
    pub refresh_debounce: Duration,
}

impl EventsEnvironment {
    /// Creates a new `EventsEnvironment`
    #[must_use]
    pub fn new(
        api: Arc<dyn EventsApi>,
        session: SessionReader,
        messages: Messages,
        refresh_debounce: Duration,
    ) -> Self {
        Self {
            api,
            session,
            messages,
            refresh_debounce,
        }
    }
}
