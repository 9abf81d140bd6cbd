//! Events page reducer.
//!
//! The list is captured once on mount and then only changed by local
//! creations and explicit refreshes. Live notifications raise an alert but
//! never touch the list.

use super::types::{EventsAction, EventsEnvironment, EventsState, Mode, REFRESH, SUBSCRIPTION};
use crate::error::ClientError;
use crate::router::Route;
use crate::types::{EventForm, LoadStatus};
use eventbook_core::{SmallVec, async_effect, delay, effect::Effect, reducer::Reducer, smallvec};
use futures::StreamExt;

/// Events page reducer
#[derive(Clone, Debug, Default)]
pub struct EventsReducer;

impl EventsReducer {
    /// Creates a new `EventsReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn load(env: &EventsEnvironment) -> Effect<EventsAction> {
        let api = env.api.clone();
        async_effect! {
            match api.events().await {
                Ok(events) => Some(EventsAction::EventsLoaded { events }),
                Err(error) => Some(EventsAction::EventsFailed { message: error.to_string() }),
            }
        }
    }

    fn refresh(env: &EventsEnvironment) -> Effect<EventsAction> {
        let api = env.api.clone();
        async_effect! {
            match api.events().await {
                Ok(events) => Some(EventsAction::EventsRefreshed { events }),
                Err(error) => Some(EventsAction::RefreshFailed { message: error.to_string() }),
            }
        }
    }

    fn subscribe(env: &EventsEnvironment) -> Effect<EventsAction> {
        let notifications = env.api.event_added().map(|item| match item {
            Ok(event) => EventsAction::EventAdded { event },
            Err(error) => EventsAction::SubscriptionFailed {
                message: error.to_string(),
            },
        });
        Effect::Stream(Box::pin(notifications)).cancellable(SUBSCRIPTION)
    }

    /// A refresh after the debounce window; a newer schedule replaces it
    fn schedule_refresh(env: &EventsEnvironment) -> Effect<EventsAction> {
        let refresh = delay! {
            duration: env.refresh_debounce,
            action: EventsAction::RefreshRequested
        };
        refresh.cancellable(REFRESH)
    }
}

impl Reducer for EventsReducer {
    type State = EventsState;
    type Action = EventsAction;
    type Environment = EventsEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per page action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Lifecycle ==========
            EventsAction::Mount => {
                tracing::debug!("Events page mounted");
                *state = EventsState {
                    alert_epoch: state.alert_epoch,
                    ..EventsState::default()
                };
                state.list = LoadStatus::Loading;
                state.mounted = true;

                smallvec![Self::load(env), Self::subscribe(env)]
            },

            EventsAction::Unmount => {
                tracing::debug!("Events page unmounted");
                state.mounted = false;
                smallvec![
                    Effect::Cancel { id: SUBSCRIPTION },
                    Effect::Cancel { id: REFRESH }
                ]
            },

            EventsAction::EventsLoaded { events } => {
                tracing::debug!(count = events.len(), "Events loaded");
                state.events = events;
                state.list = LoadStatus::Loaded;
                SmallVec::new()
            },

            EventsAction::EventsFailed { message } => {
                tracing::warn!(%message, "Events query failed");
                state.list = LoadStatus::Failed;
                state.set_alert(message);
                SmallVec::new()
            },

            EventsAction::RefreshRequested => {
                if !state.mounted {
                    return SmallVec::new();
                }
                tracing::debug!("Refreshing events");
                smallvec![Self::refresh(env)]
            },

            EventsAction::EventsRefreshed { events } => {
                tracing::debug!(count = events.len(), "Events refreshed");
                state.events = events;
                state.list = LoadStatus::Loaded;
                SmallVec::new()
            },

            EventsAction::RefreshFailed { message } => {
                tracing::warn!(%message, "Events refresh failed");
                state.set_alert(message);
                SmallVec::new()
            },

            // ========== Creation ==========
            EventsAction::StartCreating => {
                if !env.session.is_authenticated() || state.mode != Mode::Idle {
                    return SmallVec::new();
                }
                state.mode = Mode::Creating;
                state.modal_alert.clear();
                SmallVec::new()
            },

            EventsAction::CancelCreating => {
                if state.is_creating() && !state.creating_pending {
                    state.mode = Mode::Idle;
                    state.alert.clear();
                    state.modal_alert.clear();
                }
                SmallVec::new()
            },

            EventsAction::EditForm { field, value } => {
                if state.is_creating() {
                    state.form.set(field, value);
                }
                SmallVec::new()
            },

            EventsAction::ConfirmCreate => {
                if !state.is_creating() || state.creating_pending {
                    return SmallVec::new();
                }

                let Some(input) = state.form.validate() else {
                    state.modal_alert = env.messages.invalid_form().to_string();
                    return SmallVec::new();
                };

                let session = env.session.current();
                let (Some(token), Some(viewer)) = (
                    session.token.clone().filter(|token| !token.is_empty()),
                    session.viewer_id().cloned(),
                ) else {
                    state.modal_alert = ClientError::NotAuthenticated.to_string();
                    return SmallVec::new();
                };

                tracing::debug!(title = %input.title, "Creating event");
                state.creating_pending = true;
                state.modal_alert.clear();

                let api = env.api.clone();
                smallvec![async_effect! {
                    match api.create_event(&token, input).await {
                        Ok(created) => Some(EventsAction::EventCreated {
                            event: created.with_creator(viewer),
                        }),
                        Err(error) => Some(EventsAction::CreateFailed {
                            message: error.to_string(),
                        }),
                    }
                }]
            },

            EventsAction::EventCreated { event } => {
                tracing::info!(event_id = %event.id, "Event created");
                state.creating_pending = false;
                state.events.push(event);
                state.form = EventForm::default();
                state.modal_alert.clear();
                if state.is_creating() {
                    state.mode = Mode::Idle;
                }
                state.set_alert(env.messages.event_created());

                smallvec![Self::schedule_refresh(env)]
            },

            EventsAction::CreateFailed { message } => {
                tracing::warn!(%message, "Create event failed");
                state.creating_pending = false;
                state.modal_alert = message;
                SmallVec::new()
            },

            // ========== Booking ==========
            EventsAction::SelectEvent { event_id } => {
                if state.mode != Mode::Idle {
                    return SmallVec::new();
                }
                match state.events.iter().find(|event| event.id == event_id) {
                    Some(event) => state.mode = Mode::ViewingDetail(event.clone()),
                    None => tracing::debug!(%event_id, "Selected unknown event"),
                }
                SmallVec::new()
            },

            EventsAction::CancelDetail => {
                if state.selected().is_some() && !state.booking_pending {
                    state.mode = Mode::Idle;
                    state.alert.clear();
                }
                SmallVec::new()
            },

            EventsAction::ConfirmBooking => {
                let Some(event) = state.selected() else {
                    return SmallVec::new();
                };
                if state.booking_pending {
                    return SmallVec::new();
                }

                let Some(token) = env.session.token() else {
                    state.navigate_to = Some(Route::Login);
                    return SmallVec::new();
                };

                let viewer = env.session.viewer_id();
                if event.is_created_by(viewer.as_ref()) {
                    tracing::debug!(event_id = %event.id, "Creator cannot book own event");
                    return SmallVec::new();
                }

                let event_id = event.id.clone();
                tracing::debug!(%event_id, "Booking event");
                state.booking_pending = true;

                let api = env.api.clone();
                smallvec![async_effect! {
                    match api.book_event(&token, &event_id).await {
                        Ok(booking) => Some(EventsAction::EventBooked { booking }),
                        Err(error) => Some(EventsAction::BookingFailed {
                            message: error.to_string(),
                        }),
                    }
                }]
            },

            EventsAction::EventBooked { booking } => {
                tracing::info!(booking_id = %booking.id, "Event booked");
                state.booking_pending = false;
                state.mode = Mode::Idle;
                state.set_alert(env.messages.event_booked());

                smallvec![Self::schedule_refresh(env)]
            },

            EventsAction::BookingFailed { message } => {
                tracing::warn!(%message, "Book event failed");
                state.booking_pending = false;
                state.mode = Mode::Idle;
                state.set_alert(message);
                SmallVec::new()
            },

            // ========== Live updates ==========
            EventsAction::EventAdded { event } => {
                tracing::debug!(event_id = %event.id, "Event added elsewhere");
                state.set_alert(env.messages.event_added(&event.title));
                SmallVec::new()
            },

            EventsAction::SubscriptionFailed { message } => {
                tracing::warn!(%message, "Event subscription failed");
                state.set_alert(env.messages.subscription_failed());
                SmallVec::new()
            },

            // ========== Shell ==========
            EventsAction::DismissAlert => {
                state.alert.clear();
                SmallVec::new()
            },

            EventsAction::NavigationHandled => {
                state.navigate_to = None;
                SmallVec::new()
            },
        }
    }
}
