//! Bookings page reducer.

use super::types::{BookingsAction, BookingsEnvironment, BookingsState};
use crate::error::ClientError;
use crate::types::LoadStatus;
use eventbook_core::{SmallVec, async_effect, effect::Effect, reducer::Reducer, smallvec};

/// Bookings list and cancellation
#[derive(Clone, Debug, Default)]
pub struct BookingsReducer;

impl BookingsReducer {
    /// Creates a new `BookingsReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for BookingsReducer {
    type State = BookingsState;
    type Action = BookingsAction;
    type Environment = BookingsEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            BookingsAction::Mount => {
                *state = BookingsState {
                    alert_epoch: state.alert_epoch,
                    ..BookingsState::default()
                };

                let Some(token) = env.session.token() else {
                    state.list = LoadStatus::Failed;
                    state.set_alert(ClientError::NotAuthenticated.to_string());
                    return SmallVec::new();
                };

                state.list = LoadStatus::Loading;
                let api = env.api.clone();
                smallvec![async_effect! {
                    Some(match api.bookings(&token).await {
                        Ok(bookings) => BookingsAction::BookingsLoaded { bookings },
                        Err(error) => BookingsAction::BookingsFailed { message: error.to_string() },
                    })
                }]
            },

            BookingsAction::BookingsLoaded { bookings } => {
                tracing::debug!(count = bookings.len(), "Bookings loaded");
                state.bookings = bookings;
                state.list = LoadStatus::Loaded;
                SmallVec::new()
            },

            BookingsAction::BookingsFailed { message } => {
                tracing::warn!(%message, "Bookings query failed");
                state.list = LoadStatus::Failed;
                state.set_alert(message);
                SmallVec::new()
            },

            BookingsAction::CancelBooking { booking_id } => {
                if state.cancelling.is_some()
                    || !state.bookings.iter().any(|booking| booking.id == booking_id)
                {
                    return SmallVec::new();
                }
                let Some(token) = env.session.token() else {
                    state.set_alert(ClientError::NotAuthenticated.to_string());
                    return SmallVec::new();
                };

                tracing::debug!(%booking_id, "Cancelling booking");
                state.cancelling = Some(booking_id.clone());

                let api = env.api.clone();
                smallvec![async_effect! {
                    Some(match api.cancel_booking(&token, &booking_id).await {
                        Ok(()) => BookingsAction::BookingCancelled { booking_id },
                        Err(error) => BookingsAction::CancelFailed { message: error.to_string() },
                    })
                }]
            },

            BookingsAction::BookingCancelled { booking_id } => {
                tracing::info!(%booking_id, "Booking cancelled");
                state.cancelling = None;
                state.bookings.retain(|booking| booking.id != booking_id);
                state.set_alert(env.messages.booking_cancelled());
                SmallVec::new()
            },

            BookingsAction::CancelFailed { message } => {
                tracing::warn!(%message, "Booking cancellation failed");
                state.cancelling = None;
                state.set_alert(message);
                SmallVec::new()
            },
        }
    }
}
