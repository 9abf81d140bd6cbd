//! The remote operations the pages depend on.

use crate::error::Result;
use crate::types::{
    AuthData, Booking, BookingId, CreatedEvent, Event, EventId, EventInput, User, UserInput,
};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Remote event booking API
///
/// Implemented by [`super::GraphqlClient`] and by the in-crate mock. Calls
/// that need a session take the bearer token explicitly.
#[async_trait]
pub trait EventsApi: Send + Sync {
    /// All events
    async fn events(&self) -> Result<Vec<Event>>;

    /// Create an event as the token's user
    async fn create_event(&self, token: &str, input: EventInput) -> Result<CreatedEvent>;

    /// Book an event as the token's user
    async fn book_event(&self, token: &str, event_id: &EventId) -> Result<Booking>;

    /// Exchange credentials for a session
    async fn login(&self, email: &str, password: &str) -> Result<AuthData>;

    /// Register a user
    async fn create_user(&self, input: UserInput) -> Result<User>;

    /// The token user's bookings
    async fn bookings(&self, token: &str) -> Result<Vec<Booking>>;

    /// Cancel one of the token user's bookings
    async fn cancel_booking(&self, token: &str, booking_id: &BookingId) -> Result<()>;

    /// Live stream of newly created events
    ///
    /// Items are errors when the server reports one for a notification.
    fn event_added(&self) -> BoxStream<'static, Result<Event>>;
}
