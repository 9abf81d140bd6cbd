//! In-memory `EventsApi` for tests and offline demos.

use crate::error::{ClientError, Result};
use crate::graphql::EventsApi;
use crate::types::{
    AuthData, Booking, BookingEvent, BookingId, CreatedEvent, Creator, Event, EventId, EventInput,
    User, UserId, UserInput, parse_timestamp,
};
use async_trait::async_trait;
use chrono::Utc;
use eventbook_core::environment::{Clock, SystemClock};
use futures::stream::{self, BoxStream};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;

/// Remote operations, for failure injection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `events`
    Events,
    /// `createEvent`
    CreateEvent,
    /// `bookEvent`
    BookEvent,
    /// `login`
    Login,
    /// `createUser`
    CreateUser,
    /// `bookings`
    Bookings,
    /// `cancelBooking`
    CancelBooking,
}

/// A recorded call
#[derive(Clone, Debug, PartialEq)]
pub enum ApiCall {
    /// `events`
    Events,
    /// `createEvent`
    CreateEvent {
        /// Bearer token used
        token: String,
        /// Mutation variables
        input: EventInput,
    },
    /// `bookEvent`
    BookEvent {
        /// Bearer token used
        token: String,
        /// Booked event
        event_id: EventId,
    },
    /// `login`
    Login {
        /// Email used
        email: String,
    },
    /// `createUser`
    CreateUser {
        /// Email registered
        email: String,
    },
    /// `bookings`
    Bookings {
        /// Bearer token used
        token: String,
    },
    /// `cancelBooking`
    CancelBooking {
        /// Bearer token used
        token: String,
        /// Cancelled booking
        booking_id: BookingId,
    },
    /// `eventAdded` subscription opened
    EventAdded,
}

#[derive(Debug, Clone)]
struct Account {
    id: UserId,
    email: String,
    username: String,
    password: String,
}

#[derive(Debug, Default)]
struct Inner {
    events: Vec<Event>,
    bookings: HashMap<UserId, Vec<Booking>>,
    accounts: Vec<Account>,
    tokens: HashMap<String, UserId>,
    failures: HashMap<Operation, String>,
    calls: Vec<ApiCall>,
    next_id: u64,
}

impl Inner {
    fn allocate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn take_failure(&mut self, operation: Operation) -> Result<()> {
        match self.failures.remove(&operation) {
            Some(message) => Err(ClientError::graphql(message)),
            None => Ok(()),
        }
    }

    fn user_for(&self, token: &str) -> Result<UserId> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| ClientError::graphql("Unauthenticated!"))
    }
}

/// Scriptable in-memory API
///
/// Clones share state. `eventAdded` notifications are only delivered when
/// pushed with [`MockEventsApi::push_event_added`]; creating an event does
/// not publish one.
#[derive(Clone)]
pub struct MockEventsApi {
    inner: Arc<Mutex<Inner>>,
    added: broadcast::Sender<Result<Event>>,
    latency: Duration,
    clock: Arc<dyn Clock>,
}

impl MockEventsApi {
    /// An API with no events and no users
    #[must_use]
    pub fn new() -> Self {
        let (added, _) = broadcast::channel(16);
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            added,
            latency: Duration::ZERO,
            clock: Arc::new(SystemClock),
        }
    }

    /// Delay every request by `latency`
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Stamp bookings with `clock` instead of wall-clock time
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Seed an event
    #[must_use]
    pub fn with_event(self, event: Event) -> Self {
        self.lock().events.push(event);
        self
    }

    /// Register an account and return its id and a valid token
    pub fn register(&self, email: &str, username: &str, password: &str) -> (UserId, String) {
        let mut inner = self.lock();
        let id = UserId::new(inner.allocate_id("user"));
        let token = format!("token-{id}");
        inner.accounts.push(Account {
            id: id.clone(),
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        });
        inner.tokens.insert(token.clone(), id.clone());
        (id, token)
    }

    /// Make the next call to `operation` fail with `message`
    pub fn fail_next(&self, operation: Operation, message: impl Into<String>) {
        self.lock().failures.insert(operation, message.into());
    }

    /// Deliver an `eventAdded` notification to every open subscription
    pub fn push_event_added(&self, event: Event) {
        let _ = self.added.send(Ok(event));
    }

    /// Deliver a subscription error to every open subscription
    pub fn push_subscription_error(&self, message: impl Into<String>) {
        let _ = self.added.send(Err(ClientError::graphql(message)));
    }

    /// Number of open `eventAdded` subscriptions
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.added.receiver_count()
    }

    /// Every call made so far
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// How many calls matched `predicate`
    #[must_use]
    pub fn count_calls(&self, predicate: impl Fn(&ApiCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|call| predicate(call)).count()
    }

    /// Current server-side events
    #[must_use]
    pub fn events_snapshot(&self) -> Vec<Event> {
        self.lock().events.clone()
    }

    /// Current server-side bookings of `user`
    #[must_use]
    pub fn bookings_of(&self, user: &UserId) -> Vec<Booking> {
        self.lock().bookings.get(user).cloned().unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for MockEventsApi {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockEventsApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockEventsApi")
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl EventsApi for MockEventsApi {
    async fn events(&self) -> Result<Vec<Event>> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        inner.calls.push(ApiCall::Events);
        inner.take_failure(Operation::Events)?;
        Ok(inner.events.clone())
    }

    async fn create_event(&self, token: &str, input: EventInput) -> Result<CreatedEvent> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        inner.calls.push(ApiCall::CreateEvent {
            token: token.to_string(),
            input: input.clone(),
        });
        inner.take_failure(Operation::CreateEvent)?;
        let creator = inner.user_for(token)?;
        let date = parse_timestamp(&input.date)
            .ok_or_else(|| ClientError::graphql(format!("Invalid date: {}", input.date)))?;

        let created = CreatedEvent {
            id: EventId::new(inner.allocate_id("event")),
            title: input.title,
            price: input.price,
            date,
            description: input.description,
        };
        inner.events.push(created.clone().with_creator(creator));
        Ok(created)
    }

    async fn book_event(&self, token: &str, event_id: &EventId) -> Result<Booking> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        inner.calls.push(ApiCall::BookEvent {
            token: token.to_string(),
            event_id: event_id.clone(),
        });
        inner.take_failure(Operation::BookEvent)?;
        let user = inner.user_for(token)?;
        let event = inner
            .events
            .iter()
            .find(|event| event.id == *event_id)
            .map(|event| BookingEvent {
                id: event.id.clone(),
                title: event.title.clone(),
                date: event.date,
            })
            .ok_or_else(|| ClientError::graphql("Event not found"))?;

        let booking = Booking {
            id: BookingId::new(inner.allocate_id("booking")),
            event: Some(event),
            created_at: self.clock.now(),
        };
        inner.bookings.entry(user).or_default().push(booking.clone());
        Ok(booking)
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthData> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        inner.calls.push(ApiCall::Login {
            email: email.to_string(),
        });
        inner.take_failure(Operation::Login)?;

        let account = inner
            .accounts
            .iter()
            .find(|account| account.email == email && account.password == password)
            .cloned()
            .ok_or_else(|| ClientError::graphql("Invalid credentials!"))?;
        let token = format!("token-{}", account.id);
        inner.tokens.insert(token.clone(), account.id.clone());

        Ok(AuthData {
            user_id: account.id,
            token,
            token_expiration: 1,
            username: Some(account.username),
        })
    }

    async fn create_user(&self, input: UserInput) -> Result<User> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        inner.calls.push(ApiCall::CreateUser {
            email: input.email.clone(),
        });
        inner.take_failure(Operation::CreateUser)?;
        if inner.accounts.iter().any(|account| account.email == input.email) {
            return Err(ClientError::graphql("User exists already."));
        }

        let id = UserId::new(inner.allocate_id("user"));
        inner.accounts.push(Account {
            id: id.clone(),
            email: input.email.clone(),
            username: input.username.clone(),
            password: input.password,
        });

        Ok(User {
            id,
            email: input.email,
            username: Some(input.username),
        })
    }

    async fn bookings(&self, token: &str) -> Result<Vec<Booking>> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        inner.calls.push(ApiCall::Bookings {
            token: token.to_string(),
        });
        inner.take_failure(Operation::Bookings)?;
        let user = inner.user_for(token)?;
        Ok(inner.bookings.get(&user).cloned().unwrap_or_default())
    }

    async fn cancel_booking(&self, token: &str, booking_id: &BookingId) -> Result<()> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        inner.calls.push(ApiCall::CancelBooking {
            token: token.to_string(),
            booking_id: booking_id.clone(),
        });
        inner.take_failure(Operation::CancelBooking)?;
        let user = inner.user_for(token)?;

        let bookings = inner.bookings.entry(user).or_default();
        let before = bookings.len();
        bookings.retain(|booking| booking.id != *booking_id);
        if bookings.len() == before {
            return Err(ClientError::graphql("Booking not found"));
        }
        Ok(())
    }

    fn event_added(&self) -> BoxStream<'static, Result<Event>> {
        self.lock().calls.push(ApiCall::EventAdded);
        let receiver = self.added.subscribe();

        Box::pin(stream::unfold(receiver, |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(item) => return Some((item, receiver)),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Mock subscription lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        }))
    }
}

/// A sample event owned by `creator`
#[must_use]
pub fn sample_event(id: &str, title: &str, creator: &UserId) -> Event {
    Event {
        id: EventId::from(id),
        title: title.to_string(),
        price: 10.0,
        date: parse_timestamp("2025-06-01T18:00:00Z").unwrap_or_else(Utc::now),
        description: format!("{title} description"),
        creator: Creator { id: creator.clone() },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn injected_failure_applies_once() {
        let api = MockEventsApi::new();
        api.fail_next(Operation::Events, "boom");

        assert_eq!(api.events().await.unwrap_err(), ClientError::graphql("boom"));
        assert!(api.events().await.unwrap().is_empty());
        assert_eq!(api.count_calls(|call| *call == ApiCall::Events), 2);
    }

    #[tokio::test]
    async fn login_issues_token_usable_for_mutations() {
        let api = MockEventsApi::new();
        let (user, _) = api.register("a@b.c", "ali", "pw");

        let auth = api.login("a@b.c", "pw").await.unwrap();
        assert_eq!(auth.user_id, user);

        let input = EventInput {
            title: "A".into(),
            price: 5.0,
            date: "2025-06-01T18:00".into(),
            description: "d".into(),
        };
        let created = api.create_event(&auth.token, input).await.unwrap();
        assert_eq!(api.events_snapshot()[0].creator.id, user);
        assert_eq!(created.title, "A");
    }

    #[tokio::test]
    async fn bookings_are_stamped_by_the_clock() {
        let clock = eventbook_testing::test_clock();
        let api = MockEventsApi::new()
            .with_clock(clock.clone())
            .with_event(sample_event("e1", "A", &UserId::from("u9")));
        let (user, token) = api.register("a@b.c", "ali", "pw");

        let booking = api.book_event(&token, &EventId::from("e1")).await.unwrap();
        assert_eq!(booking.created_at, clock.now());
        assert_eq!(api.bookings_of(&user), vec![booking]);
    }

    #[tokio::test]
    async fn pushed_notifications_reach_subscribers() {
        let api = MockEventsApi::new();
        let mut added = api.event_added();
        assert_eq!(api.subscriber_count(), 1);

        api.push_event_added(sample_event("e1", "X", &UserId::from("u")));
        let event = added.next().await.unwrap().unwrap();
        assert_eq!(event.title, "X");
    }
}
