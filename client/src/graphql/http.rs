//! GraphQL over HTTP.

use super::api::EventsApi;
use super::documents;
use super::subscription::SubscriptionClient;
use super::{GraphqlRequest, decode_response};
use crate::config::ApiConfig;
use crate::error::{ClientError, Result};
use crate::types::{
    AuthData, Booking, BookingId, CreatedEvent, Event, EventId, EventInput, User, UserInput,
};
use async_trait::async_trait;
use futures::stream::BoxStream;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;

/// GraphQL API client
#[derive(Clone, Debug)]
pub struct GraphqlClient {
    client: Client,
    url: String,
    subscriptions: SubscriptionClient,
}

impl GraphqlClient {
    /// Create a client for the configured endpoints
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.graphql_url.clone(),
            subscriptions: SubscriptionClient::new(config.subscriptions_url.clone()),
        })
    }

    /// HTTP endpoint
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST one operation and decode its root `field`
    ///
    /// GraphQL errors win over the HTTP status, so a 400 carrying an error
    /// message surfaces that message.
    async fn execute<T: DeserializeOwned>(
        &self,
        document: &str,
        variables: Value,
        token: Option<&str>,
        field: &str,
    ) -> Result<T> {
        tracing::debug!(operation = field, authenticated = token.is_some(), "Sending GraphQL request");

        let mut request = self.client.post(&self.url).json(&GraphqlRequest {
            query: document,
            variables,
        });
        if let Some(token) = token.filter(|token| !token.is_empty()) {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        match decode_response(&body, field) {
            Err(ClientError::Decode(reason)) if !status.is_success() => {
                tracing::warn!(operation = field, status = status.as_u16(), %reason, "GraphQL request failed");
                Err(ClientError::Http {
                    status: status.as_u16(),
                })
            },
            Err(error) => {
                tracing::warn!(operation = field, %error, "GraphQL request failed");
                Err(error)
            },
            Ok(value) => Ok(value),
        }
    }
}

#[async_trait]
impl EventsApi for GraphqlClient {
    async fn events(&self) -> Result<Vec<Event>> {
        self.execute(documents::EVENTS, Value::Null, None, "events")
            .await
    }

    async fn create_event(&self, token: &str, input: EventInput) -> Result<CreatedEvent> {
        let variables = serde_json::to_value(&input)?;
        self.execute(documents::CREATE_EVENT, variables, Some(token), "createEvent")
            .await
    }

    async fn book_event(&self, token: &str, event_id: &EventId) -> Result<Booking> {
        self.execute(
            documents::BOOK_EVENT,
            json!({ "eventId": event_id }),
            Some(token),
            "bookEvent",
        )
        .await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthData> {
        self.execute(
            documents::LOGIN,
            json!({ "email": email, "password": password }),
            None,
            "login",
        )
        .await
    }

    async fn create_user(&self, input: UserInput) -> Result<User> {
        let variables = serde_json::to_value(&input)?;
        self.execute(documents::CREATE_USER, variables, None, "createUser")
            .await
    }

    async fn bookings(&self, token: &str) -> Result<Vec<Booking>> {
        self.execute(documents::BOOKINGS, Value::Null, Some(token), "bookings")
            .await
    }

    async fn cancel_booking(&self, token: &str, booking_id: &BookingId) -> Result<()> {
        let _: Value = self
            .execute(
                documents::CANCEL_BOOKING,
                json!({ "bookingId": booking_id }),
                Some(token),
                "cancelBooking",
            )
            .await?;
        Ok(())
    }

    fn event_added(&self) -> BoxStream<'static, Result<Event>> {
        self.subscriptions
            .subscribe(documents::EVENT_ADDED, "eventAdded")
    }
}
