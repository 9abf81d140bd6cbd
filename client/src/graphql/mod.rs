//! Remote data access over GraphQL.
//!
//! Queries and mutations are POSTed as `{query, variables}`; the
//! `eventAdded` subscription runs over the `graphql-transport-ws` protocol.
//! Pages only see the [`EventsApi`] trait.

pub mod api;
pub mod documents;
pub mod http;
pub mod subscription;

pub use api::EventsApi;
pub use http::GraphqlClient;
pub use subscription::SubscriptionClient;

use crate::error::{ClientError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of every query, mutation and subscription request
#[derive(Debug, Serialize)]
pub struct GraphqlRequest<'a> {
    /// Document text
    pub query: &'a str,
    /// Operation variables
    #[serde(skip_serializing_if = "Value::is_null")]
    pub variables: Value,
}

/// One entry of a response's `errors` array
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    /// Human-readable message
    pub message: String,
}

/// A GraphQL response (or subscription `next` payload)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphqlResponse {
    /// Result data, keyed by root field
    #[serde(default)]
    pub data: Option<Value>,
    /// Errors reported by the server
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl GraphqlResponse {
    /// Extract and decode the root `field`
    ///
    /// The first server error wins over any partial data.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::GraphQl`] with the first error message, or
    /// [`ClientError::Decode`] if `field` is missing or has the wrong shape.
    pub fn into_field<T: DeserializeOwned>(self, field: &str) -> Result<T> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(ClientError::graphql(error.message));
        }

        let mut data = self
            .data
            .ok_or_else(|| ClientError::Decode("response has no data".to_string()))?;
        let value = data
            .get_mut(field)
            .map(Value::take)
            .ok_or_else(|| ClientError::Decode(format!("missing field `{field}`")))?;

        Ok(serde_json::from_value(value)?)
    }
}

/// Decode a raw response body and extract `field`
///
/// # Errors
///
/// See [`GraphqlResponse::into_field`]; malformed JSON is a decode error.
pub fn decode_response<T: DeserializeOwned>(body: &str, field: &str) -> Result<T> {
    let response: GraphqlResponse = serde_json::from_str(body)?;
    response.into_field(field)
}
