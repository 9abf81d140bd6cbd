//! Domain types shared by the pages and the remote API.
//!
//! Field names follow the GraphQL schema (`_id`, `createdAt`, ...) through
//! serde renames so API responses decode straight into these types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a server-assigned id
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The id as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// Server-assigned user identifier
    UserId
);
string_id!(
    /// Server-assigned event identifier
    EventId
);
string_id!(
    /// Server-assigned booking identifier
    BookingId
);

// ============================================================================
// Events
// ============================================================================

/// Reference to the user who created an event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    /// Creator's user id
    #[serde(rename = "_id")]
    pub id: UserId,
}

/// A bookable event as listed by the API
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event id
    #[serde(rename = "_id")]
    pub id: EventId,
    /// Title
    pub title: String,
    /// Price, strictly positive
    pub price: f64,
    /// When the event takes place
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,
    /// Free-form description
    pub description: String,
    /// Who created it
    pub creator: Creator,
}

impl Event {
    /// Whether `viewer` created this event
    #[must_use]
    pub fn is_created_by(&self, viewer: Option<&UserId>) -> bool {
        viewer.is_some_and(|viewer| *viewer == self.creator.id)
    }
}

/// The `createEvent` payload, which does not echo the creator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatedEvent {
    /// Event id
    #[serde(rename = "_id")]
    pub id: EventId,
    /// Title
    pub title: String,
    /// Price
    pub price: f64,
    /// Date
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,
    /// Description
    pub description: String,
}

impl CreatedEvent {
    /// Attribute the created event to the user who issued the mutation
    #[must_use]
    pub fn with_creator(self, creator: UserId) -> Event {
        Event {
            id: self.id,
            title: self.title,
            price: self.price,
            date: self.date,
            description: self.description,
            creator: Creator { id: creator },
        }
    }
}

/// Variables of the `createEvent` mutation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventInput {
    /// Trimmed title
    pub title: String,
    /// Parsed price
    pub price: f64,
    /// Date exactly as entered
    pub date: String,
    /// Trimmed description
    pub description: String,
}

/// Editable field of the creation form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    /// Title input
    Title,
    /// Price input
    Price,
    /// Date input
    Date,
    /// Description input
    Description,
}

impl std::str::FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "price" => Ok(Self::Price),
            "date" => Ok(Self::Date),
            "description" => Ok(Self::Description),
            other => Err(format!("unknown field: {other}")),
        }
    }
}

/// Raw creation form contents, kept as typed text
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventForm {
    /// Title text
    pub title: String,
    /// Price text
    pub price: String,
    /// Date text
    pub date: String,
    /// Description text
    pub description: String,
}

impl EventForm {
    /// Replace one field's text
    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Title => self.title = value,
            FormField::Price => self.price = value,
            FormField::Date => self.date = value,
            FormField::Description => self.description = value,
        }
    }

    /// Check the form and build the mutation input
    ///
    /// Title, date and description must be non-blank after trimming; the
    /// price must parse to a finite number greater than zero.
    #[must_use]
    pub fn validate(&self) -> Option<EventInput> {
        let title = self.title.trim();
        let description = self.description.trim();
        let date = self.date.trim();
        let price = self.price.trim().parse::<f64>().ok()?;

        if title.is_empty() || description.is_empty() || date.is_empty() {
            return None;
        }
        if !price.is_finite() || price <= 0.0 {
            return None;
        }

        Some(EventInput {
            title: title.to_string(),
            price,
            date: self.date.clone(),
            description: description.to_string(),
        })
    }

    /// Whether every field is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.price.is_empty()
            && self.date.is_empty()
            && self.description.is_empty()
    }
}

// ============================================================================
// Bookings and users
// ============================================================================

/// Event summary embedded in a booking
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingEvent {
    /// Event id
    #[serde(rename = "_id")]
    pub id: EventId,
    /// Event title
    pub title: String,
    /// Event date
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,
}

/// A reservation of an event by the viewer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking id
    #[serde(rename = "_id")]
    pub id: BookingId,
    /// The booked event, absent if it was deleted server-side
    #[serde(default)]
    pub event: Option<BookingEvent>,
    /// When the booking was made
    #[serde(rename = "createdAt", deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Result of the `login` query
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthData {
    /// Authenticated user
    #[serde(rename = "userId")]
    pub user_id: UserId,
    /// Bearer token
    pub token: String,
    /// Token lifetime in hours
    #[serde(rename = "tokenExpiration", default)]
    pub token_expiration: i64,
    /// Display name
    #[serde(default)]
    pub username: Option<String>,
}

/// Variables of the `createUser` mutation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    /// Login email
    pub email: String,
    /// Display name
    pub username: String,
    /// Plain password, sent once over the API
    pub password: String,
}

/// User returned by `createUser`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User id
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Login email
    pub email: String,
    /// Display name
    #[serde(default)]
    pub username: Option<String>,
}

// ============================================================================
// Page plumbing
// ============================================================================

/// Progress of a page's list query
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// Page not mounted yet
    #[default]
    NotRequested,
    /// Query in flight; the spinner is shown
    Loading,
    /// Data captured into state
    Loaded,
    /// Query failed; the list renders nothing
    Failed,
}

// ============================================================================
// Timestamps
// ============================================================================

/// Parse a date the way users and the API write them
///
/// Accepts RFC 3339, `datetime-local` style `YYYY-MM-DDTHH:MM[:SS]`,
/// a bare `YYYY-MM-DD`, and epoch milliseconds.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return day.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
    }
    raw.parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Millis(i64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Text(text) => parse_timestamp(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {text}"))),
        Raw::Millis(millis) => DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {millis}"))),
    }
}
