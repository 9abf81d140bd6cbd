//! Mock implementations of the client's collaborators.
//!
//! Session storage has its own in-memory backend in [`crate::storage`].

pub mod api;

pub use api::{ApiCall, MockEventsApi, Operation, sample_event};
