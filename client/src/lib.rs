//! # Eventbook
//!
//! Client of an event booking service: browse events, publish your own,
//! book other people's, and get told live when someone adds one.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │    Imperative Shell (app, main)         │  ← stdin commands, terminal
//! │  - Routing and page mounting            │  ← GraphQL over HTTP/WebSocket
//! ├─────────────────────────────────────────┤
//! │    Functional Core (page reducers)      │
//! │  - session, events, auth, bookings      │  ← pure state transitions
//! │  - Effects as values                    │  ← remote calls, timers, streams
//! ├─────────────────────────────────────────┤
//! │    View (pure text components)          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Every page is a [`eventbook_runtime::Store`] driven by its reducer. The
//! session is a store too, shared with pages through
//! [`session::SessionHandle`] (writers) and [`session::SessionReader`]
//! (everyone else).
//!
//! # Example
//!
//! ```no_run
//! use eventbook::{Config, EventbookApp};
//!
//! # async fn run() -> eventbook::Result<()> {
//! let app = EventbookApp::new(Config::from_env())?;
//! app.navigate("/events").await?;
//! println!("{}", app.render().await);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod app;
pub mod auth;
pub mod bookings;
pub mod config;
pub mod error;
pub mod events;
pub mod graphql;
pub mod messages;
pub mod mocks;
pub mod router;
pub mod session;
pub mod shell;
pub mod storage;
pub mod types;
pub mod view;

pub use app::{EventbookApp, Location, Outcome};
pub use config::Config;
pub use error::{ClientError, Result};
