//! Application shell.
//!
//! Owns the session and one store per page, keeps the current location, and
//! turns locations and shell commands into page actions. Only the page at the
//! current location is mounted.

use crate::auth::{AuthAction, AuthEnvironment, AuthMode, AuthReducer, AuthState};
use crate::bookings::{BookingsAction, BookingsEnvironment, BookingsReducer, BookingsState};
use crate::config::Config;
use crate::error::Result;
use crate::events::{EventsAction, EventsEnvironment, EventsReducer, EventsState, Mode};
use crate::graphql::{EventsApi, GraphqlClient};
use crate::messages::Messages;
use crate::router::{self, Page, Route};
use crate::session::SessionHandle;
use crate::shell::Command;
use crate::storage::{FileStorage, SessionStorage};
use crate::view;
use eventbook_runtime::{Store, StoreError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, broadcast};

/// Store of the events page
pub type EventsStore = Store<EventsState, EventsAction, EventsEnvironment, EventsReducer>;
/// Store of the login and sign-up pages
pub type AuthStore = Store<AuthState, AuthAction, AuthEnvironment, AuthReducer>;
/// Store of the bookings page
pub type BookingsStore = Store<BookingsState, BookingsAction, BookingsEnvironment, BookingsReducer>;

/// Slack on top of the request timeout for effects that also write the session
const SETTLE_MARGIN: Duration = Duration::from_secs(6);

/// Where the client currently is
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    /// Location after redirects
    pub route: Route,
    /// Page rendered there
    pub page: Page,
}

/// What a shell command did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The command reached a page
    Applied,
    /// Nothing on the current page handles the command
    Ignored,
    /// The shell should exit
    Quit,
}

/// The client: session, pages and location
pub struct EventbookApp {
    config: Config,
    messages: Messages,
    session: SessionHandle,
    events: EventsStore,
    auth: AuthStore,
    bookings: BookingsStore,
    location: RwLock<Option<Location>>,
}

impl EventbookApp {
    /// Connect to the configured API and restore the session from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the session
    /// file exists but cannot be read.
    pub fn new(config: Config) -> Result<Self> {
        let api = GraphqlClient::new(&config.api)?;
        let storage = FileStorage::open(config.storage.session_path.clone())?;
        Ok(Self::with_parts(config, Arc::new(api), Arc::new(storage)))
    }

    /// Assemble the client from explicit collaborators
    #[must_use]
    pub fn with_parts(
        config: Config,
        api: Arc<dyn EventsApi>,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        let messages = Messages::new(config.ui.locale);
        let session = SessionHandle::new(storage);

        let events = Store::new(
            EventsState::default(),
            EventsReducer::new(),
            EventsEnvironment::new(
                Arc::clone(&api),
                session.reader(),
                messages,
                config.refresh_debounce(),
            ),
        );
        let auth = Store::new(
            AuthState::default(),
            AuthReducer::new(),
            AuthEnvironment::new(Arc::clone(&api), session.clone(), messages),
        );
        let bookings = Store::new(
            BookingsState::default(),
            BookingsReducer::new(),
            BookingsEnvironment::new(api, session.reader(), messages),
        );

        Self {
            config,
            messages,
            session,
            events,
            auth,
            bookings,
            location: RwLock::new(None),
        }
    }

    /// The session shared by all pages
    #[must_use]
    pub const fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Localized strings
    #[must_use]
    pub const fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Current location; `None` before the first navigation
    pub async fn location(&self) -> Option<Location> {
        self.location.read().await.clone()
    }

    /// Snapshot of the events page
    pub async fn events_state(&self) -> EventsState {
        self.events.state(Clone::clone).await
    }

    /// Snapshot of the auth page
    pub async fn auth_state(&self) -> AuthState {
        self.auth.state(Clone::clone).await
    }

    /// Snapshot of the bookings page
    pub async fn bookings_state(&self) -> BookingsState {
        self.bookings.state(Clone::clone).await
    }

    /// Results produced on the events page, including live notifications
    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<EventsAction> {
        self.events.subscribe_actions()
    }

    /// Sum of every page's alert counter; changes whenever an alert is raised
    pub async fn alert_epoch(&self) -> u64 {
        self.events.state(|s| s.alert_epoch).await
            + self.auth.state(|s| s.alert_epoch).await
            + self.bookings.state(|s| s.alert_epoch).await
    }

    fn effect_timeout(&self) -> Duration {
        self.config.request_timeout() + SETTLE_MARGIN
    }

    /// Go to `path`, following redirects
    ///
    /// Leaving a page unmounts it; arriving mounts the new page and waits for
    /// its first load.
    ///
    /// # Errors
    ///
    /// Returns an error if a page store is shut down.
    pub async fn navigate(&self, path: &str) -> Result<Location> {
        let session = self.session.current();
        let (route, page) = router::navigate(path, &session);
        tracing::info!(path, %route, ?page, "Navigating");

        let mut location = self.location.write().await;
        if let Some(previous) = location.as_ref() {
            if previous.page != page {
                self.unmount(previous.page).await?;
            }
        }
        self.mount(page).await?;

        let arrived = Location { route, page };
        *location = Some(arrived.clone());
        Ok(arrived)
    }

    /// Re-resolve the current location, e.g. after the session changed
    async fn reroute(&self) -> Result<Location> {
        let path = self
            .location()
            .await
            .map_or_else(|| Route::Root.path().to_string(), |l| l.route.path().to_string());
        self.navigate(&path).await
    }

    async fn mount(&self, page: Page) -> Result<()> {
        match page {
            Page::Events => {
                let loaded = self
                    .events
                    .send_and_wait_for(
                        EventsAction::Mount,
                        |a| {
                            matches!(
                                a,
                                EventsAction::EventsLoaded { .. } | EventsAction::EventsFailed { .. }
                            )
                        },
                        self.effect_timeout(),
                    )
                    .await;
                match loaded {
                    Ok(_) => {},
                    Err(StoreError::Timeout) => {
                        tracing::warn!("Events list still loading after timeout");
                    },
                    Err(error) => return Err(error.into()),
                }
            },
            Page::Bookings => {
                let mut handle = self.bookings.send(BookingsAction::Mount).await?;
                handle.wait_with_timeout(self.effect_timeout()).await?;
            },
            Page::Login => {
                self.auth.send(AuthAction::SetMode(AuthMode::Login)).await?;
            },
            Page::Signup => {
                self.auth.send(AuthAction::SetMode(AuthMode::Signup)).await?;
            },
            Page::NotFound => {},
        }
        Ok(())
    }

    async fn unmount(&self, page: Page) -> Result<()> {
        if page == Page::Events {
            self.events.send(EventsAction::Unmount).await?;
        }
        Ok(())
    }

    async fn current_page(&self) -> Option<Page> {
        self.location.read().await.as_ref().map(|l| l.page)
    }

    /// Run one shell command against the current page
    ///
    /// # Errors
    ///
    /// Returns an error if a page store is shut down or a remote result does
    /// not arrive in time.
    pub async fn execute(&self, command: Command) -> Result<Outcome> {
        tracing::debug!(?command, "Executing command");
        let page = self.current_page().await;

        match command {
            Command::Go(path) => {
                self.navigate(&path).await?;
            },
            Command::Help => {},
            Command::Quit => return Ok(Outcome::Quit),

            Command::Login { email, password } => {
                if self.session.current().is_authenticated() {
                    return Ok(Outcome::Ignored);
                }
                if page != Some(Page::Login) {
                    self.navigate(Route::Login.path()).await?;
                }
                let mut handle = self
                    .auth
                    .send(AuthAction::SubmitLogin { email, password })
                    .await?;
                handle.wait_with_timeout(self.effect_timeout()).await?;
                self.reroute().await?;
            },
            Command::Signup {
                email,
                username,
                password,
            } => {
                if page != Some(Page::Signup) {
                    self.navigate(Route::Signup.path()).await?;
                }
                let mut handle = self
                    .auth
                    .send(AuthAction::SubmitSignup {
                        email,
                        username,
                        password,
                    })
                    .await?;
                handle.wait_with_timeout(self.effect_timeout()).await?;

                // A created account switches the form to login
                if self.auth.state(|s| s.mode).await == AuthMode::Login {
                    *self.location.write().await = Some(Location {
                        route: Route::Login,
                        page: Page::Login,
                    });
                }
            },
            Command::Logout => {
                self.session.logout().await?;
                self.reroute().await?;
            },

            Command::New if page == Some(Page::Events) => {
                self.events.send(EventsAction::StartCreating).await?;
            },
            Command::Set { field, value } if page == Some(Page::Events) => {
                self.events
                    .send(EventsAction::EditForm { field, value })
                    .await?;
            },
            Command::Select(event_id) if page == Some(Page::Events) => {
                self.events
                    .send(EventsAction::SelectEvent { event_id })
                    .await?;
            },
            Command::Confirm if page == Some(Page::Events) => {
                let mode = self.events.state(|s| s.mode.clone()).await;
                let action = match mode {
                    Mode::Creating => EventsAction::ConfirmCreate,
                    Mode::ViewingDetail(_) => EventsAction::ConfirmBooking,
                    Mode::Idle => return Ok(Outcome::Ignored),
                };
                self.submit_events(action).await?;
            },
            Command::Book if page == Some(Page::Events) => {
                self.submit_events(EventsAction::ConfirmBooking).await?;
            },
            Command::Cancel if page == Some(Page::Events) => {
                let mode = self.events.state(|s| s.mode.clone()).await;
                let action = match mode {
                    Mode::Creating => EventsAction::CancelCreating,
                    Mode::ViewingDetail(_) => EventsAction::CancelDetail,
                    Mode::Idle => return Ok(Outcome::Ignored),
                };
                self.events.send(action).await?;
            },
            Command::Dismiss if page == Some(Page::Events) => {
                self.events.send(EventsAction::DismissAlert).await?;
            },
            Command::Refresh if page == Some(Page::Events) => {
                let mut handle = self.events.send(EventsAction::RefreshRequested).await?;
                handle.wait_with_timeout(self.effect_timeout()).await?;
            },
            Command::Refresh if page == Some(Page::Bookings) => {
                self.mount(Page::Bookings).await?;
            },
            Command::Unbook(booking_id) if page == Some(Page::Bookings) => {
                let mut handle = self
                    .bookings
                    .send(BookingsAction::CancelBooking { booking_id })
                    .await?;
                handle.wait_with_timeout(self.effect_timeout()).await?;
            },

            Command::New
            | Command::Set { .. }
            | Command::Select(_)
            | Command::Confirm
            | Command::Book
            | Command::Cancel
            | Command::Dismiss
            | Command::Refresh
            | Command::Unbook(_) => {
                tracing::debug!(?page, "Command not handled on this page");
                return Ok(Outcome::Ignored);
            },
        }

        Ok(Outcome::Applied)
    }

    /// Send a mutation, wait for its result, then follow any navigation
    /// request the page raised
    async fn submit_events(&self, action: EventsAction) -> Result<()> {
        let mut handle = self.events.send(action).await?;
        handle.wait_with_timeout(self.effect_timeout()).await?;

        if let Some(route) = self.events.state(|s| s.navigate_to.clone()).await {
            self.events.send(EventsAction::NavigationHandled).await?;
            self.navigate(route.path()).await?;
        }
        Ok(())
    }

    /// Text of the current page, with the navigation bar
    pub async fn render(&self) -> String {
        let Some(location) = self.location().await else {
            return String::new();
        };
        let session = self.session.current();

        let body = match location.page {
            Page::Events => {
                let state = self.events_state().await;
                view::render_events(&state, &session, &self.messages)
            },
            Page::Login | Page::Signup => {
                let state = self.auth_state().await;
                view::render_auth(&state, &self.messages)
            },
            Page::Bookings => {
                let state = self.bookings_state().await;
                view::render_bookings(&state, &self.messages)
            },
            Page::NotFound => view::render_not_found(location.route.path(), &self.messages),
        };

        format!("{}\n\n{body}", view::navigation(&location.route, &session))
    }

    /// Unmount the current page and stop every store
    ///
    /// # Errors
    ///
    /// Returns an error if pending effects do not finish within `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<()> {
        tracing::info!("Shutting down");
        if let Some(page) = self.current_page().await {
            self.unmount(page).await?;
        }

        self.events.shutdown(timeout).await?;
        self.bookings.shutdown(timeout).await?;
        self.auth.shutdown(timeout).await?;
        self.session.shutdown(timeout).await
    }
}
