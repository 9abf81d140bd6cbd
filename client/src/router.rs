//! Path → page resolution with authentication gating.
//!
//! | Path        | Unauthenticated | Authenticated |
//! |-------------|-----------------|---------------|
//! | `/`         | → `/events`     | → `/events`   |
//! | `/login`    | Login           | Events        |
//! | `/signup`   | Signup          | Events        |
//! | `/events`   | Events          | Events        |
//! | `/bookings` | → `/login`      | Bookings      |
//! | other       | Not found       | Not found     |

use crate::session::SessionState;
use std::fmt;

/// A known location of the client
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Root,
    /// `/login`
    Login,
    /// `/signup`
    Signup,
    /// `/events`
    Events,
    /// `/bookings`
    Bookings,
    /// Anything else, normalized
    NotFound(String),
}

impl Route {
    /// Match a path, ignoring query strings, fragments and trailing slashes
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" => Self::Root,
            "/login" => Self::Login,
            "/signup" => Self::Signup,
            "/events" => Self::Events,
            "/bookings" => Self::Bookings,
            other if other.starts_with('/') => Self::NotFound(other.to_string()),
            other => Self::NotFound(format!("/{other}")),
        }
    }

    /// Canonical path of the route
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Root => "/",
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::Events => "/events",
            Self::Bookings => "/bookings",
            Self::NotFound(path) => path,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A page that can be rendered
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    /// Login form
    Login,
    /// Sign-up form
    Signup,
    /// Events list and workflows
    Events,
    /// The viewer's bookings
    Bookings,
    /// Unknown path
    NotFound,
}

/// Outcome of resolving a route
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Render this page at the requested location
    Render(Page),
    /// Replace the location with another route
    Redirect(Route),
}

/// Resolve `route` for `session`
#[must_use]
pub fn resolve(route: &Route, session: &SessionState) -> Resolution {
    let authenticated = session.is_authenticated();

    match route {
        Route::Root => Resolution::Redirect(Route::Events),
        Route::Login if authenticated => Resolution::Render(Page::Events),
        Route::Login => Resolution::Render(Page::Login),
        Route::Signup if authenticated => Resolution::Render(Page::Events),
        Route::Signup => Resolution::Render(Page::Signup),
        Route::Events => Resolution::Render(Page::Events),
        Route::Bookings if authenticated => Resolution::Render(Page::Bookings),
        Route::Bookings => Resolution::Redirect(Route::Login),
        Route::NotFound(_) => Resolution::Render(Page::NotFound),
    }
}

/// Follow redirects until a page renders
///
/// Returns the final location and its page. Redirect chains are at most two
/// hops long, so the loop is bounded.
#[must_use]
pub fn navigate(path: &str, session: &SessionState) -> (Route, Page) {
    let mut route = Route::parse(path);

    for _ in 0..4 {
        match resolve(&route, session) {
            Resolution::Render(page) => return (route, page),
            Resolution::Redirect(next) => {
                tracing::debug!(from = %route, to = %next, "Redirecting");
                route = next;
            },
        }
    }

    tracing::warn!(%route, "Redirect loop, showing events");
    (Route::Events, Page::Events)
}
