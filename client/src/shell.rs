//! Line commands of the interactive shell.

use crate::types::{BookingId, EventId, FormField};
use std::str::FromStr;
use thiserror::Error;

/// Usage text printed by `help`
pub const HELP: &str = "\
go <path>                              open /events, /bookings, /login, /signup
login <email> <password>               start a session
signup <email> <username> <password>   create an account
logout                                 end the session
new                                    open the creation modal
set <title|price|date|description> <value>
confirm                                submit the open modal
cancel                                 close the open modal
select <event-id>                      open the booking modal
book                                   book the selected event
refresh                                reload the list
unbook <booking-id>                    cancel a booking
dismiss                                clear the alert
help                                   show this text
quit                                   leave";

/// A parsed shell line
#[derive(Clone, PartialEq, Eq)]
pub enum Command {
    /// Navigate to a path
    Go(String),
    /// Log in
    Login {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },
    /// Create an account
    Signup {
        /// Account email
        email: String,
        /// Display name
        username: String,
        /// Account password
        password: String,
    },
    /// End the session
    Logout,
    /// Open the creation modal
    New,
    /// Change a form field; the value is the rest of the line
    Set {
        /// Field to change
        field: FormField,
        /// New text
        value: String,
    },
    /// Submit whichever modal is open
    Confirm,
    /// Close whichever modal is open
    Cancel,
    /// Open the booking modal
    Select(EventId),
    /// Book the selected event
    Book,
    /// Reload the current list
    Refresh,
    /// Cancel a booking
    Unbook(BookingId),
    /// Clear the alert
    Dismiss,
    /// Print usage
    Help,
    /// Leave the shell
    Quit,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login { email, .. } => f
                .debug_struct("Login")
                .field("email", email)
                .finish_non_exhaustive(),
            Self::Signup {
                email, username, ..
            } => f
                .debug_struct("Signup")
                .field("email", email)
                .field("username", username)
                .finish_non_exhaustive(),
            Self::Go(path) => f.debug_tuple("Go").field(path).finish(),
            Self::Set { field, value } => f
                .debug_struct("Set")
                .field("field", field)
                .field("value", value)
                .finish(),
            Self::Select(id) => f.debug_tuple("Select").field(id).finish(),
            Self::Unbook(id) => f.debug_tuple("Unbook").field(id).finish(),
            Self::Logout => f.write_str("Logout"),
            Self::New => f.write_str("New"),
            Self::Confirm => f.write_str("Confirm"),
            Self::Cancel => f.write_str("Cancel"),
            Self::Book => f.write_str("Book"),
            Self::Refresh => f.write_str("Refresh"),
            Self::Dismiss => f.write_str("Dismiss"),
            Self::Help => f.write_str("Help"),
            Self::Quit => f.write_str("Quit"),
        }
    }
}

/// Why a line is not a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Blank line
    #[error("empty command")]
    Empty,

    /// First word is not a command
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    /// Wrong arguments
    #[error("usage: {0}")]
    Usage(&'static str),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, rest)| (name, rest.trim()));
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("", _) => return Err(CommandError::Empty),
            ("go", [path]) => Self::Go((*path).to_string()),
            ("go", _) => return Err(CommandError::Usage("go <path>")),
            ("login", [email, password]) => Self::Login {
                email: (*email).to_string(),
                password: (*password).to_string(),
            },
            ("login", _) => return Err(CommandError::Usage("login <email> <password>")),
            ("signup", [email, username, password]) => Self::Signup {
                email: (*email).to_string(),
                username: (*username).to_string(),
                password: (*password).to_string(),
            },
            ("signup", _) => {
                return Err(CommandError::Usage("signup <email> <username> <password>"));
            },
            ("logout", []) => Self::Logout,
            ("new", []) => Self::New,
            ("set", [field, ..]) => {
                let field = field
                    .parse()
                    .map_err(|_| CommandError::Usage("set <title|price|date|description> <value>"))?;
                let value = rest
                    .split_once(char::is_whitespace)
                    .map_or("", |(_, value)| value.trim());
                Self::Set {
                    field,
                    value: value.to_string(),
                }
            },
            ("set", []) => {
                return Err(CommandError::Usage("set <title|price|date|description> <value>"));
            },
            ("confirm", []) => Self::Confirm,
            ("cancel", []) => Self::Cancel,
            ("select", [id]) => Self::Select(EventId::from(*id)),
            ("select", _) => return Err(CommandError::Usage("select <event-id>")),
            ("book", []) => Self::Book,
            ("refresh", []) => Self::Refresh,
            ("unbook", [id]) => Self::Unbook(BookingId::from(*id)),
            ("unbook", _) => return Err(CommandError::Usage("unbook <booking-id>")),
            ("dismiss", []) => Self::Dismiss,
            ("help" | "?", _) => Self::Help,
            ("quit" | "exit", _) => Self::Quit,
            ("logout" | "new" | "confirm" | "cancel" | "book" | "refresh" | "dismiss", _) => {
                return Err(CommandError::Usage("command takes no arguments"));
            },
            (other, _) => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}
