//! Presentational components.
//!
//! Pure functions of their props. Empty output means "render nothing".

use crate::messages::Messages;
use crate::router::Route;
use crate::session::SessionState;
use crate::types::{Event, UserId};
use std::fmt::Write as _;

const WIDTH: usize = 48;

/// Top bar; the current location is bracketed
#[must_use]
pub fn navigation(current: &Route, session: &SessionState) -> String {
    let links: &[Route] = if session.is_authenticated() {
        &[Route::Events, Route::Bookings]
    } else {
        &[Route::Login, Route::Events]
    };

    let mut bar = String::from("EasyEvent |");
    for link in links {
        if link == current {
            let _ = write!(bar, " [{link}]");
        } else {
            let _ = write!(bar, " {link}");
        }
    }
    if session.is_authenticated() {
        match session.username.as_deref().filter(|name| !name.is_empty()) {
            Some(name) => {
                let _ = write!(bar, " | {name} · logout");
            },
            None => bar.push_str(" | logout"),
        }
    }
    bar
}

/// Loading indicator
#[must_use]
pub fn spinner(messages: &Messages) -> String {
    format!("⟳ {}", messages.loading())
}

/// Alert banner; nothing for an empty message
#[must_use]
pub fn error_banner(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!("[!] {message}")
    }
}

/// Shade drawn behind an open modal
#[must_use]
pub fn backdrop() -> String {
    "░".repeat(WIDTH)
}

/// Props of [`modal`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalProps<'a> {
    /// Heading
    pub title: &'a str,
    /// Pre-rendered content
    pub body: String,
    /// Confirm control label
    pub confirm_label: &'a str,
    /// Cancel control label
    pub cancel_label: &'a str,
    /// Confirm control cannot be used
    pub disabled: bool,
}

/// Dialog with a confirm and a cancel control
#[must_use]
pub fn modal(props: &ModalProps<'_>) -> String {
    let rule = "─".repeat(WIDTH);
    let confirm = if props.disabled {
        format!("[{} (disabled)]", props.confirm_label)
    } else {
        format!("[{}]", props.confirm_label)
    };

    let mut out = String::new();
    let _ = writeln!(out, "┌{rule}");
    let _ = writeln!(out, "│ {}", props.title);
    let _ = writeln!(out, "├{rule}");
    for line in props.body.lines() {
        let _ = writeln!(out, "│ {line}");
    }
    let _ = writeln!(out, "├{rule}");
    let _ = writeln!(out, "│ {confirm}  [{}]", props.cancel_label);
    let _ = write!(out, "└{rule}");
    out
}

/// Props of [`event_card`]
#[derive(Clone, Copy, Debug)]
pub struct EventCardProps<'a> {
    /// Event shown
    pub event: &'a Event,
    /// Who is looking
    pub viewer: Option<&'a UserId>,
    /// Localized strings
    pub messages: &'a Messages,
}

/// One list entry
///
/// Owners see an owner label instead of the details action.
#[must_use]
pub fn event_card(props: EventCardProps<'_>) -> String {
    let EventCardProps {
        event,
        viewer,
        messages,
    } = props;

    let action = if event.is_created_by(viewer) {
        messages.owner().to_string()
    } else {
        format!("{} → select {}", messages.details(), event.id)
    };

    format!(
        "• {}\n  ${} - {}\n  {action}",
        event.title,
        event.price,
        event.date.format("%Y-%m-%d"),
    )
}
