//! Page renderers composed from components.

use super::components::{
    EventCardProps, ModalProps, backdrop, error_banner, event_card, modal, spinner,
};
use crate::auth::{AuthMode, AuthState};
use crate::bookings::BookingsState;
use crate::events::{EventsState, Mode};
use crate::messages::Messages;
use crate::session::SessionState;
use crate::types::LoadStatus;

fn push_block(out: &mut Vec<String>, block: String) {
    if !block.is_empty() {
        out.push(block);
    }
}

/// The events page
///
/// The alert banner is shown to guests as well, so list errors and live
/// notifications are visible without a session.
#[must_use]
pub fn render_events(state: &EventsState, session: &SessionState, messages: &Messages) -> String {
    let viewer = session.viewer_id();
    let mut blocks = Vec::new();

    push_block(&mut blocks, error_banner(&state.alert));

    match &state.mode {
        Mode::Idle => {},
        Mode::Creating => {
            blocks.push(backdrop());
            let [title, price, date, description] = messages.form_labels();
            let mut body = Vec::new();
            push_block(&mut body, error_banner(&state.modal_alert));
            body.push(format!("{title}: {}", state.form.title));
            body.push(format!("{price}: {}", state.form.price));
            body.push(format!("{date}: {}", state.form.date));
            body.push(format!("{description}: {}", state.form.description));
            if state.creating_pending {
                body.push(spinner(messages));
            }
            blocks.push(modal(&ModalProps {
                title: messages.create_title(),
                body: body.join("\n"),
                confirm_label: messages.confirm(),
                cancel_label: messages.cancel(),
                disabled: state.creating_pending,
            }));
        },
        Mode::ViewingDetail(event) => {
            blocks.push(backdrop());
            let confirm_label = if session.is_authenticated() {
                messages.book().to_string()
            } else {
                format!("{} → /login", messages.login_to_book())
            };
            blocks.push(modal(&ModalProps {
                title: messages.book_title(),
                body: format!(
                    "{}\n${} - {}\n{}",
                    event.title,
                    event.price,
                    event.date.format("%Y-%m-%d"),
                    event.description
                ),
                confirm_label: &confirm_label,
                cancel_label: messages.cancel(),
                disabled: state.is_booking_disabled(viewer) || state.booking_pending,
            }));
        },
    }

    if session.is_authenticated() {
        blocks.push(format!(
            "{}\n[{} → new]",
            messages.share_events(),
            messages.create_event()
        ));
    }

    blocks.push(messages.events_heading().to_string());
    match state.list {
        LoadStatus::NotRequested | LoadStatus::Failed => {},
        LoadStatus::Loading => blocks.push(spinner(messages)),
        LoadStatus::Loaded => {
            for event in &state.events {
                blocks.push(event_card(EventCardProps {
                    event,
                    viewer,
                    messages,
                }));
            }
        },
    }

    blocks.join("\n\n")
}

/// The login or sign-up page
#[must_use]
pub fn render_auth(state: &AuthState, messages: &Messages) -> String {
    let mut blocks = Vec::new();
    push_block(&mut blocks, error_banner(&state.alert));

    let (heading, usage) = match state.mode {
        AuthMode::Login => (messages.login_heading(), "login <email> <password>"),
        AuthMode::Signup => (
            messages.signup_heading(),
            "signup <email> <username> <password>",
        ),
    };
    blocks.push(heading.to_string());
    if !state.email.is_empty() {
        blocks.push(format!("email: {}", state.email));
    }
    blocks.push(if state.pending {
        spinner(messages)
    } else {
        usage.to_string()
    });

    blocks.join("\n\n")
}

/// The bookings page
#[must_use]
pub fn render_bookings(state: &BookingsState, messages: &Messages) -> String {
    let mut blocks = Vec::new();
    push_block(&mut blocks, error_banner(&state.alert));
    blocks.push(messages.bookings_heading().to_string());

    match state.list {
        LoadStatus::NotRequested | LoadStatus::Failed => {},
        LoadStatus::Loading => blocks.push(spinner(messages)),
        LoadStatus::Loaded => {
            for booking in &state.bookings {
                let title = booking
                    .event
                    .as_ref()
                    .map_or("-", |event| event.title.as_str());
                let pending = if state.cancelling.as_ref() == Some(&booking.id) {
                    format!(" {}", spinner(messages))
                } else {
                    String::new()
                };
                blocks.push(format!(
                    "• {title} ({})\n  [unbook {}]{pending}",
                    booking.created_at.format("%Y-%m-%d"),
                    booking.id
                ));
            }
        },
    }

    blocks.join("\n\n")
}

/// Unknown route
#[must_use]
pub fn render_not_found(path: &str, messages: &Messages) -> String {
    format!("{}: {path}", messages.not_found())
}
