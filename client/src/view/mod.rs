//! Text rendering of page state.

pub mod components;
pub mod pages;

pub use components::{
    EventCardProps, ModalProps, backdrop, error_banner, event_card, modal, navigation, spinner,
};
pub use pages::{render_auth, render_bookings, render_events, render_not_found};
