//! Events page driven through the app shell against the in-memory API.

#![allow(clippy::unwrap_used, clippy::panic)]

mod common;

use common::{DEBOUNCE, app, wait_for_events_action, wait_for_subscriber};
use eventbook::events::{EventsAction, Mode};
use eventbook::mocks::{ApiCall, MockEventsApi, Operation, sample_event};
use eventbook::router::Page;
use eventbook::shell::Command;
use eventbook::storage::{MemoryStorage, SessionStorage, TOKEN_KEY, USER_ID_KEY};
use eventbook::types::{EventInput, LoadStatus, UserId};
use eventbook::{EventbookApp, Outcome};
use std::sync::Arc;
use std::time::Duration;

/// Log `storage` in as a freshly registered user
fn sign_in(api: &MockEventsApi, storage: &MemoryStorage) -> UserId {
    let (user_id, token) = api.register("ann@example.com", "ann", "secret");
    storage.set(TOKEN_KEY, &token).unwrap();
    storage.set(USER_ID_KEY, user_id.as_str()).unwrap();
    user_id
}

fn member_app(api: &MockEventsApi) -> (EventbookApp, UserId) {
    let storage = MemoryStorage::new();
    let user_id = sign_in(api, &storage);
    let app = common::app_with_storage(api, Arc::new(storage));
    (app, user_id)
}

async fn run(app: &EventbookApp, line: &str) -> Outcome {
    app.execute(line.parse::<Command>().unwrap()).await.unwrap()
}

#[tokio::test]
async fn mount_loads_list_and_opens_subscription() {
    let api = MockEventsApi::new().with_event(sample_event("e1", "A", &UserId::from("u9")));
    let (app, _storage) = app(&api);

    let location = app.navigate("/").await.unwrap();
    assert_eq!(location.page, Page::Events);

    let state = app.events_state().await;
    assert_eq!(state.list, LoadStatus::Loaded);
    assert_eq!(state.events.len(), 1);
    wait_for_subscriber(&api).await;
    assert_eq!(api.count_calls(|c| *c == ApiCall::EventAdded), 1);
}

#[tokio::test]
async fn single_event_renders_single_card() {
    let api = MockEventsApi::new().with_event(sample_event("e1", "A", &UserId::from("u9")));
    let (app, _storage) = app(&api);
    app.navigate("/events").await.unwrap();

    let page = app.render().await;
    assert_eq!(page.matches("• ").count(), 1);
    assert!(page.contains("• A\n"));
    assert!(page.contains("View details → select e1"));
}

#[tokio::test]
async fn failed_list_shows_alert_and_no_cards() {
    let api = MockEventsApi::new().with_event(sample_event("e1", "A", &UserId::from("u9")));
    api.fail_next(Operation::Events, "Server down");
    let (app, _storage) = app(&api);
    app.navigate("/events").await.unwrap();

    let state = app.events_state().await;
    assert_eq!(state.list, LoadStatus::Failed);
    assert_eq!(state.alert, "Server down");

    let page = app.render().await;
    assert!(page.contains("[!] Server down"));
    assert!(!page.contains("• A"));
}

#[tokio::test]
async fn creating_event_sends_one_mutation_and_appends_it() {
    let api = MockEventsApi::new();
    let (app, user_id) = member_app(&api);
    app.navigate("/events").await.unwrap();

    run(&app, "new").await;
    run(&app, "set title Rust meetup").await;
    run(&app, "set price 12.5").await;
    run(&app, "set date 2025-07-01T19:00").await;
    run(&app, "set description Talks and pizza").await;
    assert_eq!(run(&app, "confirm").await, Outcome::Applied);

    let mutations: Vec<_> = api
        .calls()
        .into_iter()
        .filter(|c| matches!(c, ApiCall::CreateEvent { .. }))
        .collect();
    assert_eq!(
        mutations,
        vec![ApiCall::CreateEvent {
            token: format!("token-{user_id}"),
            input: EventInput {
                title: "Rust meetup".into(),
                price: 12.5,
                date: "2025-07-01T19:00".into(),
                description: "Talks and pizza".into(),
            },
        }]
    );

    let state = app.events_state().await;
    assert_eq!(state.events.len(), 1);
    assert_eq!(state.events[0].title, "Rust meetup");
    assert_eq!(state.events[0].creator.id, user_id);
    assert_eq!(state.mode, Mode::Idle);
    assert!(state.form.is_empty());
    assert_eq!(state.alert, "Event added successfully");

    // The creator sees the owner label instead of the details action
    let page = app.render().await;
    assert!(page.contains("You are the owner of this event"));
}

#[tokio::test]
async fn invalid_form_sends_nothing_and_keeps_fields() {
    let api = MockEventsApi::new();
    let (app, _user_id) = member_app(&api);
    app.navigate("/events").await.unwrap();

    run(&app, "new").await;
    run(&app, "set title Rust meetup").await;
    run(&app, "set price free").await;
    run(&app, "confirm").await;

    assert_eq!(api.count_calls(|c| matches!(c, ApiCall::CreateEvent { .. })), 0);
    let state = app.events_state().await;
    assert_eq!(state.mode, Mode::Creating);
    assert_eq!(state.form.title, "Rust meetup");
    assert_eq!(state.modal_alert, "All fields must be filled in correctly!");
}

#[tokio::test]
async fn live_notification_alerts_without_touching_list() {
    let api = MockEventsApi::new().with_event(sample_event("e1", "A", &UserId::from("u9")));
    let (app, _storage) = app(&api);
    app.navigate("/events").await.unwrap();
    wait_for_subscriber(&api).await;

    let mut actions = app.subscribe_events();
    api.push_event_added(sample_event("e2", "B", &UserId::from("u8")));
    wait_for_events_action(&mut actions, |a| matches!(a, EventsAction::EventAdded { .. })).await;

    let state = app.events_state().await;
    assert_eq!(state.alert, "A new event titled B was just added");
    assert_eq!(state.events.len(), 1);

    let page = app.render().await;
    assert!(page.contains("• A\n"));
    assert!(!page.contains("• B"));
}

#[tokio::test]
async fn subscription_error_sets_localized_alert() {
    let api = MockEventsApi::new();
    let (app, _storage) = app(&api);
    app.navigate("/events").await.unwrap();
    wait_for_subscriber(&api).await;

    let mut actions = app.subscribe_events();
    api.push_subscription_error("socket closed");
    wait_for_events_action(&mut actions, |a| {
        matches!(a, EventsAction::SubscriptionFailed { .. })
    })
    .await;

    assert_eq!(app.events_state().await.alert, "Error fetching new events");
}

#[tokio::test]
async fn leaving_the_page_closes_the_subscription() {
    let api = MockEventsApi::new();
    let (app, _storage) = app(&api);
    app.navigate("/events").await.unwrap();
    wait_for_subscriber(&api).await;

    app.navigate("/login").await.unwrap();
    for _ in 0..100 {
        if api.subscriber_count() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(api.subscriber_count(), 0);
    assert!(!app.events_state().await.mounted);
}

#[tokio::test]
async fn guest_booking_goes_to_login() {
    let api = MockEventsApi::new().with_event(sample_event("e1", "A", &UserId::from("u9")));
    let (app, _storage) = app(&api);
    app.navigate("/events").await.unwrap();

    run(&app, "select e1").await;
    assert!(app.render().await.contains("Log in to book"));
    run(&app, "confirm").await;

    assert_eq!(app.location().await.unwrap().page, Page::Login);
    assert_eq!(api.count_calls(|c| matches!(c, ApiCall::BookEvent { .. })), 0);
    assert!(app.events_state().await.navigate_to.is_none());
}

#[tokio::test]
async fn creator_cannot_book_own_event() {
    let api = MockEventsApi::new();
    let storage = MemoryStorage::new();
    let user_id = sign_in(&api, &storage);
    let api = api.with_event(sample_event("e1", "Mine", &user_id));
    let app = common::app_with_storage(&api, Arc::new(storage));
    app.navigate("/events").await.unwrap();

    run(&app, "select e1").await;
    assert!(app.render().await.contains("[Book (disabled)]"));
    run(&app, "book").await;

    assert_eq!(api.count_calls(|c| matches!(c, ApiCall::BookEvent { .. })), 0);
    assert!(api.bookings_of(&user_id).is_empty());
}

#[tokio::test]
async fn booking_another_users_event() {
    let api = MockEventsApi::new().with_event(sample_event("e1", "A", &UserId::from("u9")));
    let (app, user_id) = member_app(&api);
    app.navigate("/events").await.unwrap();

    run(&app, "select e1").await;
    run(&app, "book").await;

    let bookings = api.bookings_of(&user_id);
    assert_eq!(bookings.len(), 1);
    let state = app.events_state().await;
    assert_eq!(state.mode, Mode::Idle);
    assert_eq!(state.alert, "Event booked successfully");
}

#[tokio::test]
async fn refreshes_after_mutations_are_debounced() {
    let api = MockEventsApi::new().with_event(sample_event("e1", "A", &UserId::from("u9")));
    let (app, user_id) = member_app(&api);
    app.navigate("/events").await.unwrap();
    let mut actions = app.subscribe_events();

    run(&app, "new").await;
    run(&app, "set title B").await;
    run(&app, "set price 5").await;
    run(&app, "set date 2025-07-01").await;
    run(&app, "set description second").await;
    run(&app, "confirm").await;
    run(&app, "select e1").await;
    run(&app, "book").await;

    wait_for_events_action(&mut actions, |a| {
        matches!(a, EventsAction::EventsRefreshed { .. })
    })
    .await;
    tokio::time::sleep(DEBOUNCE * 3).await;

    // One query on mount, one after both mutations
    assert_eq!(api.count_calls(|c| *c == ApiCall::Events), 2);

    let state = app.events_state().await;
    assert_eq!(state.events.len(), 2);
    assert!(state.events.iter().any(|e| e.creator.id == user_id));
}

#[tokio::test]
async fn form_commands_are_ignored_off_the_events_page() {
    let api = MockEventsApi::new();
    let (app, _storage) = app(&api);
    app.navigate("/login").await.unwrap();

    assert_eq!(run(&app, "new").await, Outcome::Ignored);
    assert_eq!(run(&app, "set title x").await, Outcome::Ignored);
    assert!(app.events_state().await.form.is_empty());
}
