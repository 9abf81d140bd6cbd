//! Location handling of the app shell.

#![allow(clippy::unwrap_used, clippy::panic)]

mod common;

use common::app;
use eventbook::mocks::MockEventsApi;
use eventbook::router::{Page, Route};
use eventbook::storage::{SessionStorage, TOKEN_KEY, USER_ID_KEY};

#[tokio::test]
async fn root_redirects_to_events() {
    let (app, _storage) = app(&MockEventsApi::new());

    let location = app.navigate("/").await.unwrap();
    assert_eq!(location.route, Route::Events);
    assert_eq!(location.page, Page::Events);
}

#[tokio::test]
async fn guests_are_sent_from_bookings_to_login() {
    let api = MockEventsApi::new();
    let (app, _storage) = app(&api);

    let location = app.navigate("/bookings?tab=all").await.unwrap();
    assert_eq!(location.route, Route::Login);
    assert_eq!(location.page, Page::Login);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn members_skip_the_auth_forms() {
    let api = MockEventsApi::new();
    let (user_id, token) = api.register("bob@example.com", "bob", "pw");
    let storage = eventbook::storage::MemoryStorage::new();
    storage.set(TOKEN_KEY, &token).unwrap();
    storage.set(USER_ID_KEY, user_id.as_str()).unwrap();
    let app = common::app_with_storage(&api, std::sync::Arc::new(storage));

    assert_eq!(app.navigate("/signup/").await.unwrap().page, Page::Events);
    assert_eq!(app.navigate("/bookings").await.unwrap().page, Page::Bookings);
}

#[tokio::test]
async fn unknown_path_renders_not_found() {
    let (app, _storage) = app(&MockEventsApi::new());

    let location = app.navigate("/nowhere").await.unwrap();
    assert_eq!(location.page, Page::NotFound);
    assert!(app.render().await.contains("Page not found: /nowhere"));
}
