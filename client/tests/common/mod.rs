//! Shared setup for client integration tests.

#![allow(dead_code, clippy::panic)]

use eventbook::config::Config;
use eventbook::events::EventsAction;
use eventbook::messages::Locale;
use eventbook::mocks::MockEventsApi;
use eventbook::storage::{MemoryStorage, SessionStorage};
use eventbook::EventbookApp;
use std::sync::Arc;
use std::time::Duration;

/// Debounce window used by every test app
pub const DEBOUNCE: Duration = Duration::from_millis(200);

/// English config with a short refresh debounce
pub fn config() -> Config {
    let mut config = Config::default();
    config.ui.locale = Locale::English;
    config.ui.refresh_debounce_ms = 200;
    config.api.request_timeout_secs = 2;
    config
}

/// An app over `api` with fresh in-memory session storage
pub fn app(api: &MockEventsApi) -> (EventbookApp, MemoryStorage) {
    let storage = MemoryStorage::new();
    let app = app_with_storage(api, Arc::new(storage.clone()));
    (app, storage)
}

/// An app over `api` and `storage`
pub fn app_with_storage(api: &MockEventsApi, storage: Arc<dyn SessionStorage>) -> EventbookApp {
    EventbookApp::with_parts(config(), Arc::new(api.clone()), storage)
}

/// Wait until the events page reduced an action matching `predicate`
pub async fn wait_for_events_action(
    receiver: &mut tokio::sync::broadcast::Receiver<EventsAction>,
    predicate: impl Fn(&EventsAction) -> bool,
) -> EventsAction {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match receiver.recv().await {
                Ok(action) if predicate(&action) => return action,
                Ok(_) | Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {},
                Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                    panic!("events store closed")
                },
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("no matching events action"))
}

/// Poll until the mock has an open `eventAdded` subscription
pub async fn wait_for_subscriber(api: &MockEventsApi) {
    for _ in 0..100 {
        if api.subscriber_count() > 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("subscription never opened");
}
