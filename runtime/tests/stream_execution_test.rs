//! Integration tests for `Effect::Stream` and cancellable effects
//!
//! Streams model live subscriptions: every item is fed back to the reducer,
//! and a `Cancel` (or a replacement under the same id) tears the stream down.

#![allow(clippy::unwrap_used)] // Test code can use unwrap

use eventbook_core::{
    SmallVec,
    effect::{Effect, EffectId},
    reducer::Reducer,
    smallvec,
};
use eventbook_runtime::Store;
use futures::stream;
use std::time::Duration;

const FEED: EffectId = EffectId::new("feed");
const REFRESH: EffectId = EffectId::new("refresh");

#[derive(Clone, Debug, Default)]
struct FeedState {
    items: Vec<String>,
    refreshes: u32,
}

#[derive(Clone, Debug, PartialEq)]
enum FeedAction {
    Open { items: Vec<String> },
    OpenSlow,
    Close,
    Item { text: String },
    ScheduleRefresh,
    Refresh,
}

struct FeedReducer;

impl Reducer for FeedReducer {
    type State = FeedState;
    type Action = FeedAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut FeedState,
        action: FeedAction,
        _env: &(),
    ) -> SmallVec<[Effect<FeedAction>; 4]> {
        match action {
            FeedAction::Open { items } => smallvec![
                Effect::Stream(Box::pin(stream::iter(
                    items.into_iter().map(|text| FeedAction::Item { text }),
                )))
                .cancellable(FEED)
            ],
            FeedAction::OpenSlow => smallvec![
                Effect::Stream(Box::pin(stream::unfold(0_u32, |i| async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Some((FeedAction::Item { text: format!("slow-{i}") }, i + 1))
                })))
                .cancellable(FEED)
            ],
            FeedAction::Close => smallvec![Effect::Cancel { id: FEED }],
            FeedAction::Item { text } => {
                state.items.push(text);
                smallvec![Effect::None]
            },
            FeedAction::ScheduleRefresh => smallvec![
                Effect::Delay {
                    duration: Duration::from_millis(30),
                    action: Box::new(FeedAction::Refresh),
                }
                .cancellable(REFRESH)
            ],
            FeedAction::Refresh => {
                state.refreshes += 1;
                smallvec![Effect::None]
            },
        }
    }
}

#[tokio::test]
async fn test_stream_items_are_fed_back_in_order() {
    let store = Store::new(FeedState::default(), FeedReducer, ());

    let mut handle = store
        .send(FeedAction::Open {
            items: vec!["a".into(), "b".into(), "c".into()],
        })
        .await
        .unwrap();
    handle
        .wait_with_timeout(Duration::from_secs(1))
        .await
        .unwrap();

    let items = store.state(|s| s.items.clone()).await;
    assert_eq!(items, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_cancel_stops_a_running_stream() {
    let store = Store::new(FeedState::default(), FeedReducer, ());

    let mut handle = store.send(FeedAction::OpenSlow).await.unwrap();
    tokio::time::sleep(Duration::from_millis(70)).await;
    store.send(FeedAction::Close).await.unwrap();

    // The aborted stream releases its handle
    handle
        .wait_with_timeout(Duration::from_secs(1))
        .await
        .unwrap();

    let received = store.state(|s| s.items.len()).await;
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(store.state(|s| s.items.len()).await, received);
    assert!(received > 0);
}

#[tokio::test]
async fn test_rescheduling_debounces_delay() {
    let store = Store::new(FeedState::default(), FeedReducer, ());

    for _ in 0..5 {
        store.send(FeedAction::ScheduleRefresh).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(store.state(|s| s.refreshes).await, 1);
}

#[tokio::test]
async fn test_shutdown_aborts_open_streams() {
    let store = Store::new(FeedState::default(), FeedReducer, ());
    store.send(FeedAction::OpenSlow).await.unwrap();

    store.shutdown(Duration::from_secs(1)).await.unwrap();
    assert_eq!(store.pending_effects(), 0);
}
