//! Session persistence across handles and storage backends.

#![allow(clippy::unwrap_used)]

use eventbook::session::SessionHandle;
use eventbook::storage::{
    FileStorage, MemoryStorage, SessionStorage, TOKEN_KEY, USER_ID_KEY, USERNAME_KEY,
};
use eventbook::types::UserId;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn login_writes_only_non_empty_values() {
    let storage = MemoryStorage::new();
    let handle = SessionHandle::new(Arc::new(storage.clone()));

    handle.login("t-1", "u-1", "").await.unwrap();

    assert_eq!(storage.get(TOKEN_KEY).unwrap(), Some("t-1".to_string()));
    assert_eq!(storage.get(USER_ID_KEY).unwrap(), Some("u-1".to_string()));
    assert_eq!(storage.get(USERNAME_KEY).unwrap(), None);
    assert_eq!(handle.current().user_id, Some(UserId::from("u-1")));
}

#[tokio::test]
async fn logout_clears_every_entry() {
    let storage = MemoryStorage::new();
    storage.set("theme", "dark").unwrap();
    let handle = SessionHandle::new(Arc::new(storage.clone()));

    handle.login("t-1", "u-1", "sam").await.unwrap();
    handle.logout().await.unwrap();

    assert!(storage.is_empty());
    assert!(!handle.current().is_authenticated());
}

#[tokio::test]
async fn empty_token_is_not_a_session() {
    let storage = MemoryStorage::new();
    storage.set(TOKEN_KEY, "").unwrap();
    storage.set(USER_ID_KEY, "u-1").unwrap();

    let handle = SessionHandle::new(Arc::new(storage));
    let reader = handle.reader();

    assert!(!reader.is_authenticated());
    assert_eq!(reader.token(), None);
    assert_eq!(reader.viewer_id(), Some(UserId::from("u-1")));
}

#[tokio::test]
async fn readers_are_notified_of_changes() {
    let handle = SessionHandle::new(Arc::new(MemoryStorage::new()));
    let mut reader = handle.reader();

    let waiter = tokio::spawn(async move {
        let changed = reader.changed().await;
        (changed, reader.is_authenticated())
    });
    handle.login("t-1", "u-1", "sam").await.unwrap();

    let (changed, authenticated) = tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .unwrap()
        .unwrap();
    assert!(changed);
    assert!(authenticated);
}

#[tokio::test]
async fn file_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");

    {
        let storage = FileStorage::open(&path).unwrap();
        let handle = SessionHandle::new(Arc::new(storage));
        handle.login("t-1", "u-1", "sam").await.unwrap();
        handle.shutdown(Duration::from_secs(1)).await.unwrap();
    }

    let restored = SessionHandle::new(Arc::new(FileStorage::open(&path).unwrap()));
    let session = restored.current();
    assert!(session.is_authenticated());
    assert_eq!(session.user_id, Some(UserId::from("u-1")));
    assert_eq!(session.username.as_deref(), Some("sam"));

    restored.logout().await.unwrap();
    let cleared = FileStorage::open(&path).unwrap();
    assert_eq!(cleared.get(TOKEN_KEY).unwrap(), None);
}

#[test]
fn missing_session_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path().join("absent.json")).unwrap();

    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert!(!storage.path().exists());
}

#[test]
fn corrupt_session_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "not json").unwrap();

    assert!(FileStorage::open(&path).is_err());
}
