mod common;

use common::{FakeApi, PASSWORD};
use inventory_client::session::{FileSessionStore, MemorySessionStore, SessionManager, SessionStore};
use std::sync::Arc;

#[tokio::test]
async fn test_login_persists_and_restores() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let api = FakeApi::new();

    let mut session = SessionManager::new(Arc::clone(&api), FileSessionStore::new(&path));
    let user = session.login("marta", PASSWORD).await.unwrap();
    assert_eq!(user.username, "marta");
    assert!(session.is_authenticated());
    assert_eq!(api.last_token().as_deref(), Some("jwt-marta"));
    assert!(path.exists());

    // 新进程：从文件恢复
    let api = FakeApi::new();
    let mut restored = SessionManager::new(Arc::clone(&api), FileSessionStore::new(&path));
    let user = restored.restore().cloned();
    assert_eq!(user.map(|u| u.id), Some(7));
    assert_eq!(api.last_token().as_deref(), Some("jwt-marta"));
}

#[tokio::test]
async fn test_wrong_password_leaves_logged_out() {
    let api = FakeApi::new();
    let store = MemorySessionStore::new();
    let mut session = SessionManager::new(Arc::clone(&api), store);

    let err = session.login("marta", "hunter2").await.unwrap_err();
    assert!(err.to_string().contains("Invalid identifier or password"));
    assert!(!session.is_authenticated());
    assert!(api.tokens().is_empty());
}

#[test]
fn test_corrupted_session_is_cleared() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "not json at all").unwrap();

    let api = FakeApi::new();
    let mut session = SessionManager::new(Arc::clone(&api), FileSessionStore::new(&path));

    assert!(session.restore().is_none());
    assert!(!path.exists());
    assert_eq!(api.tokens(), vec![None]);
}

#[test]
fn test_missing_session_restores_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let api = FakeApi::new();
    let mut session = SessionManager::new(
        Arc::clone(&api),
        FileSessionStore::new(dir.path().join("session.json")),
    );

    assert!(session.restore().is_none());
    assert!(session.require_user().is_err());
}

#[tokio::test]
async fn test_logout_clears_store_and_token() {
    let api = FakeApi::new();
    let mut session = SessionManager::new(Arc::clone(&api), MemorySessionStore::new());
    session.login("marta", PASSWORD).await.unwrap();

    session.logout().unwrap();

    assert!(!session.is_authenticated());
    assert_eq!(api.last_token(), None);
    let err = session.require_user().unwrap_err();
    assert_eq!(err.to_string(), "会话错误: 用户未登录");
}

#[test]
fn test_store_trait_is_object_safe() {
    let store: Box<dyn SessionStore> = Box::new(MemorySessionStore::new());
    assert!(store.load().unwrap().is_none());
}
