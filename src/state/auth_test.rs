use super::*;
use crate::error::StorageError;
use crate::net::api::AUTHORIZATION;
use crate::net::types::Board;
use crate::storage::{FileStore, MemoryStore};
use crate::test_helpers::{FakeServer, api, user};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// =============================================================
// Helpers
// =============================================================

fn store(server: &Arc<FakeServer>) -> AuthStore<Arc<FakeServer>, MemoryStore> {
    AuthStore::new(api(server), MemoryStore::new())
}

fn seeded_storage() -> MemoryStore {
    let storage = MemoryStore::new();
    storage.set(TOKEN_KEY, "T").unwrap();
    storage::save_json(&storage, USER_KEY, &user()).unwrap();
    storage
}

/// Storage that accepts reads but refuses every write.
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::other("read-only")))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Memory storage whose next `user_failures` writes of the user key fail.
struct FlakyUserStore {
    inner: MemoryStore,
    user_failures: AtomicUsize,
}

impl FlakyUserStore {
    fn seeded(user_failures: usize) -> Self {
        Self { inner: seeded_storage(), user_failures: AtomicUsize::new(user_failures) }
    }
}

impl KeyValueStore for FlakyUserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == USER_KEY
            && self
                .user_failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.inner.clear()
    }
}

fn session_file() -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("taskboard-auth-{}", uuid::Uuid::new_v4()))
        .join("session.json")
}

fn second_user_login() -> serde_json::Value {
    json!({ "token": "U", "user": { "id": 2, "username": "b" } })
}

// =============================================================
// Startup
// =============================================================

#[test]
fn starts_signed_out_with_empty_storage() {
    let server = FakeServer::new();
    let auth = store(&server);
    assert!(!auth.is_authenticated());
    assert!(auth.user().is_none());
    assert!(auth.token().is_none());
    assert!(!auth.is_loading());
    assert!(auth.error().is_none());
}

#[test]
fn restores_session_from_storage() {
    let server = FakeServer::new();
    let auth = AuthStore::new(api(&server), seeded_storage());
    assert!(auth.is_authenticated());
    assert_eq!(auth.token(), Some("T"));
    assert_eq!(auth.user(), Some(&user()));
}

#[test]
fn token_without_user_is_discarded() {
    let server = FakeServer::new();
    let storage = MemoryStore::new();
    storage.set(TOKEN_KEY, "T").unwrap();

    let auth = AuthStore::new(api(&server), storage);
    assert!(!auth.is_authenticated());
    assert_eq!(auth.storage().get(TOKEN_KEY).unwrap(), None);
}

#[test]
fn corrupt_user_is_discarded() {
    let server = FakeServer::new();
    let storage = MemoryStore::new();
    storage.set(TOKEN_KEY, "T").unwrap();
    storage.set(USER_KEY, "{broken").unwrap();

    let auth = AuthStore::new(api(&server), storage);
    assert!(!auth.is_authenticated());
    assert_eq!(auth.storage().get(USER_KEY).unwrap(), None);
    assert_eq!(auth.storage().get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn corrupt_session_file_is_reset_so_login_and_logout_work() {
    let path = session_file();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{not json").unwrap();

    let server = FakeServer::new();
    server.ok(json!({ "token": "T", "user": { "id": 1, "username": "a" } }));
    let mut auth = AuthStore::new(api(&server), FileStore::new(&path));
    assert!(!auth.is_authenticated());
    assert!(!path.exists());

    assert!(auth.login("a@b.com", "x").await);
    assert_eq!(FileStore::new(&path).get(TOKEN_KEY).unwrap().as_deref(), Some("T"));

    auth.logout();
    assert!(!path.exists());

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

// =============================================================
// Login
// =============================================================

#[tokio::test]
async fn login_success_sets_session_and_persists_it() {
    let server = FakeServer::new();
    server.ok(json!({ "token": "T", "user": { "id": 1, "username": "a" } }));
    let mut auth = store(&server);

    assert!(auth.login("a@b.com", "x").await);
    assert!(auth.is_authenticated());
    assert_eq!(auth.token(), Some("T"));
    assert_eq!(auth.user().map(|u| u.id.as_str()), Some("1"));
    assert!(!auth.is_loading());
    assert!(auth.error().is_none());

    assert_eq!(auth.storage().get(TOKEN_KEY).unwrap().as_deref(), Some("T"));
    let stored: Option<User> = storage::load_json(auth.storage(), USER_KEY).unwrap();
    assert_eq!(stored.map(|u| u.username), Some("a".to_owned()));
}

#[tokio::test]
async fn login_then_board_request_carries_bearer_token() {
    let server = FakeServer::new();
    server.ok(json!({ "token": "T", "user": { "id": 1, "username": "a" } }));
    server.ok(json!({ "boards": [] }));
    let mut auth = store(&server);

    assert!(auth.login("a@b.com", "x").await);
    let session = auth.session().cloned().unwrap();
    let boards: Vec<Board> = api(&server).list_boards(&session).await.unwrap();
    assert!(boards.is_empty());
    assert_eq!(server.last_request().header(AUTHORIZATION), Some("Bearer T"));
}

#[tokio::test]
async fn login_failure_uses_server_message() {
    let server = FakeServer::new();
    server.fail(401, "Invalid credentials!");
    let mut auth = store(&server);

    assert!(!auth.login("a@b.com", "bad").await);
    assert!(!auth.is_authenticated());
    assert_eq!(auth.error(), Some("Invalid credentials!"));
    assert!(!auth.is_loading());
    assert_eq!(auth.storage().get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn login_failure_without_message_uses_fallback() {
    let server = FakeServer::new();
    server.drop_connection();
    let mut auth = store(&server);

    assert!(!auth.login("a@b.com", "x").await);
    assert_eq!(auth.error(), Some(LOGIN_FAILED));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn failed_relogin_keeps_existing_session() {
    let server = FakeServer::new();
    server.fail(401, "Invalid credentials!");
    let mut auth = AuthStore::new(api(&server), seeded_storage());

    assert!(!auth.login("a@b.com", "bad").await);
    assert!(auth.is_authenticated());
    assert_eq!(auth.token(), Some("T"));
}

#[tokio::test]
async fn login_fails_when_session_cannot_be_saved() {
    let server = FakeServer::new();
    server.ok(json!({ "token": "T", "user": { "id": 1, "username": "a" } }));
    let mut auth = AuthStore::new(api(&server), ReadOnlyStore);

    assert!(!auth.login("a@b.com", "x").await);
    assert!(!auth.is_authenticated());
    assert_eq!(auth.error(), Some(LOGIN_FAILED));
}

#[tokio::test]
async fn relogin_save_failure_restores_previous_session() {
    let server = FakeServer::new();
    server.ok(second_user_login());
    let mut auth = AuthStore::new(api(&server), FlakyUserStore::seeded(1));

    assert!(!auth.login("b@b.com", "x").await);
    assert_eq!(auth.error(), Some(LOGIN_FAILED));
    assert_eq!(auth.token(), Some("T"));
    assert_eq!(auth.user(), Some(&user()));
    assert_eq!(auth.storage().get(TOKEN_KEY).unwrap().as_deref(), Some("T"));
    let stored: Option<User> = storage::load_json(auth.storage(), USER_KEY).unwrap();
    assert_eq!(stored, Some(user()));
}

#[tokio::test]
async fn relogin_signs_out_when_no_session_can_be_saved() {
    let server = FakeServer::new();
    server.ok(second_user_login());
    let mut auth = AuthStore::new(api(&server), FlakyUserStore::seeded(usize::MAX));
    assert!(auth.is_authenticated());

    assert!(!auth.login("b@b.com", "x").await);
    assert_eq!(auth.error(), Some(LOGIN_FAILED));
    assert!(!auth.is_authenticated());
    assert_eq!(auth.storage().get(TOKEN_KEY).unwrap(), None);
    assert_eq!(auth.storage().get(USER_KEY).unwrap(), None);
}

#[tokio::test]
async fn login_clears_previous_error() {
    let server = FakeServer::new();
    server.fail(401, "Invalid credentials!");
    server.ok(json!({ "token": "T", "user": { "id": 1, "username": "a" } }));
    let mut auth = store(&server);

    assert!(!auth.login("a@b.com", "bad").await);
    assert!(auth.login("a@b.com", "x").await);
    assert!(auth.error().is_none());
}

// =============================================================
// Signup
// =============================================================

#[tokio::test]
async fn signup_success_does_not_sign_in() {
    let server = FakeServer::new();
    server.respond(201, json!({ "message": "User created successfully!" }));
    let mut auth = store(&server);

    assert!(auth.signup("a", "a@b.com", "x").await);
    assert!(!auth.is_authenticated());
    assert!(auth.error().is_none());
}

#[tokio::test]
async fn signup_failure_sets_error() {
    let server = FakeServer::new();
    server.fail(409, "User already exists!");
    let mut auth = store(&server);

    assert!(!auth.signup("a", "a@b.com", "x").await);
    assert_eq!(auth.error(), Some("User already exists!"));

    auth.clear_error();
    assert!(auth.error().is_none());
}

#[tokio::test]
async fn signup_failure_without_body_uses_fallback() {
    let server = FakeServer::new();
    server.respond(500, serde_json::Value::Null);
    let mut auth = store(&server);

    assert!(!auth.signup("a", "a@b.com", "x").await);
    assert_eq!(auth.error(), Some(SIGNUP_FAILED));
}

// =============================================================
// Logout
// =============================================================

#[test]
fn logout_clears_memory_and_storage() {
    let server = FakeServer::new();
    let mut auth = AuthStore::new(api(&server), seeded_storage());
    assert!(auth.is_authenticated());

    auth.logout();
    assert!(!auth.is_authenticated());
    assert_eq!(auth.storage().get(TOKEN_KEY).unwrap(), None);
    assert_eq!(auth.storage().get(USER_KEY).unwrap(), None);
    assert!(server.requests().is_empty());
}

#[test]
fn logout_is_idempotent() {
    let server = FakeServer::new();
    let mut auth = store(&server);
    auth.logout();
    auth.logout();
    assert!(!auth.is_authenticated());
}
