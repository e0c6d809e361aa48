//! Credential store: the signed-in user and their bearer token.
//!
//! SYSTEM CONTEXT
//! ==============
//! Views read `is_authenticated` for route guarding and hand `session()` to
//! the board store for every authorized call. The session is mirrored into
//! a `KeyValueStore` under `token` and `user` so a restart comes back signed
//! in.
//!
//! ERROR HANDLING
//! ==============
//! Network failures never escape: `login`/`signup` return `false` and leave
//! a display message in `error()`. Token and user are written and cleared
//! together, in memory and in storage, so one is never present without
//! the other.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use tracing::{info, warn};

use crate::net::api::ApiClient;
use crate::net::transport::HttpTransport;
use crate::net::types::{Session, User};
use crate::storage::{self, KeyValueStore, TOKEN_KEY, USER_KEY};

pub const LOGIN_FAILED: &str = "Login failed";
pub const SIGNUP_FAILED: &str = "Signup failed";

pub struct AuthStore<T, S> {
    api: ApiClient<T>,
    storage: S,
    session: Option<Session>,
    loading: bool,
    error: Option<String>,
}

impl<T: HttpTransport, S: KeyValueStore> AuthStore<T, S> {
    /// Build the store, restoring any session persisted in `storage`.
    pub fn new(api: ApiClient<T>, storage: S) -> Self {
        let session = restore_session(&storage);
        Self { api, storage, session, loading: false, error: None }
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(Session::user)
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(Session::bearer_token)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Exchange credentials for a session and persist it.
    ///
    /// A rejected or unreachable login leaves any existing session as it was.
    /// If the new session cannot be saved, the previous one is written back;
    /// when that also fails the store signs out so memory never disagrees
    /// with storage.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        self.loading = true;
        self.error = None;

        let response = match self.api.login(email, password).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "login failed");
                self.error = Some(e.user_message(LOGIN_FAILED));
                self.loading = false;
                return false;
            }
        };

        let session = Session::new(response.user, response.token);
        if let Err(e) = persist_session(&self.storage, &session) {
            warn!(error = %e, "could not persist session");
            clear_persisted(&self.storage);
            let restored = self.session.as_ref().map(|previous| persist_session(&self.storage, previous));
            if let Some(Err(e)) = restored {
                warn!(error = %e, "could not restore previous session; signing out");
                clear_persisted(&self.storage);
                self.session = None;
            }
            self.error = Some(LOGIN_FAILED.to_owned());
            self.loading = false;
            return false;
        }

        info!(user_id = session.user_id(), username = session.username(), "logged in");
        self.session = Some(session);
        self.loading = false;
        true
    }

    /// Register a new account. Does not sign the user in.
    pub async fn signup(&mut self, username: &str, email: &str, password: &str) -> bool {
        self.loading = true;
        self.error = None;

        let result = self.api.signup(username, email, password).await;
        self.loading = false;
        match result {
            Ok(()) => {
                info!(%username, "signed up");
                true
            }
            Err(e) => {
                warn!(error = %e, "signup failed");
                self.error = Some(e.user_message(SIGNUP_FAILED));
                false
            }
        }
    }

    /// Drop the session from memory and storage. No network call; safe to repeat.
    pub fn logout(&mut self) {
        clear_persisted(&self.storage);
        if let Some(session) = self.session.take() {
            info!(user_id = session.user_id(), "logged out");
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

// =============================================================================
// PERSISTENCE
// =============================================================================

/// Rebuild the session from storage. A half-written session (only one of
/// the two keys, or an unreadable user) is wiped and treated as signed out.
/// A store that cannot be read at all is reset so later writes succeed.
fn restore_session(store: &dyn KeyValueStore) -> Option<Session> {
    let token = match store.get(TOKEN_KEY) {
        Ok(token) => token,
        Err(e) => {
            warn!(error = %e, "could not read stored token; resetting session storage");
            reset_store(store);
            return None;
        }
    };
    let user = match storage::load_json::<User>(store, USER_KEY) {
        Ok(user) => user,
        Err(e) => {
            warn!(error = %e, "could not read stored user");
            clear_persisted(store);
            return None;
        }
    };

    match (token, user) {
        (Some(token), Some(user)) if !token.is_empty() => Some(Session::new(user, token)),
        (None, None) => None,
        _ => {
            warn!("discarding incomplete stored session");
            clear_persisted(store);
            None
        }
    }
}

fn persist_session(store: &dyn KeyValueStore, session: &Session) -> Result<(), crate::error::StorageError> {
    store.set(TOKEN_KEY, session.bearer_token())?;
    storage::save_json(store, USER_KEY, session.user())
}

/// Remove both session keys, falling back to a full reset when a key
/// cannot be removed.
fn clear_persisted(store: &dyn KeyValueStore) {
    for key in [TOKEN_KEY, USER_KEY] {
        if let Err(e) = store.remove(key) {
            warn!(error = %e, key, "could not clear stored session key; resetting session storage");
            reset_store(store);
            return;
        }
    }
}

fn reset_store(store: &dyn KeyValueStore) {
    if let Err(e) = store.clear() {
        warn!(error = %e, "could not reset session storage");
    }
}
