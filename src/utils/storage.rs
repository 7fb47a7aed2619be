//! Session persistence in localStorage.
//!
//! Only the token pair and the cached profile are stored; loading and error
//! flags are transient. A signed-out session removes the stored entry.

use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use super::dom;
use crate::config::SESSION_STORAGE_KEY;
use crate::core::StorageError;
use crate::models::Session;

/// Get stored data from localStorage.
///
/// Returns `None` if the key doesn't exist or deserialization fails.
pub fn get<T: DeserializeOwned>(key: &str) -> Option<T> {
    let storage = dom::local_storage()?;
    let json = storage.get_item(key).ok()??;
    serde_json::from_str(&json).ok()
}

/// Store data in localStorage.
pub fn set<T: Serialize>(key: &str, data: &T) -> Result<(), StorageError> {
    let storage = dom::local_storage().ok_or(StorageError::StorageUnavailable)?;
    let json = serde_json::to_string(data).map_err(|_| StorageError::SerializationFailed)?;
    storage
        .set_item(key, &json)
        .map_err(|_| StorageError::WriteFailed)
}

/// Remove a key from localStorage.
pub fn remove(key: &str) -> Result<(), StorageError> {
    let storage = dom::local_storage().ok_or(StorageError::StorageUnavailable)?;
    storage
        .remove_item(key)
        .map_err(|_| StorageError::RemoveFailed)
}

/// What should be written for `session`: the session itself when it holds
/// credentials, nothing otherwise.
pub fn persistable(session: &Session) -> Option<Session> {
    session.tokens().map(|_| Session {
        is_loading: false,
        error: None,
        ..session.clone()
    })
}

/// Restore a persisted session, in the loading state until its profile is
/// confirmed by the server.
pub fn load_session() -> Option<Session> {
    let stored: Session = get(SESSION_STORAGE_KEY)?;
    let tokens = stored.tokens()?;
    Some(Session::restoring(tokens, stored.user))
}

/// Write or remove the persisted session. Failures are logged, never fatal.
pub fn save_session(session: &Session) {
    let result = match persistable(session) {
        Some(stored) => set(SESSION_STORAGE_KEY, &stored),
        None => remove(SESSION_STORAGE_KEY),
    };
    if let Err(e) = result {
        warn!("session not persisted: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthTokens, Role, SessionAction, sample_user};

    #[test]
    fn test_only_credentials_are_persisted() {
        assert_eq!(persistable(&Session::default()), None);

        let session = Session::default()
            .reduce(SessionAction::LoginSucceeded {
                tokens: AuthTokens {
                    access_token: "a".into(),
                    refresh_token: "r".into(),
                },
                user: sample_user(Role::Admin),
            })
            .reduce(SessionAction::LoginStarted);
        let stored = persistable(&session).unwrap();
        assert!(!stored.is_loading);

        let json = serde_json::to_value(&stored).unwrap();
        assert!(json.get("is_loading").is_none());
        assert!(json.get("error").is_none());
        assert_eq!(json["access_token"], "a");
    }
}
