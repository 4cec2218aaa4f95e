//! Current user session: bearer token plus display name.

use base64::Engine as _;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::storage::KeyValueStorage;

const TOKEN_KEY: &str = "token";
const DISPLAY_NAME_KEY: &str = "fullName";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub display_name: String,
}

/// Single source of truth for who is logged in.
///
/// Injected into the HTTP backend and the pages instead of being read from
/// ambient globals, so workflows can be exercised against `MemoryStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Overwrites any previous session.
    pub fn set_session(&self, token: &str, display_name: &str) -> ClientResult<()> {
        debug!("Storing session for {:?}", display_name);
        self.storage.set(TOKEN_KEY, token)?;
        self.storage.set(DISPLAY_NAME_KEY, display_name)
    }

    pub fn set_display_name(&self, display_name: &str) -> ClientResult<()> {
        self.storage.set(DISPLAY_NAME_KEY, display_name)
    }

    /// `None` means there is no session. Storage failures count as no session.
    pub fn token(&self) -> Option<String> {
        self.storage
            .get(TOKEN_KEY)
            .ok()
            .flatten()
            .filter(|t| !t.is_empty())
    }

    pub fn display_name(&self) -> Option<String> {
        self.storage
            .get(DISPLAY_NAME_KEY)
            .ok()
            .flatten()
            .filter(|n| !n.is_empty())
    }

    pub fn current(&self) -> Option<Session> {
        let token = self.token()?;
        Some(Session {
            token,
            display_name: self.display_name().unwrap_or_default(),
        })
    }

    pub fn clear(&self) -> ClientResult<()> {
        debug!("Clearing session");
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(DISPLAY_NAME_KEY)
    }
}

/// Reads the `sub` claim from a JWT payload without verifying the signature.
/// The backend remains the authority on whether the token is valid.
pub fn user_id_from_token(jwt: &str) -> ClientResult<String> {
    let parts: Vec<&str> = jwt.split('.').collect();
    if parts.len() != 3 {
        return Err(ClientError::Decode {
            context: "access token",
            message: "invalid JWT format".to_string(),
        });
    }
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| ClientError::Decode {
            context: "access token",
            message: format!("base64 decode failed: {e}"),
        })?;
    let value: serde_json::Value =
        serde_json::from_slice(&payload).map_err(|e| ClientError::Decode {
            context: "access token",
            message: format!("JSON parse failed: {e}"),
        })?;
    match &value["sub"] {
        serde_json::Value::String(s) if !s.is_empty() => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        _ => Err(ClientError::Decode {
            context: "access token",
            message: "missing sub claim".to_string(),
        }),
    }
}

#[cfg(test)]
pub(crate) fn make_jwt(payload_json: &str) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = engine.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = engine.encode(payload_json);
    let signature = engine.encode("fake_sig");
    format!("{header}.{payload}.{signature}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_set_session_overwrites() {
        let store = SessionStore::new(MemoryStorage::new());
        store.set_session("first", "Ada").unwrap();
        store.set_session("second", "Grace").unwrap();
        assert_eq!(
            store.current(),
            Some(Session {
                token: "second".to_string(),
                display_name: "Grace".to_string(),
            })
        );
    }

    #[test]
    fn test_clear_removes_both_values() {
        let store = SessionStore::new(MemoryStorage::new());
        store.set_session("tok", "Ada").unwrap();
        store.clear().unwrap();
        assert_eq!(store.token(), None);
        assert_eq!(store.display_name(), None);
        assert_eq!(store.current(), None);
    }

    #[test]
    fn test_storage_keys_are_token_and_full_name() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(storage.clone());
        store.set_session("tok", "Ada").unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("tok"));
        assert_eq!(storage.get("fullName").unwrap().as_deref(), Some("Ada"));
    }

    #[test]
    fn test_empty_token_is_no_session() {
        let storage = MemoryStorage::new();
        storage.set("token", "").unwrap();
        let store = SessionStore::new(storage);
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_user_id_from_token() {
        let jwt = make_jwt(r#"{"sub":"65f0c0ffee","exp":1900000000}"#);
        assert_eq!(user_id_from_token(&jwt).unwrap(), "65f0c0ffee");
    }

    #[test]
    fn test_user_id_from_token_invalid_format() {
        let err = user_id_from_token("not-a-jwt").unwrap_err();
        assert!(err.to_string().contains("invalid JWT format"));
    }

    #[test]
    fn test_user_id_from_token_missing_sub() {
        let jwt = make_jwt(r#"{"exp":1900000000}"#);
        let err = user_id_from_token(&jwt).unwrap_err();
        assert!(err.to_string().contains("missing sub claim"));
    }

    #[test]
    fn test_user_id_from_token_bad_base64() {
        let err = user_id_from_token("header.!!!invalid!!!.sig").unwrap_err();
        assert!(err.to_string().contains("base64 decode failed"));
    }
}
