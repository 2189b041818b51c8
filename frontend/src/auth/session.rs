use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use log::warn;
use thiserror::Error;

use super::role::Role;

pub const USER_KEY: &str = "user";
pub const ROLE_KEY: &str = "userRole";
pub const USERNAME_KEY: &str = "username";

/// The signed-in user as the dashboard page reads it back from storage.
///
/// Any extra fields the login service returned ride along in `extra` and are
/// flattened next to `username` and `role` when serialized. `role` is always
/// the role chosen in the form, never one echoed by the service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub username: String,
    pub role: Role,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionRecord {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
            extra: Map::new(),
        }
    }

    /// Builds the record from an accepted login response. Username precedence:
    /// top-level `username`, then `user.username`, then what was typed.
    pub fn from_remote(role: Role, entered_username: &str, mut fields: Map<String, Value>) -> Self {
        let username = username_text(fields.get("username"))
            .or_else(|| username_text(fields.get("user").and_then(|user| user.get("username"))))
            .unwrap_or_else(|| entered_username.to_string());
        fields.remove("username");
        fields.remove("role");
        Self {
            username,
            role,
            extra: fields,
        }
    }
}

// Non-empty strings as-is; non-zero numbers and `true` as their text.
fn username_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().map_or(true, |f| f != 0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("browser storage is unavailable")]
    Unavailable,
    #[error("failed to write {key}: {message}")]
    Write { key: String, message: String },
    #[error("failed to encode session: {0}")]
    Encode(String),
}

/// Durable string key-value store the session is written into.
pub trait KeyValueStore {
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str);
}

/// `window.localStorage`.
pub struct BrowserStorage(web_sys::Storage);

impl BrowserStorage {
    pub fn local() -> Result<Self, StorageError> {
        web_sys::window()
            .and_then(|window| window.local_storage().ok())
            .flatten()
            .map(BrowserStorage)
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for BrowserStorage {
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0.set_item(key, value).map_err(|err| StorageError::Write {
            key: key.to_string(),
            message: format!("{:?}", err),
        })
    }

    fn remove(&self, key: &str) {
        if let Err(err) = self.0.remove_item(key) {
            warn!("Failed to remove {} from storage: {:?}", key, err);
        }
    }
}

/// Overwrites the three session keys. If any write fails the keys already
/// written are removed again so the dashboard never sees half a session.
pub fn persist(store: &impl KeyValueStore, record: &SessionRecord) -> Result<(), StorageError> {
    let encoded =
        serde_json::to_string(record).map_err(|err| StorageError::Encode(err.to_string()))?;
    let writes = [
        (USER_KEY, encoded.as_str()),
        (ROLE_KEY, record.role.as_str()),
        (USERNAME_KEY, record.username.as_str()),
    ];
    for (done, (key, value)) in writes.iter().enumerate() {
        if let Err(err) = store.set(key, value) {
            for (written, _) in &writes[..done] {
                store.remove(written);
            }
            return Err(err);
        }
    }
    Ok(())
}
