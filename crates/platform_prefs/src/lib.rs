//! Lightweight key-value preference storage for shell collaborators.
//!
//! The shell composition layer and peripheral widgets persist last-used
//! settings (wallpaper name, lock/boot flags, the synthetic folder list)
//! as plain string or JSON values. The window-manager core itself never
//! touches this storage.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrefsError {
    #[error("pref serialization failed: {0}")]
    Serialize(String),
    #[error("pref deserialization failed: {0}")]
    Deserialize(String),
    #[error("pref backend failed: {0}")]
    Backend(String),
}

/// String key-value store. Implementations wrap whatever the host platform
/// provides (browser localStorage, a file, an in-memory map for tests).
pub trait PrefsStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError>;
    fn remove(&self, key: &str) -> Result<(), PrefsError>;
}

/// Loads and JSON-decodes a typed pref, `None` when the key is absent.
pub fn load_pref_typed<T: DeserializeOwned>(
    store: &dyn PrefsStore,
    key: &str,
) -> Result<Option<T>, PrefsError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| PrefsError::Deserialize(err.to_string()))
}

/// JSON-encodes and stores a typed pref.
pub fn save_pref_typed<T: Serialize>(
    store: &dyn PrefsStore,
    key: &str,
    value: &T,
) -> Result<(), PrefsError> {
    let raw = serde_json::to_string(value).map_err(|err| PrefsError::Serialize(err.to_string()))?;
    store.set(key, &raw)
}

/// In-memory store used in tests and headless hosts. Clones share the same
/// underlying map so a shell and its collaborators can observe each other's
/// writes, matching the single localStorage of a browser session.
#[derive(Debug, Clone, Default)]
pub struct MemoryPrefs {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefsStore for MemoryPrefs {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PrefsError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
