//! Browser-local key/value persistence.
//!
//! Everything the app persists goes through [`KeyValueStore`] so the same
//! logic runs against `window.localStorage` in the browser and an in-memory
//! map in tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Bearer token written by login and purged on 401.
pub const TOKEN_KEY: &str = "token";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `window.localStorage`. Every operation is a no-op when storage is
/// unavailable (private browsing, non-browser target).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocalStore;

impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|storage| storage.get_item(key).ok().flatten())
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

pub fn load_token(store: &impl KeyValueStore) -> Option<String> {
    store.get(TOKEN_KEY).filter(|token| !token.trim().is_empty())
}

pub fn store_token(store: &impl KeyValueStore, token: &str) {
    store.set(TOKEN_KEY, token);
}

pub fn clear_token(store: &impl KeyValueStore) {
    store.remove(TOKEN_KEY);
}
