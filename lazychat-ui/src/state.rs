//! Application state container.
//!
//! `AppState` is a bundle of signals provided once at the root and pulled
//! out with [`use_app_state`]. Only [`PersistedState`] crosses the storage
//! boundary; cart contents and layout toggles live for the tab only.

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};
use shared_types::{Theme, User};

use crate::storage::{KeyValueStore, LocalStore};
use crate::storefront::Cart;

pub const APP_STATE_KEY: &str = "lazychat.app_state.v1";

/// The persisted subset of application state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub theme: Theme,
}

impl PersistedState {
    /// Missing or unreadable entries fall back to defaults.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let Some(raw) = store.get(APP_STATE_KEY) else {
            return Self::default();
        };
        match serde_json::from_str::<PersistedState>(&raw) {
            Ok(state) => state,
            Err(e) => {
                dioxus_logger::tracing::warn!("Discarding unreadable app state: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(payload) => store.set(APP_STATE_KEY, &payload),
            Err(e) => dioxus_logger::tracing::error!("Failed to serialize app state: {}", e),
        }
    }

    /// Drop the user and authenticated flag, keep preferences.
    pub fn clear_auth(store: &impl KeyValueStore) {
        let mut state = Self::load(store);
        state.user = None;
        state.is_authenticated = false;
        state.save(store);
    }
}

#[derive(Clone, Copy, PartialEq)]
pub struct AppState {
    pub user: Signal<Option<User>>,
    pub is_authenticated: Signal<bool>,
    pub theme: Signal<Theme>,
    pub sidebar_open: Signal<bool>,
    pub cart: Signal<Cart>,
}

impl AppState {
    /// Build the container from persisted storage. Must run inside a
    /// component scope (signals are owned by it).
    pub fn restore() -> Self {
        let persisted = PersistedState::load(&LocalStore);
        apply_theme_to_document(persisted.theme);
        Self {
            user: Signal::new(persisted.user),
            is_authenticated: Signal::new(persisted.is_authenticated),
            theme: Signal::new(persisted.theme),
            sidebar_open: Signal::new(true),
            cart: Signal::new(Cart::default()),
        }
    }

    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            user: (*self.user.peek()).clone(),
            is_authenticated: *self.is_authenticated.peek(),
            theme: *self.theme.peek(),
        }
    }

    fn persist(&self) {
        self.snapshot().save(&LocalStore);
    }

    pub fn set_user(mut self, user: Option<User>) {
        self.is_authenticated.set(user.is_some());
        self.user.set(user);
        self.persist();
    }

    pub fn logout(mut self) {
        self.user.set(None);
        self.is_authenticated.set(false);
        self.persist();
    }

    pub fn toggle_theme(mut self) {
        let next = self.theme.peek().toggled();
        self.theme.set(next);
        apply_theme_to_document(next);
        self.persist();
    }

    pub fn toggle_sidebar(mut self) {
        let next = !*self.sidebar_open.peek();
        self.sidebar_open.set(next);
    }
}

pub fn use_app_state() -> AppState {
    use_context::<AppState>()
}

pub fn apply_theme_to_document(theme: Theme) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        if let Some(root) = document.document_element() {
            let _ = root.set_attribute("data-theme", theme.as_str());
            let class_list = root.class_list();
            let _ = match theme {
                Theme::Dark => class_list.add_1("dark"),
                Theme::Light => class_list.remove_1("dark"),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn user() -> User {
        User {
            id: "1".to_string(),
            name: "lan".to_string(),
            email: "lan@example.com".to_string(),
            role: Some("user".to_string()),
            avatar: None,
        }
    }

    #[test]
    fn missing_entry_loads_defaults() {
        let store = MemoryStore::new();
        assert_eq!(PersistedState::load(&store), PersistedState::default());
    }

    #[test]
    fn corrupt_entry_loads_defaults() {
        let store = MemoryStore::new();
        store.set(APP_STATE_KEY, "{not json");
        assert_eq!(PersistedState::load(&store), PersistedState::default());
    }

    #[test]
    fn save_then_load_restores_persisted_subset() {
        let store = MemoryStore::new();
        let state = PersistedState {
            user: Some(user()),
            is_authenticated: true,
            theme: Theme::Dark,
        };
        state.save(&store);
        assert_eq!(PersistedState::load(&store), state);
    }

    #[test]
    fn clear_auth_keeps_theme() {
        let store = MemoryStore::new();
        PersistedState {
            user: Some(user()),
            is_authenticated: true,
            theme: Theme::Dark,
        }
        .save(&store);

        PersistedState::clear_auth(&store);

        let loaded = PersistedState::load(&store);
        assert!(loaded.user.is_none());
        assert!(!loaded.is_authenticated);
        assert_eq!(loaded.theme, Theme::Dark);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use crate::storage::{clear_token, load_token, store_token};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn local_store_persists_state_and_token() {
        let store = LocalStore;
        store_token(&store, "abc");
        PersistedState {
            user: None,
            is_authenticated: true,
            theme: Theme::Dark,
        }
        .save(&store);

        assert_eq!(load_token(&store).as_deref(), Some("abc"));
        PersistedState::clear_auth(&store);
        let loaded = PersistedState::load(&store);
        assert!(!loaded.is_authenticated);
        assert_eq!(loaded.theme, Theme::Dark);

        clear_token(&store);
        store.remove(APP_STATE_KEY);
        assert!(load_token(&store).is_none());
    }

    #[wasm_bindgen_test]
    fn theme_is_applied_to_document_root() {
        let Some(root) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        else {
            panic!("no document element");
        };

        apply_theme_to_document(Theme::Dark);
        assert!(root.class_list().contains("dark"));
        assert_eq!(root.get_attribute("data-theme").as_deref(), Some("dark"));

        apply_theme_to_document(Theme::Light);
        assert!(!root.class_list().contains("dark"));
        assert_eq!(root.get_attribute("data-theme").as_deref(), Some("light"));
    }
}
