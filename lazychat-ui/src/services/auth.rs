//! Login, registration and session probing.

use shared_types::{LoginRequest, LoginResponse, RegisterRequest, User};

use crate::api::{ApiClient, ApiError};
use crate::state::PersistedState;
use crate::storage::{clear_token, load_token, store_token, KeyValueStore, LocalStore};

/// Stand-in for a login response that carries no user object.
pub fn synthesized_user(username: &str) -> User {
    User {
        id: "1".to_string(),
        name: username.to_string(),
        email: username.to_string(),
        role: Some("user".to_string()),
        avatar: None,
    }
}

/// Used when a token exists but the profile cannot be fetched.
pub fn placeholder_user() -> User {
    User {
        id: "unknown".to_string(),
        name: "User".to_string(),
        email: "unknown@example.com".to_string(),
        role: Some("user".to_string()),
        avatar: None,
    }
}

pub async fn login(client: &ApiClient, username: &str, password: &str) -> Result<User, ApiError> {
    let request = LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    };
    let response: LoginResponse = client.post("/login", &request).await?;
    store_token(&LocalStore, &response.access_token);
    dioxus_logger::tracing::info!("Signed in as {}", username);
    Ok(response
        .user
        .unwrap_or_else(|| synthesized_user(username)))
}

/// Register, then sign in with the same credentials.
pub async fn register(
    client: &ApiClient,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    let request = RegisterRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    };
    let _: serde_json::Value = client.post("/register", &request).await?;
    login(client, username, password).await
}

pub fn logout(store: &impl KeyValueStore) {
    clear_token(store);
}

/// Profile fallback chain when `/me` is unavailable: persisted user, then a
/// placeholder if a token is still present.
pub fn fallback_user(store: &impl KeyValueStore) -> Option<User> {
    if let Some(user) = PersistedState::load(store).user {
        return Some(user);
    }
    load_token(store).map(|_| placeholder_user())
}

pub async fn current_user(client: &ApiClient) -> Option<User> {
    load_token(&LocalStore)?;
    match client.get::<User>("/me").await {
        Ok(user) => Some(user),
        Err(e) => {
            dioxus_logger::tracing::warn!("Could not fetch profile: {}", e);
            fallback_user(&LocalStore)
        }
    }
}

pub fn is_authenticated(store: &impl KeyValueStore) -> bool {
    load_token(store).is_some() || PersistedState::load(store).is_authenticated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn fallback_prefers_persisted_user() {
        let store = MemoryStore::new();
        assert!(fallback_user(&store).is_none());

        store_token(&store, "t");
        assert_eq!(fallback_user(&store), Some(placeholder_user()));

        PersistedState {
            user: Some(synthesized_user("mai")),
            is_authenticated: true,
            ..PersistedState::default()
        }
        .save(&store);
        assert_eq!(fallback_user(&store).map(|u| u.name), Some("mai".to_string()));
    }

    #[test]
    fn authenticated_by_token_or_persisted_flag() {
        let store = MemoryStore::new();
        assert!(!is_authenticated(&store));

        store_token(&store, "t");
        assert!(is_authenticated(&store));

        logout(&store);
        assert!(!is_authenticated(&store));

        PersistedState {
            is_authenticated: true,
            ..PersistedState::default()
        }
        .save(&store);
        assert!(is_authenticated(&store));
    }
}
