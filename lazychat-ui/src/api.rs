use gloo_net::http::{Method, Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::OnceLock;

use crate::state::PersistedState;
use crate::storage::{clear_token, load_token, KeyValueStore, LocalStore};

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Network(String),

    #[error("Your session has expired. Please sign in again.")]
    Unauthorized,

    #[error("HTTP error: {status} ({message})")]
    Http { status: u16, message: String },

    #[error("Failed to parse JSON: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Resolve the API base URL
/// - `LAZYCHAT_API_URL` at build time wins
/// - In development (localhost): http://localhost:3000
/// - Otherwise same origin
fn resolve_api_base() -> String {
    if let Some(url) = option_env!("LAZYCHAT_API_URL") {
        let url = url.trim().trim_end_matches('/');
        if !url.is_empty() {
            return url.to_string();
        }
    }

    let hostname = web_sys::window()
        .and_then(|w| w.location().hostname().ok())
        .unwrap_or_default();

    if hostname == "localhost" || hostname == "127.0.0.1" {
        "http://localhost:3000".to_string()
    } else {
        String::new()
    }
}

static API_BASE_CACHE: OnceLock<String> = OnceLock::new();

pub fn api_base() -> &'static str {
    API_BASE_CACHE.get_or_init(resolve_api_base).as_str()
}

pub fn bearer_header(store: &impl KeyValueStore) -> Option<String> {
    load_token(store).map(|token| format!("Bearer {token}"))
}

/// Pull a human-readable message out of an error body.
pub fn error_message(body: &str) -> String {
    let body = body.trim();
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(message) = json.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }
    body.to_string()
}

/// Empty bodies decode as JSON `null` so `()` and `Option<T>` targets work.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Forget the credentials after a 401.
pub fn purge_credentials(store: &impl KeyValueStore) {
    clear_token(store);
    PersistedState::clear_auth(store);
}

fn redirect_to_login() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let location = window.location();
    if location.pathname().ok().as_deref() == Some(LOGIN_PATH) {
        return;
    }
    if let Err(e) = location.set_href(LOGIN_PATH) {
        dioxus_logger::tracing::error!("Failed to redirect to login: {:?}", e);
    }
}

fn encode_query(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            let encoded = js_sys::encode_uri_component(value)
                .as_string()
                .unwrap_or_else(|| value.clone());
            format!("{key}={encoded}")
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Thin JSON-over-HTTP client for the chat backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(api_base())
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Append URL-encoded query pairs to `path`.
    pub fn with_query(path: &str, pairs: &[(&str, String)]) -> String {
        if pairs.is_empty() {
            return path.to_string();
        }
        format!("{}?{}", path, encode_query(pairs))
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = RequestBuilder::new(&self.url(path))
            .method(method)
            .header("Accept", "application/json");
        if let Some(auth) = bearer_header(&LocalStore) {
            builder = builder.header("Authorization", &auth);
        }
        builder
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.builder(Method::GET, path), None::<&()>).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.builder(Method::POST, path), Some(body)).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.builder(Method::PUT, path), Some(body)).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.builder(Method::PATCH, path), Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.builder(Method::DELETE, path), None::<&()>).await
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let request: Request = match body {
            Some(body) => builder
                .json(body)
                .map_err(|e| ApiError::Network(format!("Failed to serialize request: {e}")))?,
            None => builder
                .build()
                .map_err(|e| ApiError::Network(e.to_string()))?,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        check_status(response).await
    }
}

async fn check_status<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status == 401 {
        dioxus_logger::tracing::warn!("Unauthorized response from {}", response.url());
        purge_credentials(&LocalStore);
        redirect_to_login();
        return Err(ApiError::Unauthorized);
    }

    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        let message = error_message(&body);
        return Err(ApiError::Http {
            status,
            message: if message.is_empty() {
                response.status_text()
            } else {
                message
            },
        });
    }

    decode_body(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::APP_STATE_KEY;
    use crate::storage::{store_token, MemoryStore, TOKEN_KEY};
    use shared_types::{Theme, User};

    #[test]
    fn url_joins_base_and_path() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url("/history"), "http://localhost:3000/history");
        assert_eq!(client.url("history/4"), "http://localhost:3000/history/4");

        let same_origin = ApiClient::new("");
        assert_eq!(same_origin.url("/me"), "/me");
    }

    #[test]
    fn bearer_header_requires_token() {
        let store = MemoryStore::new();
        assert_eq!(bearer_header(&store), None);
        store_token(&store, "t0k");
        assert_eq!(bearer_header(&store).as_deref(), Some("Bearer t0k"));
    }

    #[test]
    fn error_message_prefers_error_then_message_then_body() {
        assert_eq!(error_message(r#"{"error":"bad input","message":"x"}"#), "bad input");
        assert_eq!(error_message(r#"{"message":"not found"}"#), "not found");
        assert_eq!(error_message("  gateway timeout "), "gateway timeout");
        assert_eq!(error_message(r#"{"detail":"?"}"#), r#"{"detail":"?"}"#);
    }

    #[test]
    fn empty_body_decodes_as_unit_or_none() {
        let unit: Result<(), ApiError> = decode_body("");
        assert!(unit.is_ok());
        let missing: Option<User> = decode_body("  ").unwrap();
        assert!(missing.is_none());

        let broken: Result<User, ApiError> = decode_body("{");
        assert!(matches!(broken, Err(ApiError::Decode(_))));
    }

    #[test]
    fn purge_credentials_clears_token_and_auth_but_not_theme() {
        let store = MemoryStore::new();
        store_token(&store, "expired");
        PersistedState {
            user: Some(User {
                id: "3".to_string(),
                name: "an".to_string(),
                email: "an@example.com".to_string(),
                role: None,
                avatar: None,
            }),
            is_authenticated: true,
            theme: Theme::Dark,
        }
        .save(&store);

        purge_credentials(&store);

        assert_eq!(store.get(TOKEN_KEY), None);
        assert!(store.get(APP_STATE_KEY).is_some());
        let state = PersistedState::load(&store);
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
        assert_eq!(state.theme, Theme::Dark);
    }

    #[test]
    fn http_error_display_includes_status() {
        let err = ApiError::Http {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error: 500 (boom)");
        assert!(ApiError::Unauthorized.is_unauthorized());
    }
}
