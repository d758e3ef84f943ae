use shared_types::ChatInputResponse;

use crate::api::{ApiClient, ApiError};

/// Query pairs for `POST /input`. New chats omit `token_chatgpt`.
pub fn input_query(text: &str, chat_id: Option<&str>) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::with_capacity(2);
    if let Some(id) = chat_id.filter(|id| !id.is_empty()) {
        pairs.push(("token_chatgpt", id.to_string()));
    }
    pairs.push(("text_input", text.to_string()));
    pairs
}

/// Send user input. The text travels in the query string; the body is an
/// empty JSON object.
pub async fn send_input(
    client: &ApiClient,
    text: &str,
    chat_id: Option<&str>,
) -> Result<ChatInputResponse, ApiError> {
    let path = ApiClient::with_query("/input", &input_query(text, chat_id));
    client
        .post(&path, &serde_json::json!({}))
        .await
        .inspect_err(|e| dioxus_logger::tracing::error!("Failed to send chat input: {}", e))
}
