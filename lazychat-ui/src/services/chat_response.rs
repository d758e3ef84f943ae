use shared_types::{ChatResponseEnvelope, ChatResponseRequest};

use crate::api::{ApiClient, ApiError};

/// Full conversation graph for `chat_id`.
pub async fn fetch(client: &ApiClient, chat_id: &str) -> Result<ChatResponseEnvelope, ApiError> {
    let request = ChatResponseRequest {
        token_chatgpt: chat_id.to_string(),
    };
    client.post("/response", &request).await
}
