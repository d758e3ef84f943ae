//! Typed wrappers over the chat backend's REST endpoints.

pub mod auth;
pub mod chat_history;
pub mod chat_input;
pub mod chat_response;

use async_trait::async_trait;
use shared_types::{ChatData, ChatHistoryItem, ChatInputResponse};

use crate::api::{ApiClient, ApiError};
use crate::session::ChatBackend;

/// The HTTP implementation of [`ChatBackend`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatServices {
    client: ApiClient,
}

impl ChatServices {
    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait(?Send)]
impl ChatBackend for ChatServices {
    async fn create_chat(&self, title: &str) -> Result<ChatHistoryItem, ApiError> {
        chat_history::create(&self.client, title)
            .await
            .map(|response| response.data)
    }

    async fn send_input(
        &self,
        text: &str,
        chat_id: Option<&str>,
    ) -> Result<ChatInputResponse, ApiError> {
        chat_input::send_input(&self.client, text, chat_id).await
    }

    async fn fetch_conversation(&self, chat_id: &str) -> Result<ChatData, ApiError> {
        chat_response::fetch(&self.client, chat_id)
            .await
            .map(|envelope| envelope.data)
    }
}
