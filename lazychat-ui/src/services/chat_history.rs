use shared_types::{
    ChatHistoryDetailResponse, ChatHistoryList, ChatTitleRequest, CreateChatResponse,
    DeleteChatResponse,
};

use crate::api::{ApiClient, ApiError};

pub async fn list(client: &ApiClient) -> Result<ChatHistoryList, ApiError> {
    client.get("/history").await
}

pub async fn get(client: &ApiClient, id: &str) -> Result<ChatHistoryDetailResponse, ApiError> {
    client.get(&format!("/history/{id}")).await
}

pub async fn create(client: &ApiClient, title: &str) -> Result<CreateChatResponse, ApiError> {
    let request = ChatTitleRequest {
        title: title.to_string(),
    };
    client.post("/history", &request).await
}

pub async fn rename(
    client: &ApiClient,
    id: &str,
    title: &str,
) -> Result<CreateChatResponse, ApiError> {
    let request = ChatTitleRequest {
        title: title.to_string(),
    };
    client.put(&format!("/history/{id}"), &request).await
}

pub async fn delete(client: &ApiClient, id: &str) -> Result<DeleteChatResponse, ApiError> {
    client.delete(&format!("/history/{id}")).await
}

pub async fn clear_all(client: &ApiClient) -> Result<DeleteChatResponse, ApiError> {
    client.delete("/history/clear").await
}
