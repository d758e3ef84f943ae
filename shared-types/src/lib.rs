//! Shared types for LazyChat
//!
//! Wire types mirror the external backend's JSON payloads (auth, chat
//! history, chat input, conversation mapping). Display types are derived on
//! the client and never sent back.
//!
//! Serializable with serde for JSON over HTTP

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

// ============================================================================
// Conversation Mapping
// ============================================================================

/// Parent id the backend uses for the synthetic root of every conversation.
pub const ROOT_SENTINEL: &str = "client-created-root";

/// Content type of the only messages that are displayed.
pub const CONTENT_TYPE_TEXT: &str = "text";

/// Title shown before the backend has named a conversation.
pub const DEFAULT_CHAT_TITLE: &str = "New chat";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    /// Any other author (tool, critic, ...). Displayed like a user turn.
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Tool => "tool",
        }
    }
}

// Only the literal `system` is hidden; unknown authors map to `Tool`.
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "system" => Role::System,
            _ => Role::Tool,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatAuthor {
    pub role: Role,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatContent {
    pub content_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parts: Vec<serde_json::Value>,
}

impl ChatContent {
    /// Text parts joined by newlines. Non-string parts (images, attachments)
    /// are skipped.
    pub fn joined_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Message payload attached to a conversation node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeMessage {
    pub id: String,
    pub author: ChatAuthor,
    pub content: ChatContent,
    /// Seconds since the epoch, fractional.
    #[serde(default)]
    pub create_time: Option<f64>,
    #[serde(default)]
    pub update_time: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub end_turn: Option<bool>,
}

impl NodeMessage {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.create_time.and_then(epoch_seconds_to_utc)
    }
}

/// One node of the server-provided conversation graph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatNode {
    pub id: String,
    #[serde(default)]
    pub message: Option<NodeMessage>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<String>,
}

pub type ConversationMapping = HashMap<String, ChatNode>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub current_node: String,
    #[serde(default)]
    pub mapping: ConversationMapping,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub create_time: Option<f64>,
    #[serde(default)]
    pub update_time: Option<f64>,
    #[serde(default)]
    pub default_model_slug: Option<String>,
}

/// Envelope returned by `POST /response`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponseEnvelope {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub token_chatgpt: Option<String>,
    pub data: ChatData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponseRequest {
    pub token_chatgpt: String,
}

/// Header-level facts about a conversation
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    pub title: String,
    pub current_node: String,
    pub conversation_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub model_slug: Option<String>,
}

impl From<&ChatData> for ConversationSummary {
    fn from(data: &ChatData) -> Self {
        let title = if data.title.trim().is_empty() {
            DEFAULT_CHAT_TITLE.to_string()
        } else {
            data.title.clone()
        };
        Self {
            title,
            current_node: data.current_node.clone(),
            conversation_id: data.conversation_id.clone(),
            created_at: data.create_time.and_then(epoch_seconds_to_utc),
            updated_at: data.update_time.and_then(epoch_seconds_to_utc),
            model_slug: data.default_model_slug.clone(),
        }
    }
}

// ============================================================================
// Display
// ============================================================================

/// Chat message for UI display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub is_loading: bool, // True while the assistant bubble waits on a reply
}

impl DisplayMessage {
    pub fn new(id: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            is_loading: false,
        }
    }

    pub fn loading(id: impl Into<String>) -> Self {
        Self {
            is_loading: true,
            ..Self::new(id, Role::Assistant, "")
        }
    }
}

// ============================================================================
// Chat History
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatHistoryItem {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chatgpt_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: String,
}

impl ChatHistoryItem {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_CHAT_TITLE)
    }
}

/// `GET /history`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatHistoryList {
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "string_or_number_default")]
    pub user_id: String,
    #[serde(default)]
    pub history: Vec<ChatHistoryItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatHistoryDetail {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub chatgpt_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub messages: Vec<HistoryMessage>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatHistoryDetailResponse {
    pub data: ChatHistoryDetail,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTitleRequest {
    pub title: String,
}

/// `POST /history` and `PUT /history/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateChatResponse {
    pub data: ChatHistoryItem,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteChatResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: u16,
}

// ============================================================================
// Chat Input
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatInputData {
    #[serde(default)]
    pub conversation_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub create_time: Option<f64>,
    #[serde(default)]
    pub update_time: Option<f64>,
}

/// `POST /input`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatInputResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub data: Option<ChatInputData>,
}

impl ChatInputResponse {
    pub fn conversation_id(&self) -> Option<&str> {
        self.data
            .as_ref()
            .map(|d| d.conversation_id.as_str())
            .filter(|id| !id.is_empty())
    }
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        if !self.name.trim().is_empty() {
            &self.name
        } else {
            &self.email
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<User>,
}

// ============================================================================
// UI Preferences
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

// ============================================================================
// Storefront
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: u32,
    pub name: String,
    /// Price in VND.
    pub price: u64,
    pub original_price: Option<u64>,
    pub category: String,
    pub description: String,
    pub features: Vec<String>,
    pub image: String,
    pub in_stock: bool,
    pub rating: f32,
    pub reviews: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: u32,
    pub name: String,
    pub price: u64,
    pub quantity: u32,
    pub image: String,
}

impl CartItem {
    pub fn line_total(&self) -> u64 {
        self.price * u64::from(self.quantity)
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn epoch_seconds_to_utc(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis((seconds * 1000.0).round() as i64)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Backend ids are numeric in some payloads and strings in others.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

fn string_or_number_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        _ => Ok(String::new()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_envelope_deserialization() {
        let raw = json!({
            "message": "ok",
            "username": "tester",
            "token_chatgpt": "conv-1",
            "data": {
                "title": "Greeting",
                "current_node": "n2",
                "conversation_id": "conv-1",
                "create_time": 1_700_000_000.5,
                "mapping": {
                    "n1": {
                        "id": "n1",
                        "message": {
                            "id": "m1",
                            "author": { "role": "user", "name": null, "metadata": {} },
                            "content": { "content_type": "text", "parts": ["Hi"] },
                            "create_time": 1_700_000_001.0,
                            "status": "finished_successfully",
                            "weight": 1.0
                        },
                        "parent": "client-created-root",
                        "children": ["n2"]
                    },
                    "n2": {
                        "id": "n2",
                        "message": null,
                        "parent": "n1",
                        "children": []
                    }
                },
                "moderation_results": []
            }
        });

        let envelope: ChatResponseEnvelope = serde_json::from_value(raw).unwrap();
        assert_eq!(envelope.data.current_node, "n2");
        assert_eq!(envelope.data.mapping.len(), 2);

        let n1 = &envelope.data.mapping["n1"];
        let message = n1.message.as_ref().unwrap();
        assert_eq!(message.author.role, Role::User);
        assert_eq!(message.content.joined_text(), "Hi");
        assert_eq!(
            message.created_at().unwrap().timestamp(),
            1_700_000_001
        );
        assert!(envelope.data.mapping["n2"].message.is_none());
    }

    #[test]
    fn test_unknown_role_is_tool() {
        let author: ChatAuthor = serde_json::from_value(json!({ "role": "tool" })).unwrap();
        assert_eq!(author.role, Role::Tool);
        let author: ChatAuthor = serde_json::from_value(json!({ "role": "critic" })).unwrap();
        assert_eq!(author.role, Role::Tool);
        let author: ChatAuthor = serde_json::from_value(json!({ "role": "system" })).unwrap();
        assert_eq!(author.role, Role::System);
    }

    #[test]
    fn test_null_parts_and_children_default_to_empty() {
        let node: ChatNode = serde_json::from_value(json!({
            "id": "n",
            "message": {
                "id": "m",
                "author": { "role": "assistant" },
                "content": { "content_type": "model_editable_context", "parts": null }
            },
            "parent": null,
            "children": null
        }))
        .unwrap();

        assert!(node.children.is_empty());
        assert!(node.parent.is_none());
        assert!(node.message.unwrap().content.parts.is_empty());
    }

    #[test]
    fn test_joined_text_skips_non_string_parts() {
        let content = ChatContent {
            content_type: CONTENT_TYPE_TEXT.to_string(),
            parts: vec![json!("first"), json!({ "asset": "img" }), json!("second")],
        };
        assert_eq!(content.joined_text(), "first\nsecond");
    }

    #[test]
    fn test_summary_defaults_title() {
        let data = ChatData {
            title: "   ".to_string(),
            current_node: "n".to_string(),
            mapping: HashMap::new(),
            conversation_id: None,
            create_time: Some(1_700_000_000.0),
            update_time: None,
            default_model_slug: Some("gpt-4o".to_string()),
        };
        let summary = ConversationSummary::from(&data);
        assert_eq!(summary.title, DEFAULT_CHAT_TITLE);
        assert_eq!(summary.created_at.unwrap().timestamp(), 1_700_000_000);
        assert_eq!(summary.model_slug.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn test_history_list_accepts_numeric_ids() {
        let list: ChatHistoryList = serde_json::from_value(json!({
            "message": "ok",
            "user_id": 7,
            "history": [
                { "id": 12, "chatgpt_id": "abc", "title": null,
                  "created_at": "2024-01-01", "updated_at": "2024-01-02" }
            ]
        }))
        .unwrap();

        assert_eq!(list.user_id, "7");
        assert_eq!(list.history[0].id, "12");
        assert_eq!(list.history[0].display_title(), DEFAULT_CHAT_TITLE);
    }

    #[test]
    fn test_input_response_conversation_id() {
        let response: ChatInputResponse = serde_json::from_value(json!({
            "message": "sent",
            "status": 200,
            "data": { "conversation_id": "conv-9", "title": "Hi",
                      "create_time": 1.0, "update_time": 2.0 }
        }))
        .unwrap();
        assert_eq!(response.conversation_id(), Some("conv-9"));

        let empty: ChatInputResponse =
            serde_json::from_value(json!({ "message": "sent", "status": 200 })).unwrap();
        assert_eq!(empty.conversation_id(), None);
    }

    #[test]
    fn test_theme_serialization() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn test_cart_item_line_total() {
        let item = CartItem {
            product_id: 6,
            name: "AirPods Pro".to_string(),
            price: 6_990_000,
            quantity: 2,
            image: String::new(),
        };
        assert_eq!(item.line_total(), 13_980_000);
    }
}
