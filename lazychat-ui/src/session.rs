//! Chat session orchestration: optimistic submit, conversation refresh and
//! the polling controller, independent of any rendering.
//!
//! Every step that touches the network is split in two synchronous halves
//! (`begin_*` / `finish_*` or `complete_*`) around one backend call. UI code
//! holds a `Signal<ChatSession>` and must not keep a write guard across an
//! await; tests drive the `async` conveniences against a fake backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{
    ChatData, ChatHistoryDetail, ChatHistoryItem, ChatInputResponse, DisplayMessage, Role,
    DEFAULT_CHAT_TITLE,
};

use crate::api::ApiError;
use crate::conversation::{current_node_text, latest_assistant, reconstruct, summarize};
use crate::polling::{looks_incomplete, PollConfig, PollingState, StopReason};

pub const WELCOME_MESSAGE: &str = "Hello! I'm your AI assistant. How can I help you today?";
pub const PROCESSING_MESSAGE: &str = "Processing your request...";
pub const SEND_ERROR_MESSAGE: &str =
    "Sorry, there was an error sending your message. Please try again.";

const WELCOME_ID: &str = "welcome";

/// The three backend calls a chat session needs.
#[async_trait(?Send)]
pub trait ChatBackend {
    async fn create_chat(&self, title: &str) -> Result<ChatHistoryItem, ApiError>;

    async fn send_input(
        &self,
        text: &str,
        chat_id: Option<&str>,
    ) -> Result<ChatInputResponse, ApiError>;

    async fn fetch_conversation(&self, chat_id: &str) -> Result<ChatData, ApiError>;
}

/// Everything needed to deliver one accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitPlan {
    pub text: String,
    pub chat_id: Option<String>,
    pub pending_id: String,
}

/// Result of delivering a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub chat_id: Option<String>,
    pub created_chat: bool,
}

/// What [`ChatSession::finish_submit`] did with a delivery outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResult {
    /// The session moved on (reset or another chat) before delivery finished.
    Ignored,
    Failed,
    /// Polling started. `new_chat` is set when delivery created the chat.
    Polling { new_chat: Option<String> },
}

impl SubmitResult {
    pub fn is_polling(&self) -> bool {
        matches!(self, SubmitResult::Polling { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickStep {
    /// Polling is not running.
    Idle,
    /// Counted as an attempt, but there is no chat to fetch yet.
    Wait,
    Fetch(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    chat_id: Option<String>,
    title: String,
    messages: Vec<DisplayMessage>,
    polling: PollingState,
    pending_id: Option<String>,
    may_be_incomplete: bool,
    sending: bool,
    loading: bool,
    last_error: Option<String>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(None, PollConfig::default())
    }
}

fn new_message_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl ChatSession {
    pub fn new(chat_id: Option<String>, config: PollConfig) -> Self {
        Self {
            chat_id,
            title: DEFAULT_CHAT_TITLE.to_string(),
            messages: Vec::new(),
            polling: PollingState::new(config),
            pending_id: None,
            may_be_incomplete: false,
            sending: false,
            loading: false,
            last_error: None,
        }
    }

    pub fn chat_id(&self) -> Option<&str> {
        self.chat_id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn messages(&self) -> &[DisplayMessage] {
        &self.messages
    }

    pub fn polling(&self) -> &PollingState {
        &self.polling
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn may_be_incomplete(&self) -> bool {
        self.may_be_incomplete
    }

    /// The "continue" affordance: polling has stopped and either the reply
    /// looks cut off or the fetch error limit was hit.
    pub fn can_continue(&self) -> bool {
        if self.chat_id.is_none() || self.polling.is_active() {
            return false;
        }
        self.may_be_incomplete || self.polling.last_stop() == Some(StopReason::TooManyErrors)
    }

    /// Messages to render. A brand-new session shows the welcome bubble.
    pub fn display_messages(&self) -> Vec<DisplayMessage> {
        if self.messages.is_empty() && self.chat_id.is_none() {
            return vec![DisplayMessage::new(
                WELCOME_ID,
                Role::Assistant,
                WELCOME_MESSAGE,
            )];
        }
        self.messages.clone()
    }

    /// Point the session at another chat (or none), dropping local state.
    pub fn reset(&mut self, chat_id: Option<String>) {
        let config = *self.polling.config();
        *self = Self::new(chat_id, config);
    }

    /// Adopt a chat id discovered after the session started. An existing id
    /// always wins.
    pub fn adopt_chat_id(&mut self, chat_id: &str) -> bool {
        if self.chat_id.is_some() || chat_id.is_empty() {
            return false;
        }
        self.chat_id = Some(chat_id.to_string());
        true
    }

    // ------------------------------------------------------------------
    // Submit
    // ------------------------------------------------------------------

    /// Accept a submission: append the user's message and a loading
    /// assistant bubble. Blank text and re-entrant submits are ignored.
    pub fn begin_submit(&mut self, text: &str) -> Option<SubmitPlan> {
        let text = text.trim();
        if text.is_empty() || self.sending {
            return None;
        }

        let pending_id = new_message_id();
        self.messages
            .push(DisplayMessage::new(new_message_id(), Role::User, text));
        self.messages.push(DisplayMessage::loading(pending_id.clone()));
        self.pending_id = Some(pending_id.clone());
        self.sending = true;
        self.last_error = None;

        Some(SubmitPlan {
            text: text.to_string(),
            chat_id: self.chat_id.clone(),
            pending_id,
        })
    }

    /// Create the chat when needed, then send the input.
    pub async fn deliver<B: ChatBackend + ?Sized>(
        backend: &B,
        plan: &SubmitPlan,
    ) -> Result<Delivery, ApiError> {
        let mut chat_id = plan.chat_id.clone();
        let mut created_chat = false;

        if chat_id.is_none() {
            let created = backend.create_chat(DEFAULT_CHAT_TITLE).await?;
            if !created.chatgpt_id.is_empty() {
                dioxus_logger::tracing::info!("Created chat {}", created.chatgpt_id);
                chat_id = Some(created.chatgpt_id);
                created_chat = true;
            }
        }

        let response = backend.send_input(&plan.text, chat_id.as_deref()).await?;
        if chat_id.is_none() {
            chat_id = response.conversation_id().map(str::to_string);
            created_chat = chat_id.is_some();
        }

        Ok(Delivery {
            chat_id,
            created_chat,
        })
    }

    /// Apply the delivery outcome. On [`SubmitResult::Polling`] the caller
    /// has to schedule ticks.
    pub fn finish_submit(
        &mut self,
        plan: &SubmitPlan,
        outcome: Result<Delivery, ApiError>,
    ) -> SubmitResult {
        if self.pending_id.as_deref() != Some(plan.pending_id.as_str()) {
            return SubmitResult::Ignored;
        }
        self.sending = false;
        match outcome {
            Ok(delivery) => {
                if let Some(id) = delivery.chat_id.as_deref() {
                    self.adopt_chat_id(id);
                }
                self.update_pending(&plan.pending_id, PROCESSING_MESSAGE, true);
                self.polling.start();
                let new_chat = if delivery.created_chat {
                    self.chat_id.clone()
                } else {
                    None
                };
                SubmitResult::Polling { new_chat }
            }
            Err(e) => {
                dioxus_logger::tracing::error!("Failed to send message: {}", e);
                self.update_pending(&plan.pending_id, SEND_ERROR_MESSAGE, false);
                self.pending_id = None;
                self.last_error = Some(e.to_string());
                SubmitResult::Failed
            }
        }
    }

    /// Returns whether polling was started.
    pub async fn submit<B: ChatBackend + ?Sized>(&mut self, backend: &B, text: &str) -> bool {
        let Some(plan) = self.begin_submit(text) else {
            return false;
        };
        let outcome = Self::deliver(backend, &plan).await;
        self.finish_submit(&plan, outcome).is_polling()
    }

    fn update_pending(&mut self, pending_id: &str, content: &str, is_loading: bool) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == pending_id) {
            message.content = content.to_string();
            message.is_loading = is_loading;
        }
    }

    // ------------------------------------------------------------------
    // Polling
    // ------------------------------------------------------------------

    pub fn begin_tick(&mut self) -> TickStep {
        if !self.polling.begin_tick() {
            return TickStep::Idle;
        }
        match self.chat_id.clone() {
            Some(id) => TickStep::Fetch(id),
            None => {
                self.polling.end_tick();
                TickStep::Wait
            }
        }
    }

    pub fn complete_tick(&mut self, result: Result<ChatData, ApiError>) {
        match result {
            Ok(data) => self.apply_conversation(&data),
            // Credentials are gone; retrying cannot succeed.
            Err(e) if e.is_unauthorized() => self.polling.stop(StopReason::Cancelled),
            Err(e) => {
                dioxus_logger::tracing::warn!("Error during polling: {}", e);
                self.polling.record_error();
            }
        }
        self.polling.end_tick();
        if !self.polling.is_active() {
            self.settle_pending();
        }
    }

    /// Run one tick. Returns whether polling is still active.
    pub async fn tick<B: ChatBackend + ?Sized>(&mut self, backend: &B) -> bool {
        if let TickStep::Fetch(chat_id) = self.begin_tick() {
            let result = backend.fetch_conversation(&chat_id).await;
            self.complete_tick(result);
        }
        self.polling.is_active()
    }

    /// Manual "continue". Returns true when a new polling session started.
    pub fn extend(&mut self) -> bool {
        self.polling.extend()
    }

    pub fn stop_polling(&mut self) {
        self.polling.stop(StopReason::Cancelled);
        self.settle_pending();
    }

    // A stopped session must not leave a spinner behind.
    fn settle_pending(&mut self) {
        if let Some(id) = self.pending_id.take() {
            self.messages.retain(|m| m.id != id || !m.is_loading);
        }
    }

    // ------------------------------------------------------------------
    // Conversation
    // ------------------------------------------------------------------

    /// Replace the optimistic list with the server's view and feed the
    /// polling controller.
    pub fn apply_conversation(&mut self, data: &ChatData) {
        let summary = summarize(data);
        self.title = summary.title;
        if let Some(id) = summary.conversation_id.as_deref() {
            self.adopt_chat_id(id);
        }

        let mut messages = reconstruct(&data.mapping, &data.current_node);
        let latest = latest_assistant(&messages).map(|m| m.content.clone());
        self.may_be_incomplete = latest.as_deref().is_some_and(looks_incomplete);

        let node_len = current_node_text(&data.mapping, &data.current_node)
            .chars()
            .count();
        self.polling.observe(latest.as_deref(), node_len);

        if messages.is_empty() {
            return;
        }

        // Keep a spinner while the assistant has not answered the last turn.
        let awaiting_reply = messages.last().is_some_and(|m| m.role == Role::User);
        match self.pending_id.clone() {
            Some(id) if awaiting_reply && self.polling.is_active() => {
                messages.push(DisplayMessage {
                    content: PROCESSING_MESSAGE.to_string(),
                    ..DisplayMessage::loading(id)
                });
            }
            _ => self.pending_id = None,
        }
        self.messages = messages;
    }

    pub fn begin_load(&mut self, chat_id: &str) {
        self.reset(Some(chat_id.to_string()));
        self.loading = true;
    }

    pub fn complete_load(&mut self, result: Result<ChatData, ApiError>) {
        self.loading = false;
        match result {
            Ok(data) => self.apply_conversation(&data),
            Err(e) => {
                dioxus_logger::tracing::error!("Failed to load chat: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Fallback when the conversation itself cannot be fetched: show the
    /// messages stored with the history entry. Ignored when the session has
    /// moved to another chat or the entry holds nothing displayable.
    pub fn apply_history_detail(&mut self, chat_id: &str, detail: &ChatHistoryDetail) -> bool {
        if self.chat_id.as_deref() != Some(chat_id) {
            return false;
        }
        let messages: Vec<DisplayMessage> = detail
            .messages
            .iter()
            .filter(|m| m.role != Role::System && !m.content.trim().is_empty())
            .map(|m| DisplayMessage {
                id: m.id.clone(),
                role: m.role,
                content: m.content.clone(),
                timestamp: DateTime::parse_from_rfc3339(&m.timestamp)
                    .map(|t| t.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
                is_loading: false,
            })
            .collect();
        if messages.is_empty() {
            return false;
        }

        if let Some(title) = detail.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            self.title = title.to_string();
        }
        self.messages = messages;
        self.last_error = None;
        true
    }

    /// Initial fetch of an existing chat. Does not start polling.
    pub async fn load<B: ChatBackend + ?Sized>(&mut self, backend: &B, chat_id: &str) {
        self.begin_load(chat_id);
        let result = backend.fetch_conversation(chat_id).await;
        self.complete_load(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_for(session: &mut ChatSession, text: &str) -> SubmitPlan {
        session.begin_submit(text).expect("submission accepted")
    }

    #[test]
    fn new_session_shows_welcome() {
        let session = ChatSession::default();
        let shown = session.display_messages();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].content, WELCOME_MESSAGE);
        assert_eq!(shown[0].role, Role::Assistant);
    }

    #[test]
    fn blank_and_reentrant_submits_are_ignored() {
        let mut session = ChatSession::default();
        assert!(session.begin_submit("   ").is_none());
        let _plan = plan_for(&mut session, "Hi");
        assert!(session.begin_submit("again").is_none());
        assert_eq!(session.messages().len(), 2);
    }

    #[test]
    fn optimistic_messages_are_appended() {
        let mut session = ChatSession::default();
        let plan = plan_for(&mut session, "  Hi  ");
        assert_eq!(plan.text, "Hi");
        assert!(plan.chat_id.is_none());

        let messages = session.messages();
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "Hi");
        assert!(messages[1].is_loading);
        assert_eq!(messages[1].id, plan.pending_id);
        assert!(session.is_sending());
    }

    #[test]
    fn failed_delivery_replaces_pending_bubble() {
        let mut session = ChatSession::default();
        let plan = plan_for(&mut session, "Hi");
        let result = session.finish_submit(
            &plan,
            Err(ApiError::Network("offline".to_string())),
        );

        assert_eq!(result, SubmitResult::Failed);
        assert!(!session.polling().is_active());
        assert!(!session.is_sending());
        let bubble = &session.messages()[1];
        assert_eq!(bubble.content, SEND_ERROR_MESSAGE);
        assert!(!bubble.is_loading);
    }

    #[test]
    fn successful_delivery_adopts_id_and_starts_polling() {
        let mut session = ChatSession::default();
        let plan = plan_for(&mut session, "Hi");
        let result = session.finish_submit(
            &plan,
            Ok(Delivery {
                chat_id: Some("conv-1".to_string()),
                created_chat: true,
            }),
        );

        assert_eq!(
            result,
            SubmitResult::Polling {
                new_chat: Some("conv-1".to_string())
            }
        );
        assert_eq!(session.chat_id(), Some("conv-1"));
        assert!(session.polling().is_active());
        assert_eq!(session.messages()[1].content, PROCESSING_MESSAGE);
    }

    #[test]
    fn delivery_after_reset_is_ignored() {
        let mut session = ChatSession::default();
        let plan = plan_for(&mut session, "Hi");
        session.reset(Some("other".to_string()));

        let result = session.finish_submit(
            &plan,
            Ok(Delivery {
                chat_id: Some("new".to_string()),
                created_chat: true,
            }),
        );
        // No navigation target may leak out of a stale delivery.
        assert_eq!(result, SubmitResult::Ignored);
        assert_eq!(session.chat_id(), Some("other"));
        assert!(!session.polling().is_active());
    }

    #[test]
    fn existing_chat_id_is_not_replaced() {
        let mut session = ChatSession::new(Some("keep".to_string()), PollConfig::default());
        assert!(!session.adopt_chat_id("other"));
        assert_eq!(session.chat_id(), Some("keep"));
    }

    #[test]
    fn tick_without_chat_id_counts_but_does_not_fetch() {
        let mut session = ChatSession::default();
        let plan = plan_for(&mut session, "Hi");
        session.finish_submit(
            &plan,
            Ok(Delivery {
                chat_id: None,
                created_chat: false,
            }),
        );

        assert_eq!(session.begin_tick(), TickStep::Wait);
        assert_eq!(session.polling().attempts(), 1);
    }

    #[test]
    fn stop_polling_clears_spinner() {
        let mut session = ChatSession::new(Some("c".to_string()), PollConfig::default());
        let plan = plan_for(&mut session, "Hi");
        session.finish_submit(
            &plan,
            Ok(Delivery {
                chat_id: Some("c".to_string()),
                created_chat: false,
            }),
        );
        session.stop_polling();
        assert_eq!(session.messages().len(), 1);
        assert!(!session.polling().is_active());
    }

    fn conversation(conversation_id: &str, answer: &str) -> ChatData {
        serde_json::from_value(serde_json::json!({
            "title": "Adopted",
            "current_node": "a1",
            "conversation_id": conversation_id,
            "mapping": {
                "u1": {
                    "id": "u1",
                    "message": {
                        "id": "u1",
                        "author": { "role": "user" },
                        "content": { "content_type": "text", "parts": ["Hi"] },
                        "create_time": 1.0
                    },
                    "parent": shared_types::ROOT_SENTINEL,
                    "children": ["a1"]
                },
                "a1": {
                    "id": "a1",
                    "message": {
                        "id": "a1",
                        "author": { "role": "assistant" },
                        "content": { "content_type": "text", "parts": [answer] },
                        "create_time": 2.0
                    },
                    "parent": "u1",
                    "children": []
                }
            }
        }))
        .expect("chat data")
    }

    #[test]
    fn conversation_adopts_missing_chat_id() {
        let mut session = ChatSession::default();
        session.apply_conversation(&conversation("conv-9", "Hello."));
        assert_eq!(session.chat_id(), Some("conv-9"));
        assert_eq!(session.title(), "Adopted");

        let mut existing = ChatSession::new(Some("mine".to_string()), PollConfig::default());
        existing.apply_conversation(&conversation("conv-9", "Hello."));
        assert_eq!(existing.chat_id(), Some("mine"));
    }

    #[test]
    fn error_limit_offers_continue_even_for_complete_text() {
        let mut session = ChatSession::new(Some("c".to_string()), PollConfig::default());
        let plan = plan_for(&mut session, "Hi");
        session.finish_submit(
            &plan,
            Ok(Delivery {
                chat_id: Some("c".to_string()),
                created_chat: false,
            }),
        );
        for _ in 0..3 {
            assert!(matches!(session.begin_tick(), TickStep::Fetch(_)));
            session.complete_tick(Err(ApiError::Network("down".to_string())));
        }

        assert!(!session.polling().is_active());
        assert!(!session.may_be_incomplete());
        assert!(session.can_continue());
    }

    #[test]
    fn unauthorized_fetch_stops_polling_at_once() {
        let mut session = ChatSession::new(Some("c".to_string()), PollConfig::default());
        let plan = plan_for(&mut session, "Hi");
        session.finish_submit(
            &plan,
            Ok(Delivery {
                chat_id: Some("c".to_string()),
                created_chat: false,
            }),
        );
        session.begin_tick();
        session.complete_tick(Err(ApiError::Unauthorized));

        assert_eq!(session.polling().last_stop(), Some(StopReason::Cancelled));
        assert!(!session.can_continue());
        assert!(!session.messages().iter().any(|m| m.is_loading));
    }

    #[test]
    fn history_detail_fills_in_when_conversation_fetch_fails() {
        let mut session = ChatSession::default();
        session.begin_load("conv-1");
        session.complete_load(Err(ApiError::Network("down".to_string())));
        assert!(session.last_error().is_some());

        let detail: ChatHistoryDetail = serde_json::from_value(serde_json::json!({
            "id": 3,
            "chatgpt_id": "conv-1",
            "title": "Trip plans",
            "messages": [
                { "id": "m0", "role": "system", "content": "be brief", "timestamp": "2024-05-01T09:00:00Z" },
                { "id": "m1", "role": "user", "content": "Where to?", "timestamp": "2024-05-01T09:01:00Z" },
                { "id": "m2", "role": "assistant", "content": "Lisbon.", "timestamp": "not a date" }
            ]
        }))
        .expect("history detail");

        assert!(!session.apply_history_detail("other", &detail));
        assert!(session.apply_history_detail("conv-1", &detail));
        assert_eq!(session.title(), "Trip plans");
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[0].content, "Where to?");
        assert!(session.last_error().is_none());
    }
}
