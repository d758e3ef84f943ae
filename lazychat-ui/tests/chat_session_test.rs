//! Chat session flows driven against an in-memory backend.
//!
//! Run with: cargo test -p lazychat-ui --test chat_session_test

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use futures::executor::block_on;
use serde_json::json;
use shared_types::{ChatData, ChatHistoryItem, ChatInputResponse, Role};

use lazychat_ui::api::ApiError;
use lazychat_ui::polling::{PollConfig, StopReason};
use lazychat_ui::session::{ChatBackend, ChatSession, PROCESSING_MESSAGE};

/// Records every call and replays scripted conversation snapshots. Once the
/// script runs out the last snapshot is served again.
#[derive(Default)]
struct FakeBackend {
    calls: RefCell<Vec<String>>,
    created_id: String,
    /// Conversation id echoed by `/input`, if any.
    input_conversation: Option<String>,
    replies: RefCell<VecDeque<Result<ChatData, ApiError>>>,
    last_reply: RefCell<Option<ChatData>>,
}

impl FakeBackend {
    fn new(created_id: &str) -> Self {
        Self {
            created_id: created_id.to_string(),
            ..Self::default()
        }
    }

    fn script(&self, reply: Result<ChatData, ApiError>) {
        self.replies.borrow_mut().push_back(reply);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ChatBackend for FakeBackend {
    async fn create_chat(&self, title: &str) -> Result<ChatHistoryItem, ApiError> {
        self.calls.borrow_mut().push(format!("create:{title}"));
        Ok(serde_json::from_value(json!({
            "id": 7,
            "chatgpt_id": self.created_id,
            "title": title,
        }))
        .expect("history item"))
    }

    async fn send_input(
        &self,
        text: &str,
        chat_id: Option<&str>,
    ) -> Result<ChatInputResponse, ApiError> {
        self.calls
            .borrow_mut()
            .push(format!("input:{text}:{}", chat_id.unwrap_or("-")));
        let data = self.input_conversation.as_ref().map(|id| {
            json!({ "conversation_id": id, "title": "" })
        });
        Ok(serde_json::from_value(json!({ "message": "ok", "status": 200, "data": data }))
            .expect("input reply"))
    }

    async fn fetch_conversation(&self, chat_id: &str) -> Result<ChatData, ApiError> {
        self.calls.borrow_mut().push(format!("fetch:{chat_id}"));
        let next = self.replies.borrow_mut().pop_front();
        match next {
            Some(Ok(data)) => {
                *self.last_reply.borrow_mut() = Some(data.clone());
                Ok(data)
            }
            Some(Err(e)) => Err(e),
            None => self
                .last_reply
                .borrow()
                .clone()
                .ok_or_else(|| ApiError::Network("no scripted reply".to_string())),
        }
    }
}

/// Root -> user question, optionally followed by an assistant answer.
fn conversation(chat_id: &str, question: &str, answer: Option<&str>) -> ChatData {
    let mut mapping = json!({
        "client-created-root": {
            "id": "client-created-root",
            "message": null,
            "parent": null,
            "children": ["u1"],
        },
        "u1": {
            "id": "u1",
            "message": {
                "id": "u1",
                "author": { "role": "user" },
                "content": { "content_type": "text", "parts": [question] },
                "create_time": 1_700_000_000.0,
            },
            "parent": "client-created-root",
            "children": [],
        },
    });
    let mut current = "u1";

    if let Some(answer) = answer {
        mapping["u1"]["children"] = json!(["a1"]);
        mapping["a1"] = json!({
            "id": "a1",
            "message": {
                "id": "a1",
                "author": { "role": "assistant" },
                "content": { "content_type": "text", "parts": [answer] },
                "create_time": 1_700_000_005.0,
            },
            "parent": "u1",
            "children": [],
        });
        current = "a1";
    }

    serde_json::from_value(json!({
        "title": "Greetings",
        "current_node": current,
        "conversation_id": chat_id,
        "mapping": mapping,
    }))
    .expect("chat data")
}

#[test]
fn first_message_creates_chat_then_polls_it() {
    let backend = FakeBackend::new("conv-1");
    let mut session = ChatSession::new(None, PollConfig::default());

    let polling = block_on(session.submit(&backend, "Hi"));

    assert!(polling);
    assert_eq!(
        backend.calls(),
        vec!["create:New chat".to_string(), "input:Hi:conv-1".to_string()]
    );
    assert_eq!(session.chat_id(), Some("conv-1"));
    let shown = session.messages();
    assert_eq!(shown.len(), 2);
    assert_eq!(shown[0].role, Role::User);
    assert_eq!(shown[0].content, "Hi");
    assert!(shown[1].is_loading);
    assert_eq!(shown[1].content, PROCESSING_MESSAGE);

    backend.script(Ok(conversation("conv-1", "Hi", None)));
    assert!(block_on(session.tick(&backend)));
    assert_eq!(backend.calls().last().map(String::as_str), Some("fetch:conv-1"));
    assert_eq!(session.title(), "Greetings");
    // Server has only the question so far; the spinner stays.
    assert!(session.messages().last().is_some_and(|m| m.is_loading));
}

#[test]
fn polling_stops_once_the_answer_stabilises() {
    let backend = FakeBackend::new("conv-2");
    let mut session = ChatSession::new(None, PollConfig::default());
    assert!(block_on(session.submit(&backend, "Hi")));

    backend.script(Ok(conversation("conv-2", "Hi", None)));
    backend.script(Ok(conversation("conv-2", "Hi", Some("Hello! How can I help?"))));

    let mut ticks = 0;
    while block_on(session.tick(&backend)) {
        ticks += 1;
        assert!(ticks < 10, "polling never stopped");
    }

    // One empty fetch, then three sightings of the same complete answer.
    assert_eq!(session.polling().attempts(), 4);
    assert_eq!(session.polling().last_stop(), Some(StopReason::Stabilized));
    let shown = session.messages();
    assert_eq!(shown.len(), 2);
    assert_eq!(shown[1].role, Role::Assistant);
    assert_eq!(shown[1].content, "Hello! How can I help?");
    assert!(!shown.iter().any(|m| m.is_loading));
    assert!(!session.can_continue());
}

#[test]
fn incomplete_answer_runs_out_of_attempts_and_offers_continue() {
    let backend = FakeBackend::new("conv-3");
    let mut session = ChatSession::new(None, PollConfig::default());
    assert!(block_on(session.submit(&backend, "List the steps")));

    backend.script(Ok(conversation(
        "conv-3",
        "List the steps",
        Some("Here is the plan:\n- gather inputs"),
    )));

    while block_on(session.tick(&backend)) {}

    assert_eq!(session.polling().attempts(), 6);
    assert_eq!(session.polling().last_stop(), Some(StopReason::MaxAttempts));
    assert!(session.may_be_incomplete());
    assert!(session.can_continue());

    // Continue restarts polling from scratch.
    assert!(session.extend());
    assert!(session.polling().is_active());
    assert_eq!(session.polling().attempts(), 0);
}

#[test]
fn repeated_fetch_errors_stop_polling_and_clear_spinner() {
    let backend = FakeBackend::new("conv-4");
    let mut session = ChatSession::new(None, PollConfig::default());
    assert!(block_on(session.submit(&backend, "Hi")));

    for _ in 0..3 {
        backend.script(Err(ApiError::Network("connection reset".to_string())));
    }
    let mut ticks = 0;
    while block_on(session.tick(&backend)) {
        ticks += 1;
    }

    assert_eq!(ticks, 2);
    assert_eq!(session.polling().last_stop(), Some(StopReason::TooManyErrors));
    assert!(session.can_continue());
    assert!(!session.messages().iter().any(|m| m.is_loading));
    // The optimistic user bubble survives.
    assert_eq!(session.messages()[0].content, "Hi");
}

#[test]
fn existing_chat_skips_creation() {
    let backend = FakeBackend::new("unused");
    let mut session = ChatSession::new(None, PollConfig::default());

    backend.script(Ok(conversation("conv-5", "Earlier", Some("Earlier answer."))));
    block_on(session.load(&backend, "conv-5"));
    assert!(!session.is_loading());
    assert_eq!(session.messages().len(), 2);
    assert!(!session.polling().is_active());

    assert!(block_on(session.submit(&backend, "Follow up")));
    assert_eq!(
        backend.calls(),
        vec![
            "fetch:conv-5".to_string(),
            "input:Follow up:conv-5".to_string()
        ]
    );
    assert_eq!(session.chat_id(), Some("conv-5"));
    assert_eq!(session.messages().len(), 4);
}

#[test]
fn conversation_id_from_input_reply_is_adopted() {
    // The backend created the chat row but did not hand out its id.
    let backend = FakeBackend {
        input_conversation: Some("conv-6".to_string()),
        ..FakeBackend::new("")
    };
    let mut session = ChatSession::new(None, PollConfig::default());

    assert!(block_on(session.submit(&backend, "Hi")));
    assert_eq!(
        backend.calls(),
        vec!["create:New chat".to_string(), "input:Hi:-".to_string()]
    );
    assert_eq!(session.chat_id(), Some("conv-6"));

    backend.script(Ok(conversation("conv-6", "Hi", Some("Hello."))));
    assert!(block_on(session.tick(&backend)));
    assert_eq!(backend.calls().last().map(String::as_str), Some("fetch:conv-6"));
}
