//! Chat screens: the layout that owns the session, the message list and the
//! input box.
//!
//! All network work runs on one coroutine owned by [`ChatShell`], so it
//! survives the `/` to `/chat/:id` navigation that follows chat creation.
//! Child components only read the shared signals and send [`ChatCommand`]s.

use chrono::{DateTime, TimeZone};
use dioxus::prelude::*;
use futures_util::StreamExt;
use gloo_timers::future::TimeoutFuture;
use shared_types::{ChatHistoryItem, DisplayMessage, Role, DEFAULT_CHAT_TITLE};

use crate::components::auth::RedirectToLogin;
use crate::components::header::Header;
use crate::components::sidebar::Sidebar;
use crate::components::styles::CHAT_STYLES;
use crate::interop::{copy_text_to_clipboard, scroll_to_bottom};
use crate::markdown::render_to_html;
use crate::polling::{PollTask, StopReason};
use crate::router::Route;
use crate::services::{chat_history, ChatServices};
use crate::session::{ChatBackend, ChatSession, SubmitResult, TickStep};
use crate::state::use_app_state;

const MESSAGE_LIST_ID: &str = "message-list";

/// Signals shared by everything under [`ChatShell`].
#[derive(Clone, Copy, PartialEq)]
pub struct ChatContext {
    pub session: Signal<ChatSession>,
    pub history: Signal<Vec<ChatHistoryItem>>,
    pub history_loading: Signal<bool>,
}

pub fn use_chat_context() -> ChatContext {
    use_context::<ChatContext>()
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Show a chat (or a fresh conversation for `None`).
    Open(Option<String>),
    Submit(String),
    /// Manual "continue" after polling gave up.
    Continue,
    RefreshHistory,
    Rename { id: String, title: String },
    Delete { id: String },
    ClearAll,
}

async fn refresh_history(services: &ChatServices, ctx: ChatContext) {
    let ChatContext {
        mut history,
        mut history_loading,
        ..
    } = ctx;
    history_loading.set(true);
    match chat_history::list(services.client()).await {
        Ok(list) => history.set(list.history),
        Err(e) => dioxus_logger::tracing::error!("Failed to load chat history: {}", e),
    }
    history_loading.set(false);
}

/// Fall back to the history entry's stored messages for `chat_id`.
async fn load_stored_messages(services: &ChatServices, ctx: ChatContext, chat_id: &str) {
    let entry_id = ctx
        .history
        .peek()
        .iter()
        .find(|entry| entry.chatgpt_id == chat_id)
        .map(|entry| entry.id.clone());
    let Some(entry_id) = entry_id else {
        return;
    };
    match chat_history::get(services.client(), &entry_id).await {
        Ok(detail) => {
            let mut session = ctx.session;
            session.write().apply_history_detail(chat_id, &detail.data);
        }
        Err(e) => dioxus_logger::tracing::warn!("No stored messages for {}: {}", chat_id, e),
    }
}

/// Spawn the tick loop, replacing any loop already running.
fn start_polling(ctx: ChatContext, services: ChatServices, poll: PollTask) {
    let handle = poll.clone();
    let mut session = ctx.session;
    let task = spawn(async move {
        let interval = session.peek().polling().config().interval_ms;
        loop {
            TimeoutFuture::new(interval).await;
            let step = session.write().begin_tick();
            match step {
                TickStep::Idle => break,
                TickStep::Wait => {}
                TickStep::Fetch(chat_id) => {
                    let result = services.fetch_conversation(&chat_id).await;
                    session.write().complete_tick(result);
                }
            }
            if !session.peek().polling().is_active() {
                break;
            }
        }
        handle.finished();
        // The backend names new chats while answering.
        refresh_history(&services, ctx).await;
    });
    poll.replace(task);
}

#[component]
pub fn ChatShell() -> Element {
    let app = use_app_state();
    let nav = navigator();
    let services = use_hook(ChatServices::default);
    let poll = use_hook(PollTask::default);
    let session = use_signal(ChatSession::default);
    let history = use_signal(Vec::<ChatHistoryItem>::new);
    let history_loading = use_signal(|| true);

    let ctx = use_context_provider(|| ChatContext {
        session,
        history,
        history_loading,
    });

    {
        let poll = poll.clone();
        use_drop(move || poll.stop());
    }

    let _commands = use_coroutine(move |mut rx: UnboundedReceiver<ChatCommand>| {
        let services = services.clone();
        let poll = poll.clone();
        let mut session = ctx.session;
        async move {
            if *app.is_authenticated.peek() {
                refresh_history(&services, ctx).await;
            }

            while let Some(command) = rx.next().await {
                match command {
                    ChatCommand::Open(chat_id) => {
                        if session.peek().chat_id() == chat_id.as_deref() {
                            continue;
                        }
                        poll.stop();
                        match chat_id {
                            Some(id) => {
                                session.write().begin_load(&id);
                                let result = services.fetch_conversation(&id).await;
                                let failed = result.is_err();
                                session.write().complete_load(result);
                                if failed {
                                    load_stored_messages(&services, ctx, &id).await;
                                }
                            }
                            None => session.write().reset(None),
                        }
                    }
                    ChatCommand::Submit(text) => {
                        let Some(plan) = session.write().begin_submit(&text) else {
                            continue;
                        };
                        let services = services.clone();
                        let poll = poll.clone();
                        spawn(async move {
                            let outcome = ChatSession::deliver(&services, &plan).await;
                            let result = session.write().finish_submit(&plan, outcome);
                            if let SubmitResult::Polling { new_chat } = result {
                                start_polling(ctx, services.clone(), poll);
                                if let Some(chat_id) = new_chat {
                                    nav.push(Route::Chat { chat_id });
                                    refresh_history(&services, ctx).await;
                                }
                            }
                        });
                    }
                    ChatCommand::Continue => {
                        if session.write().extend() {
                            start_polling(ctx, services.clone(), poll.clone());
                        }
                    }
                    ChatCommand::RefreshHistory => refresh_history(&services, ctx).await,
                    ChatCommand::Rename { id, title } => {
                        if let Err(e) = chat_history::rename(services.client(), &id, &title).await {
                            dioxus_logger::tracing::error!("Failed to rename chat {}: {}", id, e);
                        }
                        refresh_history(&services, ctx).await;
                    }
                    ChatCommand::Delete { id } => {
                        if let Err(e) = chat_history::delete(services.client(), &id).await {
                            dioxus_logger::tracing::error!("Failed to delete chat {}: {}", id, e);
                        }
                        refresh_history(&services, ctx).await;
                    }
                    ChatCommand::ClearAll => {
                        if let Err(e) = chat_history::clear_all(services.client()).await {
                            dioxus_logger::tracing::error!("Failed to clear chats: {}", e);
                        }
                        refresh_history(&services, ctx).await;
                    }
                }
            }
        }
    });

    if !*app.is_authenticated.read() {
        return rsx! { RedirectToLogin {} };
    }

    rsx! {
        style { {CHAT_STYLES} }
        div {
            class: "chat-shell",
            Header { show_sidebar_toggle: true }
            div {
                class: "chat-body",
                Sidebar {}
                main {
                    class: "chat-main",
                    Outlet::<Route> {}
                }
            }
        }
    }
}

#[component]
pub fn Home() -> Element {
    rsx! { ChatPanel { chat_id: None } }
}

#[component]
pub fn Chat(chat_id: String) -> Element {
    rsx! { ChatPanel { chat_id: Some(chat_id) } }
}

#[component]
fn ChatPanel(chat_id: Option<String>) -> Element {
    let ctx = use_chat_context();
    let commands = use_coroutine_handle::<ChatCommand>();

    use_effect(use_reactive((&chat_id,), move |(chat_id,)| {
        commands.send(ChatCommand::Open(chat_id));
    }));

    let (messages, title, error, loading) = {
        let session = ctx.session.read();
        let title = match session.chat_id() {
            Some(_) => session.title().to_string(),
            None => DEFAULT_CHAT_TITLE.to_string(),
        };
        (
            session.display_messages(),
            title,
            session.last_error().map(str::to_string),
            session.is_loading(),
        )
    };

    rsx! {
        div { class: "chat-title-bar", "{title}" }
        if let Some(error) = error {
            div { class: "error-banner", "{error}" }
        }
        MessageList { messages, loading }
        PollingIndicator {}
        ChatInput {}
    }
}

#[component]
fn MessageList(messages: Vec<DisplayMessage>, loading: bool) -> Element {
    let count = messages.len();
    let last_len = messages.last().map(|m| m.content.len()).unwrap_or(0);

    use_effect(use_reactive((&count, &last_len), move |_| {
        scroll_to_bottom(MESSAGE_LIST_ID);
    }));

    rsx! {
        div {
            id: MESSAGE_LIST_ID,
            class: "message-list",
            if loading {
                div { class: "empty-state", LoadingDots {} }
            } else if messages.is_empty() {
                div {
                    class: "empty-state",
                    p { "No messages yet" }
                    span { "Type a message below to begin chatting" }
                }
            } else {
                for message in messages {
                    ChatBubble { key: "{message.id}", message }
                }
            }
        }
    }
}

pub fn format_clock<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.format("%-I:%M %p").to_string()
}

#[component]
fn ChatBubble(message: DisplayMessage) -> Element {
    let is_user = message.role != Role::Assistant;
    let time = format_clock(&message.timestamp.with_timezone(&chrono::Local));
    let html = (!is_user && !message.content.is_empty()).then(|| render_to_html(&message.content));
    let content = message.content.clone();
    let can_copy = !message.is_loading && !content.is_empty();

    rsx! {
        div {
            class: if is_user { "message-row user-row" } else { "message-row assistant-row" },
            div {
                class: "avatar",
                if is_user { "You" } else { "AI" }
            }
            div {
                div {
                    class: if is_user { "message-bubble user-bubble" } else { "message-bubble assistant-bubble" },
                    if let Some(html) = html {
                        div { dangerous_inner_html: "{html}" }
                    } else if is_user {
                        "{message.content}"
                    }
                    if message.is_loading {
                        LoadingDots {}
                    }
                }
                div {
                    class: "message-meta",
                    span { "{time}" }
                    if can_copy {
                        button {
                            class: "copy-button",
                            title: "Copy",
                            onclick: move |_| copy_text_to_clipboard(&content),
                            "Copy"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn LoadingDots() -> Element {
    rsx! {
        div {
            class: "typing-indicator",
            span {}
            span {}
            span {}
        }
    }
}

#[component]
fn PollingIndicator() -> Element {
    let ctx = use_chat_context();
    let commands = use_coroutine_handle::<ChatCommand>();
    let session = ctx.session.read();
    let polling = session.polling();

    if polling.is_active() {
        let attempt = polling.attempts();
        let max = polling.config().max_attempts;
        return rsx! {
            div {
                class: "polling-bar",
                LoadingDots {}
                span { "Waiting for the response ({attempt}/{max})" }
            }
        };
    }

    if session.can_continue() {
        let notice = if polling.last_stop() == Some(StopReason::TooManyErrors) {
            "Lost contact with the server."
        } else {
            "The response may be incomplete."
        };
        return rsx! {
            div {
                class: "polling-bar",
                span { "{notice}" }
                button {
                    class: "btn",
                    onclick: move |_| commands.send(ChatCommand::Continue),
                    "Continue"
                }
            }
        };
    }

    rsx! {}
}

#[component]
fn ChatInput() -> Element {
    let ctx = use_chat_context();
    let commands = use_coroutine_handle::<ChatCommand>();
    let mut input_text = use_signal(String::new);
    let sending = ctx.session.read().is_sending();

    let send_message = use_callback(move |_| {
        let text = input_text.peek().trim().to_string();
        if text.is_empty() || ctx.session.peek().is_sending() {
            return;
        }
        commands.send(ChatCommand::Submit(text));
        input_text.set(String::new());
    });

    rsx! {
        div {
            class: "chat-input-area",
            div {
                class: "input-wrapper",
                textarea {
                    class: "chat-textarea",
                    placeholder: "Type a message...",
                    rows: "1",
                    value: "{input_text}",
                    disabled: sending,
                    oninput: move |e: FormEvent| input_text.set(e.value()),
                    onkeydown: move |e: KeyboardEvent| {
                        if e.key() == Key::Enter && !e.modifiers().shift() {
                            e.prevent_default();
                            send_message.call(());
                        }
                    },
                }
                button {
                    class: "btn btn-primary",
                    disabled: sending || input_text.read().trim().is_empty(),
                    onclick: move |_| send_message.call(()),
                    if sending { "…" } else { "Send" }
                }
            }
            div {
                class: "input-hint",
                "Press Enter to send, Shift+Enter for new line"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn clock_format_is_twelve_hour() {
        let morning = Utc.with_ymd_and_hms(2024, 5, 1, 9, 5, 0).unwrap();
        assert_eq!(format_clock(&morning), "9:05 AM");
        let evening = Utc.with_ymd_and_hms(2024, 5, 1, 21, 30, 0).unwrap();
        assert_eq!(format_clock(&evening), "9:30 PM");
        let midnight = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(format_clock(&midnight), "12:00 AM");
    }
}
