use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

use crate::components::chat::{use_chat_context, ChatCommand};
use crate::interop::{confirm, prompt};
use crate::router::Route;
use crate::state::use_app_state;

/// How long a first delete click stays armed.
const DELETE_CONFIRM_MS: u32 = 3_000;

#[component]
pub fn Sidebar() -> Element {
    let app = use_app_state();
    let ctx = use_chat_context();
    let nav = navigator();
    let commands = use_coroutine_handle::<ChatCommand>();
    let mut confirm_delete = use_signal(|| None::<String>);

    let active_chat = ctx.session.read().chat_id().map(str::to_string);
    let entries = ctx.history.read().clone();
    let has_entries = !entries.is_empty();

    let mut on_delete = move |id: String, chatgpt_id: String| {
        if confirm_delete.peek().as_deref() == Some(id.as_str()) {
            confirm_delete.set(None);
            commands.send(ChatCommand::Delete { id });
            if ctx.session.peek().chat_id() == Some(chatgpt_id.as_str()) {
                nav.push(Route::Home {});
            }
            return;
        }

        confirm_delete.set(Some(id.clone()));
        spawn(async move {
            TimeoutFuture::new(DELETE_CONFIRM_MS).await;
            if confirm_delete.peek().as_deref() == Some(id.as_str()) {
                confirm_delete.set(None);
            }
        });
    };

    let on_clear_all = move |_| {
        if confirm("Are you sure you want to clear all chats? This action cannot be undone.") {
            commands.send(ChatCommand::ClearAll);
            nav.push(Route::Home {});
        }
    };

    rsx! {
        aside {
            class: if *app.sidebar_open.read() { "sidebar" } else { "sidebar collapsed" },
            div {
                class: "sidebar-header",
                h2 { "Lazy Chats" }
                button {
                    class: "btn btn-ghost",
                    title: "New chat",
                    onclick: move |_| {
                        nav.push(Route::Home {});
                    },
                    "+ New"
                }
            }

            if *ctx.history_loading.read() && !has_entries {
                div { class: "history-loading", "Loading…" }
            } else if !has_entries {
                div { class: "history-empty", "No chats yet. Create a new one!" }
            }

            for entry in entries {
                {
                    let is_active = active_chat.as_deref() == Some(entry.chatgpt_id.as_str());
                    let armed = confirm_delete.read().as_deref() == Some(entry.id.as_str());
                    let title = entry.display_title().to_string();
                    let rename_id = entry.id.clone();
                    let rename_title = title.clone();
                    let delete_id = entry.id.clone();
                    let delete_chat_id = entry.chatgpt_id.clone();
                    rsx! {
                        div {
                            key: "{entry.id}",
                            class: if is_active { "history-item active" } else { "history-item" },
                            Link {
                                class: "history-link",
                                to: Route::Chat { chat_id: entry.chatgpt_id.clone() },
                                "{title}"
                            }
                            button {
                                class: "btn btn-ghost",
                                title: "Rename",
                                onclick: move |_| {
                                    if let Some(new_title) = prompt("Rename chat", &rename_title) {
                                        commands.send(ChatCommand::Rename {
                                            id: rename_id.clone(),
                                            title: new_title,
                                        });
                                    }
                                },
                                "✎"
                            }
                            button {
                                class: if armed { "btn btn-ghost confirming" } else { "btn btn-ghost" },
                                title: if armed { "Click again to delete" } else { "Delete" },
                                onclick: move |_| on_delete(delete_id.clone(), delete_chat_id.clone()),
                                if armed { "Confirm" } else { "🗑" }
                            }
                        }
                    }
                }
            }

            if has_entries {
                button {
                    class: "btn btn-ghost btn-danger",
                    onclick: on_clear_all,
                    "Clear all chats"
                }
            }
        }
    }
}
