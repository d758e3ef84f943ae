//! Flatten the server's conversation graph into a display list.
//!
//! The graph is a map of nodes linked by `parent` and `children`. Nothing
//! guarantees it is a tree: ids can repeat, links can dangle, and cycles
//! have been observed. Traversal uses an explicit stack and a visited set so
//! every node is processed at most once.

use chrono::{DateTime, Utc};
use shared_types::{
    ChatData, ConversationMapping, ConversationSummary, DisplayMessage, Role, CONTENT_TYPE_TEXT,
    ROOT_SENTINEL,
};
use std::collections::HashSet;

/// Messages reachable from `current_node`, deduplicated by id and ordered by
/// creation time.
pub fn reconstruct(mapping: &ConversationMapping, current_node: &str) -> Vec<DisplayMessage> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut stack: Vec<&str> = vec![current_node];
    let mut collected: Vec<DisplayMessage> = Vec::new();

    while let Some(node_id) = stack.pop() {
        if !visited.insert(node_id.to_string()) {
            continue;
        }
        let Some(node) = mapping.get(node_id) else {
            continue;
        };

        if let Some(message) = extract_message(node) {
            collected.push(message);
        }

        // Pushed in reverse so the parent pops first, then children in order.
        for child in node.children.iter().rev() {
            stack.push(child.as_str());
        }
        if let Some(parent) = node.parent.as_deref() {
            if parent != ROOT_SENTINEL {
                stack.push(parent);
            }
        }
    }

    let mut seen_ids: HashSet<String> = HashSet::new();
    collected.retain(|m| seen_ids.insert(m.id.clone()));
    collected.sort_by_key(|m| m.timestamp);
    collected
}

fn extract_message(node: &shared_types::ChatNode) -> Option<DisplayMessage> {
    let message = node.message.as_ref()?;
    if message.author.role == Role::System || message.content.content_type != CONTENT_TYPE_TEXT {
        return None;
    }

    let text = message.content.joined_text();
    if text.trim().is_empty() {
        return None;
    }

    let timestamp: DateTime<Utc> = message.created_at().unwrap_or_else(Utc::now);
    Some(DisplayMessage {
        id: message.id.clone(),
        role: message.author.role,
        content: text,
        timestamp,
        is_loading: false,
    })
}

/// Newest assistant message by timestamp.
pub fn latest_assistant(messages: &[DisplayMessage]) -> Option<&DisplayMessage> {
    messages
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .max_by_key(|m| m.timestamp)
}

/// Raw text of the current node, used to detect a reply that is still
/// growing.
pub fn current_node_text(mapping: &ConversationMapping, current_node: &str) -> String {
    mapping
        .get(current_node)
        .and_then(|node| node.message.as_ref())
        .map(|message| message.content.joined_text())
        .unwrap_or_default()
}

pub fn summarize(data: &ChatData) -> ConversationSummary {
    ConversationSummary::from(data)
}
