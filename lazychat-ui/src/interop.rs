//! Small browser helpers that have no Dioxus equivalent.

use web_sys::window;

/// Best effort; silently does nothing without clipboard access.
pub fn copy_text_to_clipboard(text: &str) {
    let Ok(payload) = serde_json::to_string(text) else {
        return;
    };
    let js = format!(
        "if (navigator && navigator.clipboard) {{ navigator.clipboard.writeText({payload}); }}"
    );
    let _ = js_sys::eval(&js);
}

/// `window.confirm`. False when no window is available.
pub fn confirm(message: &str) -> bool {
    window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// `window.prompt`. `None` when dismissed or left blank.
pub fn prompt(message: &str, default: &str) -> Option<String> {
    window()
        .and_then(|w| w.prompt_with_message_and_default(message, default).ok())
        .flatten()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Scroll the element with `id` to its bottom edge.
pub fn scroll_to_bottom(id: &str) {
    let Some(element) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
    else {
        return;
    };
    element.set_scroll_top(element.scroll_height());
}
