//! Markdown rendering for assistant replies.
//!
//! Raw HTML embedded in a reply is never passed through: block and inline
//! HTML events are re-emitted as text, and links or images using a script
//! URL scheme are neutralised. Output is safe to hand to
//! `dangerous_inner_html`.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

const BLOCKED_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:text/html"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownConfig {
    /// Tables, strikethrough, task lists.
    pub gfm: bool,
    pub smart_punctuation: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            smart_punctuation: false,
        }
    }
}

fn build_options(config: &MarkdownConfig) -> Options {
    let mut options = Options::empty();
    if config.gfm {
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
    }
    if config.smart_punctuation {
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
    }
    options
}

fn is_blocked_url(url: &str) -> bool {
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCKED_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

fn sanitize_event(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) if is_blocked_url(&dest_url) => Event::Start(Tag::Link {
            link_type,
            dest_url: CowStr::Borrowed("#"),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) if is_blocked_url(&dest_url) => Event::Start(Tag::Image {
            link_type,
            dest_url: CowStr::Borrowed(""),
            title,
            id,
        }),
        other => other,
    }
}

pub fn render_markdown(input: &str, config: &MarkdownConfig) -> String {
    let parser = Parser::new_ext(input, build_options(config)).map(sanitize_event);
    let mut output = String::with_capacity(input.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

/// Render with the default configuration.
pub fn render_to_html(input: &str) -> String {
    render_markdown(input, &MarkdownConfig::default())
}
