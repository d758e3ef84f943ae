use dioxus::prelude::*;

use crate::components::styles::AUTH_STYLES;
use crate::router::Route;

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = format!("/{}", segments.join("/"));
    dioxus_logger::tracing::debug!("No route for {}", path);

    rsx! {
        style { {AUTH_STYLES} }
        div {
            class: "auth-page",
            div {
                class: "auth-card",
                h1 { "404" }
                p { "Nothing lives at " code { "{path}" } "." }
                Link { class: "btn btn-primary", to: Route::Home {}, "Back to chat" }
                Link { class: "btn btn-ghost", to: Route::Shop {}, "Visit the shop" }
            }
        }
    }
}
