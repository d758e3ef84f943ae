use dioxus::prelude::*;
use shared_types::Theme;

use crate::router::Route;
use crate::services::auth;
use crate::state::use_app_state;
use crate::storage::LocalStore;

#[component]
pub fn Header(#[props(default)] show_sidebar_toggle: bool) -> Element {
    let app = use_app_state();
    let nav = navigator();

    let theme_icon = match *app.theme.read() {
        Theme::Light => "🌙",
        Theme::Dark => "☀️",
    };
    let cart_count = app.cart.read().item_count();
    let user_name = app
        .user
        .read()
        .as_ref()
        .map(|u| u.display_name().to_string())
        .unwrap_or_else(|| "User".to_string());

    let on_logout = move |_| {
        auth::logout(&LocalStore);
        app.logout();
        dioxus_logger::tracing::info!("Signed out");
        nav.replace(Route::Login {});
    };

    rsx! {
        header {
            class: "app-header",
            div {
                class: "shop-nav",
                if show_sidebar_toggle {
                    button {
                        class: "btn btn-ghost",
                        title: "Toggle sidebar",
                        onclick: move |_| app.toggle_sidebar(),
                        "☰"
                    }
                }
                Link { class: "brand", to: Route::Home {}, "LazyChat" }
                Link { to: Route::Shop {}, "Shop" }
                Link {
                    to: Route::Cart {},
                    "Cart "
                    if cart_count > 0 {
                        span { class: "cart-badge", "{cart_count}" }
                    }
                }
            }
            div {
                class: "header-actions",
                button {
                    class: "btn btn-ghost",
                    title: "Toggle theme",
                    onclick: move |_| app.toggle_theme(),
                    "{theme_icon}"
                }
                if *app.is_authenticated.read() {
                    span { class: "welcome", "Welcome, {user_name}" }
                    button { class: "btn", onclick: on_logout, "Sign out" }
                } else {
                    Link { class: "btn btn-ghost", to: Route::Login {}, "Sign in" }
                    Link { class: "btn btn-primary", to: Route::Register {}, "Sign up" }
                }
            }
        }
    }
}
