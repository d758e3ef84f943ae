pub mod api;
pub mod components;
pub mod conversation;
pub mod interop;
pub mod markdown;
pub mod polling;
pub mod router;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;
pub mod storefront;

use dioxus::prelude::*;

use crate::api::ApiClient;
use crate::components::styles::APP_STYLES;
use crate::router::Route;
use crate::state::AppState;
use crate::storage::LocalStore;

/// Root component: owns the app-wide state and mounts the router.
#[component]
pub fn App() -> Element {
    let app = use_context_provider(AppState::restore);

    // Refresh the profile once per page load when a session exists.
    use_hook(move || {
        if services::auth::is_authenticated(&LocalStore) {
            spawn(async move {
                let user = services::auth::current_user(&ApiClient::default()).await;
                app.set_user(user);
            });
        }
    });

    rsx! {
        style { {APP_STYLES} }
        Router::<Route> {}
    }
}
