use dioxus::prelude::*;

use crate::api::ApiClient;
use crate::components::styles::AUTH_STYLES;
use crate::router::Route;
use crate::services::auth;
use crate::state::use_app_state;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthPhase {
    Idle,
    Submitting,
}

/// Send unauthenticated visitors to the login form.
#[component]
pub fn RedirectToLogin() -> Element {
    let nav = navigator();
    use_effect(move || {
        nav.replace(Route::Login {});
    });
    rsx! {}
}

#[component]
pub fn Login() -> Element {
    let app = use_app_state();
    let nav = navigator();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut phase = use_signal(|| AuthPhase::Idle);

    use_effect(move || {
        if *app.is_authenticated.read() {
            nav.replace(Route::Home {});
        }
    });

    let on_submit = move |e: FormEvent| {
        e.prevent_default();
        let user = username.peek().trim().to_string();
        let pass = password.peek().clone();
        if user.is_empty() || pass.is_empty() {
            error.set(Some("Please enter your username and password".to_string()));
            return;
        }
        phase.set(AuthPhase::Submitting);
        error.set(None);
        spawn(async move {
            match auth::login(&ApiClient::default(), &user, &pass).await {
                Ok(profile) => {
                    app.set_user(Some(profile));
                    nav.replace(Route::Home {});
                }
                Err(e) => {
                    dioxus_logger::tracing::warn!("Login failed: {}", e);
                    error.set(Some("Invalid username or password".to_string()));
                }
            }
            phase.set(AuthPhase::Idle);
        });
    };

    let submitting = *phase.read() == AuthPhase::Submitting;

    rsx! {
        style { {AUTH_STYLES} }
        div {
            class: "auth-page",
            form {
                class: "auth-card",
                onsubmit: on_submit,
                h1 { "Sign in" }
                label {
                    class: "field",
                    "Username"
                    input {
                        r#type: "text",
                        autocomplete: "username",
                        value: "{username}",
                        oninput: move |e| username.set(e.value()),
                    }
                }
                label {
                    class: "field",
                    "Password"
                    input {
                        r#type: "password",
                        autocomplete: "current-password",
                        value: "{password}",
                        oninput: move |e| password.set(e.value()),
                    }
                }
                if let Some(message) = error() {
                    div { class: "form-error", "{message}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: submitting,
                    if submitting { "Signing in…" } else { "Sign in" }
                }
                div {
                    class: "auth-switch",
                    "No account yet? "
                    Link { to: Route::Register {}, "Create one" }
                }
            }
        }
    }
}

#[component]
pub fn Register() -> Element {
    let app = use_app_state();
    let nav = navigator();
    let mut username = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut phase = use_signal(|| AuthPhase::Idle);

    let on_submit = move |e: FormEvent| {
        e.prevent_default();
        let user = username.peek().trim().to_string();
        let mail = email.peek().trim().to_string();
        let pass = password.peek().clone();
        if user.is_empty() || mail.is_empty() || pass.is_empty() {
            error.set(Some("All fields are required".to_string()));
            return;
        }
        if pass != *confirm_password.peek() {
            error.set(Some("Passwords do not match".to_string()));
            return;
        }
        phase.set(AuthPhase::Submitting);
        error.set(None);
        spawn(async move {
            match auth::register(&ApiClient::default(), &user, &mail, &pass).await {
                Ok(profile) => {
                    app.set_user(Some(profile));
                    nav.replace(Route::Home {});
                }
                Err(e) => {
                    dioxus_logger::tracing::warn!("Registration failed: {}", e);
                    error.set(Some("Registration failed. Please try again.".to_string()));
                }
            }
            phase.set(AuthPhase::Idle);
        });
    };

    let submitting = *phase.read() == AuthPhase::Submitting;

    rsx! {
        style { {AUTH_STYLES} }
        div {
            class: "auth-page",
            form {
                class: "auth-card",
                onsubmit: on_submit,
                h1 { "Create account" }
                label {
                    class: "field",
                    "Username"
                    input {
                        r#type: "text",
                        value: "{username}",
                        oninput: move |e| username.set(e.value()),
                    }
                }
                label {
                    class: "field",
                    "Email"
                    input {
                        r#type: "email",
                        value: "{email}",
                        oninput: move |e| email.set(e.value()),
                    }
                }
                label {
                    class: "field",
                    "Password"
                    input {
                        r#type: "password",
                        value: "{password}",
                        oninput: move |e| password.set(e.value()),
                    }
                }
                label {
                    class: "field",
                    "Confirm password"
                    input {
                        r#type: "password",
                        value: "{confirm_password}",
                        oninput: move |e| confirm_password.set(e.value()),
                    }
                }
                if let Some(message) = error() {
                    div { class: "form-error", "{message}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: submitting,
                    if submitting { "Creating account…" } else { "Sign up" }
                }
                div {
                    class: "auth-switch",
                    "Already registered? "
                    Link { to: Route::Login {}, "Sign in" }
                }
            }
        }
    }
}
