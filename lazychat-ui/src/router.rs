use dioxus::prelude::*;

use crate::components::auth::{Login, Register};
use crate::components::chat::{Chat, ChatShell, Home};
use crate::components::not_found::NotFound;
use crate::components::shop::{Cart, Checkout, ProductDetail, Products, Shop};

#[derive(Routable, Clone, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(ChatShell)]
        #[route("/")]
        Home {},
        #[route("/chat/:chat_id")]
        Chat { chat_id: String },
    #[end_layout]

    #[route("/login")]
    Login {},
    #[route("/register")]
    Register {},

    #[route("/shop")]
    Shop {},
    #[route("/products")]
    Products {},
    #[route("/products/:id")]
    ProductDetail { id: u32 },
    #[route("/cart")]
    Cart {},
    #[route("/checkout")]
    Checkout {},

    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}
