pub mod auth;
pub mod chat;
pub mod header;
pub mod not_found;
pub mod shop;
pub mod sidebar;
pub mod styles;

pub use auth::{Login, RedirectToLogin, Register};
pub use chat::{Chat, ChatShell, Home};
pub use header::Header;
pub use not_found::NotFound;
pub use sidebar::Sidebar;
