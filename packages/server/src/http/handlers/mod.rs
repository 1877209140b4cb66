mod config;
mod health;
mod not_found;
pub(crate) mod openapi;
pub mod theme;

pub use config::handle_config;
pub use health::handle_health;
pub use not_found::handle_not_found;
pub use theme::{handle_get_theme, handle_put_theme};
