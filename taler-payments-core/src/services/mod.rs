//! Business logic service layer

mod auth_service;
mod backend_check_service;
mod notices;
mod order_service;
mod sanitizer;
mod save_service;

pub use auth_service::{AuthService, ParsedSettings};
pub use backend_check_service::BackendCheckService;
pub use notices::SettingsNotices;
pub use order_service::OrderService;
pub use sanitizer::{SanitizeOutcome, Sanitizer};
pub use save_service::SettingsSaveService;
