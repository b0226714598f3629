// covenant_server/src/web/handlers/mod.rs

pub mod admin_handlers;
pub mod auth_handlers;
pub mod contact_handlers;
pub mod extractors;
pub mod registration_handlers;
pub mod shop_handlers;
pub mod upload_handlers;

pub use extractors::AdminSession;
