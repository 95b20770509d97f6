// gateway/src/web/handlers/mod.rs

pub mod checkout_handlers;
pub mod settings_handlers;
