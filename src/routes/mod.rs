use actix_web_flash_messages::IncomingFlashMessages;
use pushkind_common::routes::alert_level_to_str;
use tera::Context;

pub mod categories;
pub mod items;
pub mod main;

/// Context shared by every page: flash alerts and the active navigation entry.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}
