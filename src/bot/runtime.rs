//! Bot runtime - Polling and Webhook runners.

use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tracing::info;

use super::dispatcher::{BotDispatcher, ThrottledBot};
use super::webhook;
use crate::config::{BotMode, Config};

/// Run the bot with the configured mode.
pub async fn run(config: &Config, dispatcher: BotDispatcher, bot: ThrottledBot) -> anyhow::Result<()> {
    match config.bot_mode {
        BotMode::Polling => {
            info!("Starting bot in polling mode...");
            run_polling(dispatcher, bot).await;
            Ok(())
        }
        BotMode::Webhook => {
            info!("Starting bot in webhook mode...");
            webhook::start_webhook(config, dispatcher, bot).await
        }
    }
}

/// Long polling, skipping updates that queued up while the bot was down.
async fn run_polling(mut dispatcher: BotDispatcher, bot: ThrottledBot) {
    let listener = Polling::builder(bot).drop_pending_updates().build();
    let error_handler = LoggingErrorHandler::with_custom_text("Error from update listener");

    info!("Polling started");
    dispatcher
        .dispatch_with_listener(listener, error_handler)
        .await;
}
