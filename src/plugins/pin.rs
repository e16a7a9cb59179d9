//! Pin command handlers.

use teloxide::prelude::*;
use tracing::{info, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;
use crate::permissions::require_group_admin;
use crate::utils::reply_text;

/// Handle /pin command. Pins the replied message.
pub async fn pin_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    if !require_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let Some(reply) = msg.reply_to_message() else {
        return reply_text(&bot, &msg, get_text("pin.usage")).await;
    };

    let chat_id = msg.chat.id;
    match bot.pin_chat_message(chat_id, reply.id).await {
        Ok(_) => {
            info!("Pinned message {} in chat {}", reply.id.0, chat_id);
            reply_text(&bot, &msg, get_text("pin.pinned")).await
        }
        Err(e) => {
            warn!("Pin in chat {} failed: {}", chat_id, e);
            reply_text(&bot, &msg, get_text("pin.failed").replace("{error}", &e.to_string())).await
        }
    }
}

/// Handle /unpin command.
///
/// Unpins the replied message, or the most recent pin when not replying.
pub async fn unpin_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    if !require_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let chat_id = msg.chat.id;
    let mut request = bot.unpin_chat_message(chat_id);
    if let Some(reply) = msg.reply_to_message() {
        request = request.message_id(reply.id);
    }

    match request.await {
        Ok(_) => {
            info!("Unpinned message in chat {}", chat_id);
            reply_text(&bot, &msg, get_text("pin.unpinned")).await
        }
        Err(e) => {
            warn!("Unpin in chat {} failed: {}", chat_id, e);
            reply_text(&bot, &msg, get_text("pin.failed").replace("{error}", &e.to_string())).await
        }
    }
}
