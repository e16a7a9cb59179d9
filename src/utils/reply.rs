//! Reply helper utilities.
//!
//! Provides consistent reply behavior across all handlers: every command
//! response is sent as a reply to the command message.

use teloxide::prelude::*;
use teloxide::types::{ParseMode, ReplyParameters};

use crate::bot::dispatcher::ThrottledBot;

/// Reply with plain text (safe for usage strings containing `<...>`).
pub async fn reply_text(bot: &ThrottledBot, msg: &Message, text: impl Into<String>) -> anyhow::Result<()> {
    bot.send_message(msg.chat.id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}

/// Reply with HTML-formatted text.
pub async fn reply_html(bot: &ThrottledBot, msg: &Message, text: impl Into<String>) -> anyhow::Result<()> {
    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}
