//! /start, /help and /whoami.

use teloxide::prelude::*;
use teloxide::types::ReplyParameters;

use crate::bot::dispatcher::ThrottledBot;
use crate::i18n::get_text;
use crate::permissions::is_group;
use crate::plugins::menu;
use crate::utils::{reply_html, reply_text};

/// Handle the /start command.
///
/// Private chats get the menu home screen; groups get a short setup note.
pub async fn start_command(bot: ThrottledBot, msg: Message) -> anyhow::Result<()> {
    if !msg.chat.is_private() {
        return reply_text(&bot, &msg, get_text("start.group")).await;
    }

    bot.send_message(msg.chat.id, get_text("start.private"))
        .reply_markup(menu::home_keyboard())
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}

/// Handle the /help command.
pub async fn help_command(bot: ThrottledBot, msg: Message) -> anyhow::Result<()> {
    reply_html(&bot, &msg, get_text("help.text")).await
}

/// Handle the /whoami command.
pub async fn whoami_command(bot: ThrottledBot, msg: Message) -> anyhow::Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let text = if is_group(&msg) {
        get_text("whoami.group")
            .replace("{user_id}", &user.id.to_string())
            .replace("{chat_id}", &msg.chat.id.to_string())
    } else {
        get_text("whoami.private").replace("{user_id}", &user.id.to_string())
    };

    reply_html(&bot, &msg, text).await
}
