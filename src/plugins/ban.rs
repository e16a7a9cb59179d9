//! Ban management commands.
//!
//! Commands for banning, unbanning, and kicking users.

use teloxide::prelude::*;
use tracing::{info, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;
use crate::permissions::require_group_admin;
use crate::utils::{mention_html, reply_html, reply_text, resolve_target};

#[derive(PartialEq, Clone, Copy, Debug)]
enum BanMode {
    Ban,
    Kick,
    Unban,
}

/// Handle /ban command.
pub async fn ban_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    ban_action(bot, msg, state, args, BanMode::Ban).await
}

/// Handle /kick command.
pub async fn kick_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    ban_action(bot, msg, state, args, BanMode::Kick).await
}

/// Handle /unban command.
pub async fn unban_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    ban_action(bot, msg, state, args, BanMode::Unban).await
}

async fn ban_action(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
    mode: BanMode,
) -> anyhow::Result<()> {
    if !require_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let chat_id = msg.chat.id;

    let Some(target) = resolve_target(&msg, &args) else {
        let key = match mode {
            BanMode::Unban => "ban.unban_usage",
            _ => "common.no_target",
        };
        return reply_text(&bot, &msg, get_text(key)).await;
    };

    let result = match mode {
        BanMode::Ban => bot.ban_chat_member(chat_id, target.id).await.map(|_| ()),
        // Ban then unban = kick
        BanMode::Kick => match bot.ban_chat_member(chat_id, target.id).await {
            Ok(_) => bot.unban_chat_member(chat_id, target.id).await.map(|_| ()),
            Err(e) => Err(e),
        },
        BanMode::Unban => bot.unban_chat_member(chat_id, target.id).await.map(|_| ()),
    };

    match result {
        Ok(()) => {
            info!("{:?} user {} in chat {}", mode, target.id, chat_id);

            let key = match mode {
                BanMode::Ban => "ban.banned",
                BanMode::Kick => "ban.kicked",
                BanMode::Unban => "ban.unbanned",
            };
            let text = get_text(key).replace("{mention}", &mention_html(target.id, &target.name));
            reply_html(&bot, &msg, text).await
        }
        Err(e) => {
            warn!("{:?} of user {} in chat {} failed: {}", mode, target.id, chat_id, e);
            reply_text(&bot, &msg, get_text("ban.failed").replace("{error}", &e.to_string())).await
        }
    }
}
