//! Warning command handlers.
//!
//! Commands for managing user warnings in groups.

use teloxide::prelude::*;
use tracing::{info, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;
use crate::permissions::require_group_admin;
use crate::utils::{Target, html_escape, mention_html, reply_html, reply_text, resolve_target};

/// Handle /warn command.
///
/// Reaching the chat's limit resets the counter and bans the user. The reset
/// stands even when the ban fails.
pub async fn warn_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !require_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let chat_id = msg.chat.id;
    let Some(target) = resolve_target(&msg, &args) else {
        return reply_text(&bot, &msg, get_text("common.no_target")).await;
    };
    let mention = mention_html(target.id, &target.name);

    let outcome = state.store.add_warn(chat_id.0, target.id.0);
    info!(
        "Warned user {} in chat {} ({}/{})",
        target.id, chat_id, outcome.count, outcome.max
    );

    if !outcome.limit_reached {
        let text = get_text("warn.warned")
            .replace("{mention}", &mention)
            .replace("{count}", &outcome.count.to_string())
            .replace("{max}", &outcome.max.to_string());
        return reply_html(&bot, &msg, text).await;
    }

    let text = match bot.ban_chat_member(chat_id, target.id).await {
        Ok(_) => {
            info!("User {} reached the warn limit in chat {} and was banned", target.id, chat_id);
            get_text("warn.limit_reached")
                .replace("{mention}", &mention)
                .replace("{max}", &outcome.max.to_string())
        }
        Err(e) => {
            warn!("Warn-limit ban of user {} in chat {} failed: {}", target.id, chat_id, e);
            get_text("warn.ban_failed")
                .replace("{mention}", &mention)
                .replace("{max}", &outcome.max.to_string())
                .replace("{error}", &html_escape(&e.to_string()))
        }
    };

    reply_html(&bot, &msg, text).await
}

/// Handle /warnings command. Public; defaults to the caller.
pub async fn warnings_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    let target = resolve_target(&msg, &args).or_else(|| {
        msg.from.as_ref().map(|user| Target {
            id: user.id,
            name: user.full_name(),
            consumed_args: 0,
        })
    });
    let Some(target) = target else {
        return Ok(());
    };

    let count = state.store.warns(msg.chat.id.0, target.id.0);
    let max = state.store.settings(msg.chat.id.0).max_warns;

    let text = get_text("warn.count")
        .replace("{mention}", &mention_html(target.id, &target.name))
        .replace("{count}", &count.to_string())
        .replace("{max}", &max.to_string());
    reply_html(&bot, &msg, text).await
}

/// Handle /clearwarns command.
pub async fn clearwarns_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !require_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let Some(target) = resolve_target(&msg, &args) else {
        return reply_text(&bot, &msg, get_text("common.no_target")).await;
    };

    state.store.clear_warns(msg.chat.id.0, target.id.0);
    info!("Cleared warnings of user {} in chat {}", target.id, msg.chat.id);

    let text = get_text("warn.cleared").replace("{mention}", &mention_html(target.id, &target.name));
    reply_html(&bot, &msg, text).await
}

/// Handle /setmaxwarns command. The value is clamped to 1..=10.
pub async fn setmaxwarns_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !require_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let Some(requested) = args.split_whitespace().next().and_then(|a| a.parse::<i64>().ok()) else {
        return reply_text(&bot, &msg, get_text("warn.setmax_usage")).await;
    };

    let max = state.store.set_max_warns(msg.chat.id.0, requested);
    info!("Max warnings set to {} in chat {}", max, msg.chat.id);

    reply_text(&bot, &msg, get_text("warn.setmax_done").replace("{max}", &max.to_string())).await
}
