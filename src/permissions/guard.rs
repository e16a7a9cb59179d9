//! Guard run at the top of every gated command.

use teloxide::prelude::*;
use tracing::debug;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;
use crate::utils::reply_text;

/// Whether the message was sent in a group or supergroup.
pub fn is_group(msg: &Message) -> bool {
    msg.chat.is_group() || msg.chat.is_supergroup()
}

/// Group-only check, then owner-or-admin check.
///
/// Replies with the reason and returns `false` when either check fails.
pub async fn require_group_admin(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
) -> anyhow::Result<bool> {
    if !is_group(msg) {
        reply_text(bot, msg, get_text("common.group_only")).await?;
        return Ok(false);
    }

    let user_id = match msg.from.as_ref() {
        Some(user) => user.id,
        None => return Ok(false),
    };

    if state.permissions.is_authorized(msg.chat.id, user_id).await {
        return Ok(true);
    }

    debug!("User {} denied gated command in chat {}", user_id, msg.chat.id);
    reply_text(bot, msg, get_text("common.admins_only")).await?;
    Ok(false)
}
