//! Rules command handlers.

use teloxide::prelude::*;
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;
use crate::permissions::require_group_admin;
use crate::utils::{reply_text, text_or_reply};

/// Handle /rules command. Public.
pub async fn rules_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let rules = state.store.settings(msg.chat.id.0).rules_text;
    reply_text(&bot, &msg, rules).await
}

/// Handle /setrules command. Text may come from the replied message.
pub async fn setrules_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !require_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let Some(rules) = text_or_reply(&msg, &args) else {
        return reply_text(&bot, &msg, get_text("rules.set_usage")).await;
    };

    state
        .store
        .update_settings(msg.chat.id.0, |settings| settings.rules_text = rules);

    info!("Rules updated in chat {}", msg.chat.id);
    reply_text(&bot, &msg, get_text("rules.set")).await
}
