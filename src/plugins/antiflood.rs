//! Antiflood command handlers.
//!
//! Commands for configuring antiflood protection in groups. Tracking and
//! muting happen in `events::antiflood`.

use teloxide::prelude::*;
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;
use crate::permissions::require_group_admin;
use crate::utils::reply_text;

fn first_number(args: &str) -> Option<i64> {
    args.split_whitespace().next()?.parse().ok()
}

/// Handle /setflood command. The limit is clamped to 1..=63.
pub async fn setflood_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !require_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let Some(requested) = first_number(&args) else {
        return reply_text(&bot, &msg, get_text("antiflood.setflood_usage")).await;
    };

    let limit = state.store.set_flood_limit(msg.chat.id.0, requested);
    info!("Flood limit set to {} in chat {}", limit, msg.chat.id);

    let text = get_text("antiflood.setflood_done").replace("{limit}", &limit.to_string());
    reply_text(&bot, &msg, text).await
}

/// Handle /setfloodmute command. At least one minute.
pub async fn setfloodmute_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !require_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let Some(requested) = first_number(&args) else {
        return reply_text(&bot, &msg, get_text("antiflood.setfloodmute_usage")).await;
    };

    let minutes = state.store.set_flood_mute_min(msg.chat.id.0, requested);
    info!("Flood mute set to {} min in chat {}", minutes, msg.chat.id);

    let text = get_text("antiflood.setfloodmute_done").replace("{minutes}", &minutes.to_string());
    reply_text(&bot, &msg, text).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number() {
        assert_eq!(first_number("12"), Some(12));
        assert_eq!(first_number(" -3 extra"), Some(-3));
        assert_eq!(first_number("twelve"), None);
        assert_eq!(first_number(""), None);
    }
}
