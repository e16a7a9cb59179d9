//! Lock command handlers.
//!
//! /lock and /unlock toggle one content type; enforcement lives in
//! `events::locks`.

use teloxide::prelude::*;
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{ChatLocks, LockKind};
use crate::i18n::get_text;
use crate::permissions::require_group_admin;
use crate::utils::{reply_html, reply_text};

/// Handle /lock command.
pub async fn lock_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    set_lock(bot, msg, state, args, true).await
}

/// Handle /unlock command.
pub async fn unlock_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    set_lock(bot, msg, state, args, false).await
}

async fn set_lock(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
    locked: bool,
) -> anyhow::Result<()> {
    if !require_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    // Unknown names leave the table untouched
    let Some(kind) = parse_lock_arg(&args) else {
        let key = if locked { "locks.usage_lock" } else { "locks.usage_unlock" };
        return reply_text(&bot, &msg, get_text(key)).await;
    };

    state.store.set_lock(msg.chat.id.0, kind, locked);
    info!(
        "{} {} in chat {}",
        if locked { "Locked" } else { "Unlocked" },
        kind,
        msg.chat.id
    );

    let key = if locked { "locks.locked" } else { "locks.unlocked" };
    reply_text(&bot, &msg, get_text(key).replace("{kind}", kind.as_str())).await
}

/// Handle /locks command. Public.
pub async fn locks_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let locks = state.store.locks(msg.chat.id.0);
    reply_html(&bot, &msg, format_status(&locks)).await
}

fn parse_lock_arg(args: &str) -> Option<LockKind> {
    args.split_whitespace().next()?.parse().ok()
}

fn format_status(locks: &ChatLocks) -> String {
    let flag = |kind: LockKind| if locks.get(kind) { "on" } else { "off" };
    get_text("locks.status")
        .replace("{links}", flag(LockKind::Links))
        .replace("{media}", flag(LockKind::Media))
        .replace("{stickers}", flag(LockKind::Stickers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lock_arg() {
        assert_eq!(parse_lock_arg("links"), Some(LockKind::Links));
        assert_eq!(parse_lock_arg(" Media extra"), Some(LockKind::Media));
        assert_eq!(parse_lock_arg("badname"), None);
        assert_eq!(parse_lock_arg(""), None);
    }

    #[test]
    fn test_format_status() {
        let mut locks = ChatLocks::default();
        locks.set(LockKind::Stickers, true);

        let status = format_status(&locks);
        assert!(status.contains("links: off"));
        assert!(status.contains("media: off"));
        assert!(status.contains("stickers: on"));
    }
}
