//! Mute management commands.
//!
//! Commands for muting and unmuting users.

use teloxide::prelude::*;
use teloxide::types::ChatPermissions;
use tracing::{info, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;
use crate::permissions::require_group_admin;
use crate::utils::{mention_html, reply_html, reply_text, resolve_target};

/// Mute length when no minutes argument is given.
pub const DEFAULT_MUTE_MINUTES: u32 = 10;

/// Permissions applied by /unmute.
///
/// A fixed baseline, not the member's previous permissions: messaging,
/// media, polls, previews and invites, but no pinning or info changes.
pub fn unmuted_permissions() -> ChatPermissions {
    ChatPermissions::SEND_MESSAGES
        | ChatPermissions::SEND_AUDIOS
        | ChatPermissions::SEND_DOCUMENTS
        | ChatPermissions::SEND_PHOTOS
        | ChatPermissions::SEND_VIDEOS
        | ChatPermissions::SEND_VIDEO_NOTES
        | ChatPermissions::SEND_VOICE_NOTES
        | ChatPermissions::SEND_OTHER_MESSAGES
        | ChatPermissions::SEND_POLLS
        | ChatPermissions::ADD_WEB_PAGE_PREVIEWS
        | ChatPermissions::INVITE_USERS
}

/// Mute length from the argument after the target.
///
/// Missing or non-numeric falls back to the default; values below 1 become 1.
pub fn parse_mute_minutes(args: &str, skip: usize) -> u32 {
    match args.split_whitespace().nth(skip) {
        Some(arg) => match arg.parse::<i64>() {
            Ok(minutes) => minutes.clamp(1, u32::MAX as i64) as u32,
            Err(_) => DEFAULT_MUTE_MINUTES,
        },
        None => DEFAULT_MUTE_MINUTES,
    }
}

/// Handle /mute command.
///
/// `/mute [minutes]` as a reply, or `/mute <user_id> [minutes]`.
pub async fn mute_command(
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

    let minutes = parse_mute_minutes(&args, target.consumed_args);
    let until = chrono::Utc::now() + chrono::Duration::minutes(minutes as i64);

    match bot
        .restrict_chat_member(chat_id, target.id, ChatPermissions::empty())
        .until_date(until)
        .await
    {
        Ok(_) => {
            info!("Muted user {} in chat {} for {} min", target.id, chat_id, minutes);
            let text = get_text("mute.muted")
                .replace("{mention}", &mention_html(target.id, &target.name))
                .replace("{minutes}", &minutes.to_string());
            reply_html(&bot, &msg, text).await
        }
        Err(e) => {
            warn!("Mute of user {} in chat {} failed: {}", target.id, chat_id, e);
            reply_text(&bot, &msg, get_text("mute.failed").replace("{error}", &e.to_string())).await
        }
    }
}

/// Handle /unmute command.
pub async fn unmute_command(
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

    match bot
        .restrict_chat_member(chat_id, target.id, unmuted_permissions())
        .await
    {
        Ok(_) => {
            info!("Unmuted user {} in chat {}", target.id, chat_id);
            let text = get_text("mute.unmuted")
                .replace("{mention}", &mention_html(target.id, &target.name));
            reply_html(&bot, &msg, text).await
        }
        Err(e) => {
            warn!("Unmute of user {} in chat {} failed: {}", target.id, chat_id, e);
            reply_text(&bot, &msg, get_text("mute.failed").replace("{error}", &e.to_string())).await
        }
    }
}
