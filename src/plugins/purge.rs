//! Purge command handler.
//!
//! Deletes a run of recent messages, one call per message.

use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::MessageId;
use tracing::{debug, info};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;
use crate::permissions::require_group_admin;
use crate::utils::reply_text;

/// Upper bound for `/purge <count>`.
pub const MAX_PURGE: u32 = 300;

/// How long the purge confirmation stays visible.
const CONFIRMATION_TTL: Duration = Duration::from_secs(3);

/// What a /purge invocation deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeMode {
    /// Everything from the replied-to message up to the command.
    FromReply(MessageId),
    /// The last N messages, counting back from the command.
    Count(u32),
}

impl PurgeMode {
    /// Reply takes precedence; otherwise a positive count is required.
    pub fn from_command(reply_to: Option<MessageId>, args: &str) -> Option<Self> {
        if let Some(id) = reply_to {
            return Some(Self::FromReply(id));
        }
        let count = args.split_whitespace().next()?.parse::<u32>().ok()?;
        (count > 0).then(|| Self::Count(count.min(MAX_PURGE)))
    }
}

/// Message ids to delete for a purge issued by `command_id`.
pub fn purge_ids(command_id: MessageId, mode: PurgeMode) -> Vec<MessageId> {
    match mode {
        PurgeMode::FromReply(start) => (start.0..=command_id.0).map(MessageId).collect(),
        PurgeMode::Count(count) => (1..=command_id.0)
            .rev()
            .take(count as usize)
            .map(MessageId)
            .collect(),
    }
}

/// Handle /purge command.
///
/// Usage:
/// - reply + /purge: delete from the replied message to the command
/// - /purge <N>: delete the last N messages (at most 300)
pub async fn purge_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !require_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let chat_id = msg.chat.id;
    let reply_to = msg.reply_to_message().map(|reply| reply.id);

    let Some(mode) = PurgeMode::from_command(reply_to, &args) else {
        return reply_text(&bot, &msg, get_text("purge.usage")).await;
    };

    let mut deleted = 0usize;
    for id in purge_ids(msg.id, mode) {
        match bot.delete_message(chat_id, id).await {
            Ok(_) => deleted += 1,
            Err(e) => debug!("Skipping message {} in chat {}: {}", id.0, chat_id, e),
        }
    }

    info!("Purged {} message(s) in chat {}", deleted, chat_id);

    let confirm = bot
        .send_message(chat_id, get_text("purge.done").replace("{count}", &deleted.to_string()))
        .await?;

    // Auto-delete confirmation
    tokio::spawn(async move {
        tokio::time::sleep(CONFIRMATION_TTL).await;
        let _ = bot.delete_message(chat_id, confirm.id).await;
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_command() {
        assert_eq!(
            PurgeMode::from_command(Some(MessageId(40)), "5"),
            Some(PurgeMode::FromReply(MessageId(40)))
        );
        assert_eq!(PurgeMode::from_command(None, "5"), Some(PurgeMode::Count(5)));
        assert_eq!(
            PurgeMode::from_command(None, "1000"),
            Some(PurgeMode::Count(MAX_PURGE))
        );
        assert_eq!(PurgeMode::from_command(None, "0"), None);
        assert_eq!(PurgeMode::from_command(None, "lots"), None);
        assert_eq!(PurgeMode::from_command(None, ""), None);
    }

    #[test]
    fn test_reply_range_is_inclusive() {
        let ids = purge_ids(MessageId(105), PurgeMode::FromReply(MessageId(100)));
        assert_eq!(ids.len(), 6);
        assert_eq!(ids.first(), Some(&MessageId(100)));
        assert_eq!(ids.last(), Some(&MessageId(105)));
    }

    #[test]
    fn test_count_walks_backward_from_command() {
        let ids = purge_ids(MessageId(50), PurgeMode::Count(3));
        assert_eq!(ids, vec![MessageId(50), MessageId(49), MessageId(48)]);
    }

    #[test]
    fn test_count_stops_at_first_message() {
        let ids = purge_ids(MessageId(3), PurgeMode::Count(10));
        assert_eq!(ids, vec![MessageId(3), MessageId(2), MessageId(1)]);
    }
}
