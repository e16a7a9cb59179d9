//! Lock enforcement: delete messages carrying locked content types.

use teloxide::prelude::*;
use teloxide::types::{MessageEntity, MessageEntityKind};
use tracing::{debug, warn};

use crate::bot::dispatcher::ThrottledBot;
use crate::database::{ChatLocks, LockKind};

/// Content types present in a message, as far as locks care.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentFlags {
    pub has_link: bool,
    pub has_media: bool,
    pub is_sticker: bool,
}

impl ContentFlags {
    pub fn from_message(msg: &Message) -> Self {
        let has_link = has_link_entity(msg.entities()) || has_link_entity(msg.caption_entities());
        let has_media = msg.photo().is_some()
            || msg.video().is_some()
            || msg.document().is_some()
            || msg.audio().is_some()
            || msg.voice().is_some()
            || msg.animation().is_some();

        Self {
            has_link,
            has_media,
            is_sticker: msg.sticker().is_some(),
        }
    }
}

fn has_link_entity(entities: Option<&[MessageEntity]>) -> bool {
    entities.is_some_and(|entities| {
        entities.iter().any(|e| {
            matches!(
                e.kind,
                MessageEntityKind::Url | MessageEntityKind::TextLink { .. }
            )
        })
    })
}

/// First lock the content violates, checked links → media → stickers.
pub fn violated_lock(locks: &ChatLocks, content: &ContentFlags) -> Option<LockKind> {
    if locks.links && content.has_link {
        Some(LockKind::Links)
    } else if locks.media && content.has_media {
        Some(LockKind::Media)
    } else if locks.stickers && content.is_sticker {
        Some(LockKind::Stickers)
    } else {
        None
    }
}

/// Delete a message that broke a lock. Failures are logged and swallowed.
pub async fn delete_violation(bot: &ThrottledBot, msg: &Message, kind: LockKind) {
    match bot.delete_message(msg.chat.id, msg.id).await {
        Ok(_) => debug!(
            "Deleted message {} in chat {} ({} locked)",
            msg.id.0, msg.chat.id, kind
        ),
        Err(e) => warn!(
            "Failed to delete {}-locked message {} in chat {}: {}",
            kind, msg.id.0, msg.chat.id, e
        ),
    }
}
