//! Admin gate: owner id match or live chat-admin lookup.

use teloxide::prelude::*;
use teloxide::types::{ChatId, ChatMemberKind, UserId};
use tracing::{debug, warn};

/// Permission checker.
///
/// Bot owners (from OWNER_ID env) automatically pass the gate in every chat.
/// Admin status is looked up live on every call.
#[derive(Clone)]
pub struct Permissions {
    bot: Bot,
    /// Bot owner IDs.
    owner_ids: Vec<u64>,
}

impl Permissions {
    /// Create a new permission checker with bot owner IDs.
    pub fn with_owners(bot: Bot, owner_ids: Vec<u64>) -> Self {
        Self { bot, owner_ids }
    }

    /// Check if a user is a bot owner.
    #[inline]
    pub fn is_bot_owner(&self, user_id: UserId) -> bool {
        self.owner_ids.contains(&user_id.0)
    }

    /// Whether `user_id` may run gated commands in `chat_id`.
    ///
    /// Lookup failures count as "not an admin".
    pub async fn is_authorized(&self, chat_id: ChatId, user_id: UserId) -> bool {
        if self.is_bot_owner(user_id) {
            debug!("User {} is bot owner, granting access", user_id);
            return true;
        }

        match self.bot.get_chat_member(chat_id, user_id).await {
            Ok(member) => is_admin_kind(&member.kind),
            Err(e) => {
                warn!(
                    "Admin lookup for user {} in chat {} failed: {}",
                    user_id, chat_id, e
                );
                false
            }
        }
    }
}

/// "creator" or "administrator" membership.
pub fn is_admin_kind(kind: &ChatMemberKind) -> bool {
    matches!(
        kind,
        ChatMemberKind::Owner(_) | ChatMemberKind::Administrator(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_ids() {
        let perms = Permissions::with_owners(Bot::new("123:test"), vec![42, 99]);
        assert!(perms.is_bot_owner(UserId(42)));
        assert!(perms.is_bot_owner(UserId(99)));
        assert!(!perms.is_bot_owner(UserId(7)));
    }
}
