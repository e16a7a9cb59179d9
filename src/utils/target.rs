//! Target resolution for moderation commands.
//!
//! The target is the author of the replied-to message, or failing that a
//! numeric user id given as the first argument.

use teloxide::types::{Message, UserId};

/// A resolved command target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub id: UserId,
    pub name: String,
    /// How many leading arguments the target consumed (0 for replies).
    pub consumed_args: usize,
}

/// Resolve the target user of a command.
///
/// Resolution order:
/// 1. Reply message → use `reply.from`
/// 2. First argument parses as a user id
pub fn resolve_target(msg: &Message, args: &str) -> Option<Target> {
    if let Some(user) = msg.reply_to_message().and_then(|reply| reply.from.as_ref()) {
        return Some(Target {
            id: user.id,
            name: user.full_name(),
            consumed_args: 0,
        });
    }
    target_from_args(args)
}

/// Resolve a target from the first argument only.
pub fn target_from_args(args: &str) -> Option<Target> {
    let id = parse_user_id(args.split_whitespace().next()?)?;
    Some(Target {
        id,
        name: format!("User {}", id),
        consumed_args: 1,
    })
}

/// Parse a numeric Telegram user id.
pub fn parse_user_id(arg: &str) -> Option<UserId> {
    arg.trim().parse::<u64>().ok().filter(|&id| id > 0).map(UserId)
}
